use async_trait::async_trait;

use crate::error::PipelineResult;

#[async_trait]
pub trait PipelineStage<'a, I, O> {
    async fn process(&self, input: &'a I) -> PipelineResult<O>;
}
