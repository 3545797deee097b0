use std::fs::{OpenOptions, metadata};

use async_trait::async_trait;
use csv::WriterBuilder;
use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::outcome::CheckinOutcome;
use crate::stage::PipelineStage;

/// Appends a finished batch to a CSV file. The header is written once, when
/// the file is empty; later batches keep appending rows.
pub struct ExportStage {
    pub path: String,
}

#[derive(Serialize)]
struct CheckinAnalyticsRow {
    index: usize,
    wallet_id: String,
    status: &'static str,
    address: String,
    balance: String,
    tx_hash: String,
    block_number: Option<u64>,
    gas_used: Option<u64>,
    duration_secs: String,
    error: String,
    warnings: String,
}

#[async_trait]
impl<'a> PipelineStage<'a, Vec<CheckinOutcome>, ()> for ExportStage {
    async fn process(&self, input: &'a Vec<CheckinOutcome>) -> PipelineResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PipelineError::export(format!("file error: {e}")))?;

        let is_empty = metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let mut wtr = WriterBuilder::new();
        if !is_empty {
            wtr.has_headers(false);
        }

        let mut wtr = wtr.from_writer(file);

        for r in input {
            let row = CheckinAnalyticsRow {
                index: r.index,
                wallet_id: r.wallet_id.clone(),
                status: r.status.description(),
                address: r.formatted_address(),
                balance: r.formatted_balance(),
                tx_hash: r.formatted_tx(),
                block_number: r.block_number,
                gas_used: r.gas_used,
                duration_secs: r.formatted_duration(),
                error: r.error.clone().unwrap_or_default(),
                warnings: r.formatted_warnings(),
            };
            wtr.serialize(row)
                .map_err(|e| PipelineError::export(format!("csv serialize error: {e}")))?;
        }

        wtr.flush()
            .map_err(|e| PipelineError::export(format!("csv flush error: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::CheckinStatus;

    fn outcome(index: usize, status: CheckinStatus) -> CheckinOutcome {
        CheckinOutcome {
            index,
            wallet_id: format!("wallet-{index:03}"),
            address: Some("0x1111111111111111111111111111111111111111".to_string()),
            balance_wei: None,
            tx_hash: Some("0xfeed".to_string()),
            block_number: Some(7),
            gas_used: Some(21_000),
            duration_secs: 1.5,
            status,
            error: None,
            warnings: Vec::new(),
        }
    }

    #[tokio::test]
    async fn writes_headers_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let stage = ExportStage {
            path: path.to_string_lossy().to_string(),
        };

        stage
            .process(&vec![outcome(1, CheckinStatus::Success)])
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "index,wallet_id,status,address,balance,tx_hash,block_number,gas_used,duration_secs,error,warnings"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,wallet-001,success,0x1111"), "got: {row}");
        assert!(row.contains("0xfeed"));
        assert!(row.contains("1.50"));
    }

    #[tokio::test]
    async fn appends_without_repeating_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let stage = ExportStage {
            path: path.to_string_lossy().to_string(),
        };

        stage
            .process(&vec![outcome(1, CheckinStatus::Success)])
            .await
            .unwrap();
        stage
            .process(&vec![outcome(2, CheckinStatus::ChainFailed)])
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.starts_with("index,")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);
        assert!(content.contains("chain failed"));
    }
}
