use alloy::primitives::U256;
use alloy::primitives::utils::{format_ether, parse_ether};

use crate::error::{CoreError, CoreResult};

/// Formats a wei amount as a decimal native-unit string, trimming trailing
/// zeros but keeping at least one fractional digit: `1.0`, `0.5`, `12.25`.
pub fn format_native(wei: U256) -> String {
    let full = format_ether(wei);
    match full.split_once('.') {
        Some((int_part, frac)) => {
            let trimmed = frac.trim_end_matches('0');
            if trimmed.is_empty() {
                format!("{int_part}.0")
            } else {
                format!("{int_part}.{trimmed}")
            }
        }
        None => format!("{full}.0"),
    }
}

/// Parses a decimal native-unit amount ("0.25") into wei.
pub fn parse_native(input: &str) -> CoreResult<U256> {
    parse_ether(input).map_err(|source| CoreError::InvalidAmount {
        input: input.to_string(),
        source,
    })
}

/// Formats a wei-denominated fee as gwei, trimming trailing fractional zeros.
pub fn format_gwei(wei: u128) -> String {
    const GWEI: u128 = 1_000_000_000;
    let int_part = wei / GWEI;
    let frac_part = wei % GWEI;
    if frac_part == 0 {
        format!("{int_part}")
    } else {
        let frac = format!("{frac_part:09}");
        format!("{int_part}.{}", frac.trim_end_matches('0'))
    }
}
