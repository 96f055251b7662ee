//! Canonical breakdown encoding and digesting.
//!
//! The determinism guarantee of the engine extends to storage through this
//! encoding: every map inside a breakdown is a `BTreeMap` and struct field
//! order is fixed, so compact `serde_json` output is byte-identical for
//! identical inputs. The SHA-256 digest over that encoding is what lets a
//! backend treat "same digest" as "same breakdown".

use sha2::{Digest, Sha256};

use appraise_eval::ValuationBreakdown;

use crate::error::StoreError;

/// Compact canonical JSON for a breakdown.
pub fn canonical_json(breakdown: &ValuationBreakdown) -> Result<String, StoreError> {
    Ok(serde_json::to_string(breakdown)?)
}

/// Lowercase hex SHA-256 of a canonical encoding.
pub fn digest_hex(canonical: &str) -> String {
    let hash = Sha256::digest(canonical.as_bytes());
    format!("{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn breakdown(adjusted_cents: i64) -> ValuationBreakdown {
        ValuationBreakdown {
            listing_id: 7,
            base_price: Decimal::new(45_000, 2),
            adjusted_price: Decimal::new(adjusted_cents, 2),
            total_adjustment: Decimal::new(adjusted_cents - 45_000, 2),
            ruleset_id: 1,
            ruleset_name: "2025 desktop pricing".to_string(),
            ruleset_version: "2025.1".to_string(),
            matched_rules_count: 1,
            records: vec![],
        }
    }

    #[test]
    fn identical_breakdowns_identical_encodings() {
        let a = canonical_json(&breakdown(40_000)).unwrap();
        let b = canonical_json(&breakdown(40_000)).unwrap();
        assert_eq!(a, b);
        assert_eq!(digest_hex(&a), digest_hex(&b));
    }

    #[test]
    fn different_breakdowns_different_digests() {
        let a = canonical_json(&breakdown(40_000)).unwrap();
        let b = canonical_json(&breakdown(38_000)).unwrap();
        assert_ne!(digest_hex(&a), digest_hex(&b));
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let digest = digest_hex("canonical");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn encoding_round_trips() {
        let original = breakdown(40_000);
        let encoded = canonical_json(&original).unwrap();
        let decoded: ValuationBreakdown = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn money_is_encoded_as_strings() {
        let encoded = canonical_json(&breakdown(40_000)).unwrap();
        assert!(encoded.contains("\"base_price\":\"450.00\""));
        assert!(encoded.contains("\"adjusted_price\":\"400.00\""));
    }
}
