//! Order number generation
//!
//! Format: `ORD-{yyyymmdd}-{12 uppercase hex}`. The random part comes from a
//! v4 UUID; uniqueness is still enforced by the store's unique index.

use chrono::{DateTime, Utc};

pub const ORDER_NUMBER_PREFIX: &str = "ORD";

pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        ORDER_NUMBER_PREFIX,
        now.format("%Y%m%d"),
        random[..12].to_ascii_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format() {
        let now = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();
        let number = generate_order_number(now);
        assert!(number.starts_with("ORD-20260307-"), "{number}");
        let suffix = &number["ORD-20260307-".len()..];
        assert_eq!(suffix.len(), 12);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_distinct() {
        let now = Utc::now();
        let numbers: std::collections::HashSet<_> =
            (0..1000).map(|_| generate_order_number(now)).collect();
        assert_eq!(numbers.len(), 1000);
    }
}
