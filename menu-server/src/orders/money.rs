//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;
use shared::models::{LineItem, SelectedOption};

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Unit price: base price plus every selected option delta
pub fn unit_price(base_price: f64, options: &[SelectedOption]) -> Decimal {
    let deltas: Decimal = options.iter().map(|o| to_decimal(o.price)).sum();
    round_money(to_decimal(base_price) + deltas)
}

/// Order totals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Formula: subtotal = Σ price × quantity, tax = round(subtotal × rate), total = subtotal + tax
pub fn calculate_totals(items: &[LineItem], tax_rate: f64) -> Totals {
    let subtotal: Decimal = items
        .iter()
        .map(|item| to_decimal(item.price) * Decimal::from(item.quantity))
        .sum();
    let subtotal = round_money(subtotal);
    let tax = round_money(subtotal * to_decimal(tax_rate));
    let total = subtotal + tax;

    Totals {
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        total: to_f64(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: f64, quantity: u32) -> LineItem {
        LineItem {
            menu_item_id: "m".into(),
            name: "Item".into(),
            price,
            quantity,
            selected_options: vec![],
            special_instructions: None,
        }
    }

    #[test]
    fn test_to_decimal_precision() {
        let sum = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum), 0.3);
    }

    #[test]
    fn test_basic_totals() {
        let totals = calculate_totals(&[line(15.0, 2)], 0.15);
        assert_eq!(totals.subtotal, 30.0);
        assert_eq!(totals.tax, 4.5);
        assert_eq!(totals.total, 34.5);
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        // 0.10 * 0.15 = 0.015 → 0.02
        let totals = calculate_totals(&[line(0.1, 1)], 0.15);
        assert_eq!(totals.tax, 0.02);
        assert_eq!(totals.total, 0.12);
    }

    #[test]
    fn test_many_lines_no_drift() {
        let items: Vec<LineItem> = (0..100).map(|_| line(0.01, 1)).collect();
        let totals = calculate_totals(&items, 0.15);
        assert_eq!(totals.subtotal, 1.0);
        assert_eq!(totals.tax, 0.15);
        assert_eq!(totals.total, 1.15);
    }

    #[test]
    fn test_unit_price_with_options() {
        let options = vec![
            SelectedOption {
                name: "Size".into(),
                choice: "Large".into(),
                price: 2.5,
            },
            SelectedOption {
                name: "Extras".into(),
                choice: "Cheese".into(),
                price: 0.75,
            },
        ];
        assert_eq!(to_f64(unit_price(10.0, &options)), 13.25);
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let items = vec![line(12.99, 3), line(4.49, 1), line(0.0, 5)];
        let t = calculate_totals(&items, 0.15);
        assert_eq!(t.subtotal, 43.46);
        assert_eq!(to_f64(to_decimal(t.subtotal) + to_decimal(t.tax)), t.total);
    }
}
