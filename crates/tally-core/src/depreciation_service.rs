//! Straight-line depreciation for fixed assets entered during onboarding.

use chrono::{Datelike, NaiveDate};

use tally_domain::Money;

/// Useful life in years by asset class.
pub const USEFUL_LIFE_YEARS: [(&str, f64); 16] = [
    ("Office Furniture", 7.0),
    ("Office Equipment", 5.0),
    ("Computers & Peripherals", 5.0),
    ("Software (Purchased)", 3.0),
    ("Vehicles", 5.0),
    ("Pharmacy Equipment", 7.0),
    ("Manufacturing Equipment", 10.0),
    ("Leasehold Improvements", 15.0),
    ("Commercial Building", 39.0),
    ("Residential Building", 27.5),
    ("Land Improvements", 15.0),
    ("Security Systems", 7.0),
    ("Medical Equipment", 7.0),
    ("Refrigeration Units", 7.0),
    ("POS Systems", 5.0),
    ("Signage (Exterior)", 10.0),
];

pub fn useful_life_years(asset_class: &str) -> Option<f64> {
    USEFUL_LIFE_YEARS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(asset_class.trim()))
        .map(|(_, years)| *years)
}

/// Months of service between purchase and reporting, counting the
/// reporting month once its day-of-month reaches the purchase day.
pub fn months_in_service(purchase: NaiveDate, reporting: NaiveDate) -> i64 {
    let mut months = i64::from(reporting.year() - purchase.year()) * 12
        + i64::from(reporting.month()) - i64::from(purchase.month());
    if reporting.day() >= purchase.day() {
        months += 1;
    }
    months
}

/// Accumulated depreciation, capped at cost. Invalid input yields zero.
pub fn accumulated_depreciation(
    cost: Money,
    purchase: NaiveDate,
    useful_life_years: f64,
    reporting: NaiveDate,
) -> Money {
    if !useful_life_years.is_finite() || useful_life_years <= 0.0 || cost.is_negative() {
        return Money::ZERO;
    }
    if reporting < purchase {
        return Money::ZERO;
    }
    let months = months_in_service(purchase, reporting).max(0) as f64;
    let monthly = cost.to_f64() / (useful_life_years * 12.0);
    let accumulated = Money::from_f64(monthly * months);
    accumulated.min(cost)
}

pub fn net_book_value(
    cost: Money,
    purchase: NaiveDate,
    useful_life_years: f64,
    reporting: NaiveDate,
) -> Money {
    cost - accumulated_depreciation(cost, purchase, useful_life_years, reporting)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_partial_reporting_month() {
        assert_eq!(months_in_service(date(2024, 1, 15), date(2024, 12, 31)), 12);
        assert_eq!(months_in_service(date(2024, 1, 31), date(2024, 12, 30)), 11);
    }

    #[test]
    fn straight_line_over_useful_life() {
        let cost = Money::from_units(6000);
        let accumulated = accumulated_depreciation(cost, date(2024, 1, 1), 5.0, date(2024, 12, 31));
        assert_eq!(accumulated, Money::from_units(1200));
        assert_eq!(
            net_book_value(cost, date(2024, 1, 1), 5.0, date(2024, 12, 31)),
            Money::from_units(4800)
        );
    }

    #[test]
    fn capped_at_cost_and_zero_for_bad_input() {
        let cost = Money::from_units(1000);
        assert_eq!(accumulated_depreciation(cost, date(2000, 1, 1), 3.0, date(2024, 12, 31)), cost);
        assert_eq!(accumulated_depreciation(cost, date(2024, 1, 1), 0.0, date(2024, 12, 31)), Money::ZERO);
        assert_eq!(accumulated_depreciation(cost, date(2025, 1, 1), 3.0, date(2024, 12, 31)), Money::ZERO);
    }

    #[test]
    fn looks_up_useful_life() {
        assert_eq!(useful_life_years("vehicles"), Some(5.0));
        assert_eq!(useful_life_years("Residential Building"), Some(27.5));
        assert_eq!(useful_life_years("Spaceship"), None);
    }
}
