//! Accounting-equation checks over the onboarding balance sheet.

use serde::Serialize;
use tracing::{debug, info};

use tally_domain::{FinancialSnapshot, LineItems, Money, REQUIRED_EQUITY_KEYS, RETAINED_EARNINGS};

/// Per-section totals of a snapshot.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct BalanceTotals {
    pub assets: Money,
    pub liabilities: Money,
    pub equity: Money,
}

/// Result of checking `Assets = Liabilities + Equity`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct BalanceResult {
    pub assets_total: Money,
    pub liabilities_total: Money,
    pub equity_total: Money,
    /// `assets - (liabilities + equity)`.
    pub difference: Money,
    pub balanced: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub enum BalanceStatus {
    #[default]
    Unknown,
    Balanced,
    Unbalanced,
}

impl BalanceStatus {
    pub fn of(result: &BalanceResult) -> Self {
        if result.balanced {
            BalanceStatus::Balanced
        } else {
            BalanceStatus::Unbalanced
        }
    }
}

/// What [`ReconciliationService::auto_adjust`] did to the snapshot.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AdjustmentOutcome {
    pub previous_retained_earnings: Money,
    pub new_retained_earnings: Money,
    pub applied: bool,
    pub result: BalanceResult,
}

/// Strips `$`, `,`, `_` and whitespace and parses the rest, rounding to the
/// nearest cent. Empty or unparsable input is zero.
pub fn normalize_amount(raw: &str) -> Money {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | '_') && !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Money::ZERO;
    }
    cleaned
        .parse::<f64>()
        .map(Money::from_f64)
        .unwrap_or(Money::ZERO)
}

fn sum(items: &LineItems) -> Money {
    items.values().map(|raw| normalize_amount(raw)).sum()
}

/// Balance checks and the retained-earnings plug.
pub struct ReconciliationService;

impl ReconciliationService {
    /// Sums every asset and liability line and the required equity lines.
    pub fn compute_totals(snapshot: &FinancialSnapshot) -> BalanceTotals {
        let equity = REQUIRED_EQUITY_KEYS
            .iter()
            .filter_map(|key| snapshot.equity.get(*key))
            .map(|raw| normalize_amount(raw))
            .sum();
        BalanceTotals {
            assets: sum(&snapshot.assets),
            liabilities: sum(&snapshot.liabilities),
            equity,
        }
    }

    pub fn check_balance(snapshot: &FinancialSnapshot) -> BalanceResult {
        let totals = Self::compute_totals(snapshot);
        let difference = totals.assets - (totals.liabilities + totals.equity);
        BalanceResult {
            assets_total: totals.assets,
            liabilities_total: totals.liabilities,
            equity_total: totals.equity,
            difference,
            // Lines are rounded to cents on entry, so sub-cent input such as
            // "0.006" counts as one cent and never balances by tolerance.
            balanced: difference.is_zero(),
        }
    }

    /// Forces balance by adding the difference to retained earnings. This is
    /// the only line ever rewritten; a balanced snapshot is left untouched.
    pub fn auto_adjust(snapshot: &mut FinancialSnapshot) -> AdjustmentOutcome {
        let before = Self::check_balance(snapshot);
        let current = snapshot
            .retained_earnings()
            .map(normalize_amount)
            .unwrap_or(Money::ZERO);
        if before.balanced {
            debug!("snapshot already balanced; no adjustment");
            return AdjustmentOutcome {
                previous_retained_earnings: current,
                new_retained_earnings: current,
                applied: false,
                result: before,
            };
        }

        let adjusted = current + before.difference;
        snapshot.set_retained_earnings(adjusted.to_string());
        let after = Self::check_balance(snapshot);
        info!(
            difference = %before.difference,
            previous = %current,
            retained_earnings = %adjusted,
            balanced = after.balanced,
            "adjusted retained earnings"
        );
        AdjustmentOutcome {
            previous_retained_earnings: current,
            new_retained_earnings: adjusted,
            applied: true,
            result: after,
        }
    }

    /// Equity labels present in the snapshot but excluded from the balance check.
    pub fn ignored_equity_keys(snapshot: &FinancialSnapshot) -> Vec<String> {
        snapshot
            .equity
            .keys()
            .filter(|key| !REQUIRED_EQUITY_KEYS.contains(&key.as_str()))
            .cloned()
            .collect()
    }

    pub fn status(snapshot: &FinancialSnapshot) -> BalanceStatus {
        BalanceStatus::of(&Self::check_balance(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_domain::COMMON_STOCK;

    fn scenario() -> FinancialSnapshot {
        FinancialSnapshot::new()
            .with_asset("cash", "$10,000")
            .with_asset("accounts_receivable", "2000")
            .with_liability("accounts_payable", "1000")
            .with_equity(COMMON_STOCK, "5000")
            .with_equity(RETAINED_EARNINGS, "0")
    }

    #[test]
    fn normalize_amount_is_lenient() {
        assert_eq!(normalize_amount("$1,234.56"), Money::from_cents(123_456));
        assert_eq!(normalize_amount(""), Money::ZERO);
        assert_eq!(normalize_amount("garbage"), Money::ZERO);
        assert_eq!(normalize_amount("1000"), Money::from_units(1000));
        assert_eq!(normalize_amount(" -$2,500 "), Money::from_units(-2500));
        assert_eq!(normalize_amount("NaN"), Money::ZERO);
        assert_eq!(normalize_amount("1_000"), Money::from_units(1000));
        assert_eq!(normalize_amount("$12_500.25"), Money::from_cents(1_250_025));
    }

    #[test]
    fn sub_cent_lines_are_rounded_before_comparing() {
        let snapshot = FinancialSnapshot::new().with_asset("cash", "0.006");
        let result = ReconciliationService::check_balance(&snapshot);
        assert_eq!(result.difference, Money::from_cents(1));
        assert!(!result.balanced);

        let snapshot = FinancialSnapshot::new().with_asset("cash", "0.004");
        assert!(ReconciliationService::check_balance(&snapshot).balanced);
    }

    #[test]
    fn unbalanced_snapshot_reports_difference() {
        let result = ReconciliationService::check_balance(&scenario());
        assert_eq!(result.assets_total, Money::from_units(12_000));
        assert_eq!(result.liabilities_total, Money::from_units(1000));
        assert_eq!(result.equity_total, Money::from_units(5000));
        assert_eq!(result.difference, Money::from_units(6000));
        assert!(!result.balanced);
    }

    #[test]
    fn auto_adjust_plugs_retained_earnings() {
        let mut snapshot = scenario();
        let outcome = ReconciliationService::auto_adjust(&mut snapshot);

        assert!(outcome.applied);
        assert!(outcome.result.balanced);
        assert_eq!(snapshot.retained_earnings(), Some("6000"));
        assert_eq!(snapshot.assets, scenario().assets);
        assert_eq!(snapshot.liabilities, scenario().liabilities);
        assert_eq!(snapshot.equity.get(COMMON_STOCK), scenario().equity.get(COMMON_STOCK));
    }

    #[test]
    fn auto_adjust_is_idempotent() {
        let mut once = scenario();
        ReconciliationService::auto_adjust(&mut once);
        let mut twice = once.clone();
        let outcome = ReconciliationService::auto_adjust(&mut twice);

        assert!(!outcome.applied);
        assert_eq!(twice.retained_earnings(), once.retained_earnings());
        assert_eq!(twice, once);
    }

    #[test]
    fn other_equity_keys_are_ignored() {
        let snapshot = scenario().with_equity("preferred_stock", "6000");
        let result = ReconciliationService::check_balance(&snapshot);
        assert_eq!(result.equity_total, Money::from_units(5000));
        assert_eq!(
            ReconciliationService::ignored_equity_keys(&snapshot),
            vec!["preferred_stock".to_string()]
        );
    }

    #[test]
    fn missing_retained_earnings_is_created() {
        let mut snapshot = FinancialSnapshot::new()
            .with_asset("cash", "250.75")
            .with_liability("loan", "100");
        let outcome = ReconciliationService::auto_adjust(&mut snapshot);
        assert_eq!(outcome.previous_retained_earnings, Money::ZERO);
        assert_eq!(snapshot.retained_earnings(), Some("150.75"));
        assert_eq!(ReconciliationService::status(&snapshot), BalanceStatus::Balanced);
    }

    #[test]
    fn garbage_entries_count_as_zero() {
        let snapshot = FinancialSnapshot::new()
            .with_asset("cash", "lots")
            .with_asset("inventory", "$500")
            .with_equity(COMMON_STOCK, "five hundred");
        let result = ReconciliationService::check_balance(&snapshot);
        assert_eq!(result.assets_total, Money::from_units(500));
        assert_eq!(result.equity_total, Money::ZERO);
        assert_eq!(result.difference, Money::from_units(500));
    }

    #[test]
    fn overdrawn_snapshot_gets_negative_plug() {
        let mut snapshot = FinancialSnapshot::new()
            .with_asset("cash", "100")
            .with_liability("loan", "400")
            .with_equity(RETAINED_EARNINGS, "$50");
        ReconciliationService::auto_adjust(&mut snapshot);
        assert_eq!(snapshot.retained_earnings(), Some("-300"));
    }
}
