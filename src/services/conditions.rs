//! Pure trigger predicates. No I/O here so the decision logic is testable in
//! isolation from the store and the quote providers.

/// Trigger decision for a one-shot stock alert.
///
/// `above`/`below` are boundary-inclusive on purpose: a price exactly at the
/// target counts for both. The crossing conditions need a previous price and
/// never fire without one.
pub fn stock_alert_triggered(
    condition: &str,
    target_price: f64,
    current_price: f64,
    previous_price: Option<f64>,
) -> bool {
    match condition {
        "above" => current_price >= target_price,
        "below" => current_price <= target_price,
        "crosses_above" => {
            matches!(previous_price, Some(prev) if prev < target_price && current_price >= target_price)
        }
        "crosses_below" => {
            matches!(previous_price, Some(prev) if prev > target_price && current_price <= target_price)
        }
        // Unknown condition kinds never trigger.
        _ => false,
    }
}

/// Trigger decision for a recurring portfolio alert, for the alert types that
/// can be decided from a single price.
///
/// `percent_change` triggers whenever a percent threshold is configured:
/// there is no stored baseline to compute an actual delta against. Kept for
/// behavioral parity with production (see DESIGN.md).
///
/// `portfolio_value`, `daily_gain_loss` and `news` are not price-evaluated
/// and never trigger here.
pub fn portfolio_alert_triggered(
    alert_type: &str,
    condition_value: Option<f64>,
    condition_percent: Option<f64>,
    current_price: f64,
) -> bool {
    match alert_type {
        "price_above" => matches!(condition_value, Some(v) if current_price >= v),
        "price_below" => matches!(condition_value, Some(v) if current_price <= v),
        "percent_change" => condition_percent.is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn above_and_below_compare_against_target() {
        assert!(stock_alert_triggered("above", 150.0, 152.30, None));
        assert!(!stock_alert_triggered("above", 150.0, 149.99, None));
        assert!(stock_alert_triggered("below", 150.0, 145.0, None));
        assert!(!stock_alert_triggered("below", 150.0, 150.01, None));
    }

    #[test]
    fn exact_target_price_triggers_both_sides() {
        // Boundary-inclusive on both sides, reproduced from production.
        assert!(stock_alert_triggered("above", 150.0, 150.0, None));
        assert!(stock_alert_triggered("below", 150.0, 150.0, None));
    }

    #[test]
    fn crossings_never_trigger_without_history() {
        for price in [0.01, 199.99, 200.0, 200.01, 10_000.0] {
            assert!(!stock_alert_triggered("crosses_above", 200.0, price, None));
            assert!(!stock_alert_triggered("crosses_below", 200.0, price, None));
        }
    }

    #[test]
    fn crosses_above_needs_prior_price_under_target() {
        assert!(stock_alert_triggered("crosses_above", 200.0, 201.0, Some(195.0)));
        // Already at or past the target before: not a crossing.
        assert!(!stock_alert_triggered("crosses_above", 200.0, 201.0, Some(200.0)));
        // Still under the target now: not a crossing.
        assert!(!stock_alert_triggered("crosses_above", 200.0, 199.0, Some(195.0)));
    }

    #[test]
    fn crosses_below_needs_prior_price_over_target() {
        assert!(stock_alert_triggered("crosses_below", 200.0, 198.0, Some(205.0)));
        assert!(!stock_alert_triggered("crosses_below", 200.0, 198.0, Some(200.0)));
        assert!(!stock_alert_triggered("crosses_below", 200.0, 201.0, Some(205.0)));
    }

    #[test]
    fn unknown_condition_never_triggers() {
        assert!(!stock_alert_triggered("sideways", 150.0, 150.0, Some(150.0)));
        assert!(!stock_alert_triggered("", 150.0, 9_999.0, None));
    }

    #[test]
    fn portfolio_price_thresholds_need_a_condition_value() {
        assert!(portfolio_alert_triggered("price_below", Some(50.0), None, 45.0));
        assert!(!portfolio_alert_triggered("price_below", Some(50.0), None, 55.0));
        assert!(portfolio_alert_triggered("price_above", Some(50.0), None, 55.0));
        assert!(!portfolio_alert_triggered("price_above", None, None, 55.0));
        assert!(!portfolio_alert_triggered("price_below", None, None, 1.0));
    }

    #[test]
    fn percent_change_triggers_whenever_configured() {
        // Parity with production: no baseline exists, so a configured percent
        // threshold is treated as triggered.
        assert!(portfolio_alert_triggered("percent_change", None, Some(5.0), 100.0));
        assert!(!portfolio_alert_triggered("percent_change", None, None, 100.0));
    }

    #[test]
    fn non_price_alert_types_are_not_evaluated_here() {
        for t in ["portfolio_value", "daily_gain_loss", "news", "bogus"] {
            assert!(!portfolio_alert_triggered(t, Some(1.0), Some(1.0), 1_000_000.0));
        }
    }
}
