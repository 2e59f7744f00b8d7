//! The scheduled alert-evaluation pass.
//!
//! One invocation is a single linear sweep: list the active stock alerts,
//! group them by symbol so each distinct ticker costs one quote call, fetch
//! the price, evaluate every alert in the group, apply the state transition
//! and send notifications for the ones that fired; then the same sweep for
//! portfolio alerts. A failed price lookup skips that symbol's alerts for
//! this run; a failed notification never blocks the next alert or the state
//! mutation that already happened. Whatever goes wrong lands in the run's
//! error list, not in a panic.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tokio::time;

use crate::{
    services::{alert_store, conditions, notifier},
    AppState,
};

#[derive(Debug, Default, Clone, Serialize)]
pub struct CategoryCounters {
    pub checked: u32,
    pub triggered: u32,
    #[serde(rename = "emailsSent")]
    pub emails_sent: u32,
}

/// Per-run accumulator, constructed fresh for every invocation and returned
/// to the caller even when the run aborts halfway.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunResults {
    #[serde(rename = "stockAlerts")]
    pub stock_alerts: CategoryCounters,
    #[serde(rename = "portfolioAlerts")]
    pub portfolio_alerts: CategoryCounters,
    pub errors: Vec<String>,
}

/// Buckets alerts by upper-cased symbol. Items whose symbol callback returns
/// `None` (portfolio-level alert types with no ticker) are left out; they are
/// not price-evaluated in this pass.
pub fn group_by_symbol<T, F>(items: Vec<T>, symbol_of: F) -> HashMap<String, Vec<T>>
where
    F: Fn(&T) -> Option<String>,
{
    let mut map: HashMap<String, Vec<T>> = HashMap::new();
    for item in items {
        let Some(sym) = symbol_of(&item) else { continue };
        map.entry(sym.to_uppercase()).or_default().push(item);
    }
    map
}

/// Fixed courtesy pause so consecutive symbol groups don't burst the quote
/// provider. One pacer spans the whole run, so the spacing also holds between
/// the last stock group and the first portfolio group.
struct GroupPacer {
    pause: Duration,
    first: bool,
}

impl GroupPacer {
    fn new(pause_ms: u64) -> Self {
        Self {
            pause: Duration::from_millis(pause_ms),
            first: true,
        }
    }

    fn should_wait(&mut self) -> bool {
        if self.first {
            self.first = false;
            return false;
        }
        !self.pause.is_zero()
    }

    async fn wait(&mut self) {
        if self.should_wait() {
            time::sleep(self.pause).await;
        }
    }
}

/// Runs one full evaluation pass, accumulating into `results`.
///
/// Expected failures (price unavailable, one notification channel down) are
/// recovered inside the loops and recorded in `results.errors`. Only store
/// listing failures propagate; the caller still holds the partial `results`.
pub async fn run(state: &AppState, results: &mut RunResults) -> Result<(), String> {
    let mut pacer = GroupPacer::new(state.settings.symbol_pause_ms);
    check_stock_alerts(state, results, &mut pacer).await?;
    check_portfolio_alerts(state, results, &mut pacer).await?;
    Ok(())
}

async fn check_stock_alerts(
    state: &AppState,
    results: &mut RunResults,
    pacer: &mut GroupPacer,
) -> Result<(), String> {
    let active = alert_store::list_active_stock_alerts(state).await?;
    let groups = group_by_symbol(active, |a| Some(a.alert.symbol.clone()));

    for (symbol, group) in groups {
        pacer.wait().await;

        let Some(price) = state.quotes.current_price(&symbol).await else {
            results.errors.push(format!("price unavailable for {symbol}"));
            continue;
        };

        for entry in group {
            results.stock_alerts.checked += 1;

            // Single pass: no previous price is tracked, so crossing
            // conditions cannot fire here.
            let triggered = conditions::stock_alert_triggered(
                &entry.alert.condition,
                entry.alert.target_price,
                price,
                None,
            );
            if !triggered {
                continue;
            }

            match alert_store::deactivate_stock_alert(state, entry.alert.id).await {
                Ok(true) => {}
                // Another run already flipped it; skip notifications.
                Ok(false) => continue,
                Err(e) => {
                    results.errors.push(format!(
                        "alert {}: deactivate failed: {e}",
                        entry.alert.id.to_hex()
                    ));
                    continue;
                }
            }

            results.stock_alerts.triggered += 1;
            tracing::info!(
                symbol = %symbol,
                alert_id = %entry.alert.id.to_hex(),
                price,
                "stock alert triggered"
            );

            let email_sent = notifier::dispatch_stock_alert(
                state,
                &entry.alert,
                entry.user_email.as_deref(),
                price,
                &mut results.errors,
            )
            .await;
            if email_sent {
                results.stock_alerts.emails_sent += 1;
            }
        }
    }

    Ok(())
}

async fn check_portfolio_alerts(
    state: &AppState,
    results: &mut RunResults,
    pacer: &mut GroupPacer,
) -> Result<(), String> {
    let active = alert_store::list_active_portfolio_alerts(state).await?;
    let groups = group_by_symbol(active, |a| a.alert.symbol.clone());

    for (symbol, group) in groups {
        pacer.wait().await;

        let Some(price) = state.quotes.current_price(&symbol).await else {
            results.errors.push(format!("price unavailable for {symbol}"));
            continue;
        };

        for entry in group {
            results.portfolio_alerts.checked += 1;

            let triggered = conditions::portfolio_alert_triggered(
                &entry.alert.alert_type,
                entry.alert.condition_value,
                entry.alert.condition_percent,
                price,
            );
            if !triggered {
                continue;
            }

            let new_count = entry.alert.trigger_count + 1;
            if let Err(e) =
                alert_store::bump_portfolio_alert(state, entry.alert.id, new_count).await
            {
                results.errors.push(format!(
                    "alert {}: trigger update failed: {e}",
                    entry.alert.id.to_hex()
                ));
                continue;
            }

            results.portfolio_alerts.triggered += 1;
            tracing::info!(
                symbol = %symbol,
                alert_id = %entry.alert.id.to_hex(),
                price,
                trigger_count = new_count,
                "portfolio alert triggered"
            );

            let email_sent = notifier::dispatch_portfolio_alert(
                state,
                &entry.alert,
                entry.user_email.as_deref(),
                price,
                &mut results.errors,
            )
            .await;
            if email_sent {
                results.portfolio_alerts.emails_sent += 1;
            }
        }
    }

    Ok(())
}

/// Optional in-process scheduler for deployments without a platform cron.
/// Runs the same pass the HTTP endpoint runs, on a fixed interval.
pub fn spawn_alert_scheduler(state: AppState) {
    let every = state.settings.check_interval_secs;
    if every == 0 {
        return;
    }

    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(every));

        loop {
            interval.tick().await;

            let mut results = RunResults::default();
            match run(&state, &mut results).await {
                Ok(()) => tracing::info!(
                    stock_checked = results.stock_alerts.checked,
                    stock_triggered = results.stock_alerts.triggered,
                    portfolio_checked = results.portfolio_alerts.checked,
                    portfolio_triggered = results.portfolio_alerts.triggered,
                    errors = results.errors.len(),
                    "alert check tick finished"
                ),
                Err(e) => tracing::error!(error = %e, "alert check tick failed"),
            }
        }
    });
}
