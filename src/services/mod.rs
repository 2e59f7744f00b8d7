pub mod quotes;
pub mod db_init;

pub mod conditions;
pub mod alert_store;
pub mod notifier;
pub mod check_alerts;
