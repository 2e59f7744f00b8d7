pub mod user;
pub mod stock_alert;
pub mod portfolio_alert;

pub use user::User;
pub use stock_alert::StockAlert;
pub use portfolio_alert::PortfolioAlert;
