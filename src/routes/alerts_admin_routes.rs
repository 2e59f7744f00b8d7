use axum::{routing::get, Router};

use crate::{controllers::alerts_admin_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/admin/alerts/stock",
            get(alerts_admin_controller::get_active_stock_alerts),
        )
        .route(
            "/admin/alerts/portfolio",
            get(alerts_admin_controller::get_active_portfolio_alerts),
        )
}
