use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::check_alerts_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/check-alerts", get(check_alerts_controller::run_check_alerts))
        .route("/check-alerts", post(check_alerts_controller::run_check_alerts))
}
