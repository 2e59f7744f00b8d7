use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{controllers::home_controller, AppState};

pub mod home_routes;
pub mod check_alerts_routes;
pub mod alerts_admin_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = check_alerts_routes::add_routes(router);
    let router = alerts_admin_routes::add_routes(router);

    router
        .fallback(home_controller::not_found)
        // cron gate first, request tracing around everything
        .layer(from_fn_with_state(state.clone(), crate::auth::require_cron_auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
