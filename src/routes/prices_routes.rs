use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::prices_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/prices/hourly", get(prices_controller::get_hourly))
        .route("/prices/alerts", post(prices_controller::post_create_alert))
        .route("/prices/swap-rate", get(prices_controller::get_swap_rate))
}
