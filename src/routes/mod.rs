use axum::Router;

use crate::{controllers::home_controller, AppState};

pub mod home_routes;
pub mod prices_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = prices_routes::add_routes(router);

    router
        .fallback(home_controller::not_found)
        .with_state(state)
}
