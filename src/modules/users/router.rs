use axum::{Router, routing::get};

use crate::modules::users::controller::{add_address, get_addresses, get_me, update_me};
use crate::state::AppState;

/// Profile and address routes. Every route here requires a session; the
/// gate is attached by the caller.
pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route("/addresses", get(get_addresses).post(add_address))
}
