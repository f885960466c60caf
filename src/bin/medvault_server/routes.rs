//! HTTP route registration for the medvault server.

use super::*;

pub(super) fn authed_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/whoami", get(whoami))
        .route("/delegate", post(delegate))
        .route("/links", post(create_link))
        .route("/tokens/revoke-all", post(revoke_all_tokens))
        .route("/capabilities", post(issue_capability))
        .route("/records", get(list_records).post(create_record))
        .route(
            "/records/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
        .layer(middleware::from_fn_with_state(state, require_token))
}

pub(super) fn app(state: Arc<AppState>) -> Router {
    let authed = authed_router(state.clone());
    Router::new()
        .route("/healthz", get(healthz))
        .route("/login", post(login))
        .route("/capabilities/redeem", post(redeem_capability))
        .merge(authed)
        .with_state(state)
}
