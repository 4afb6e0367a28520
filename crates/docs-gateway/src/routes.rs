//! Route table
//!
//! Every Dropbox route except `/auth` sits behind the token header gate.
//! `/me` answers a missing token with 200 so clients can use it to probe
//! whether they are connected.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::controller::{self, auth, documents, sign, upload};
use crate::require_header::require_header;
use crate::AppState;

/// Mount point of the Dropbox routes
pub const DROPBOX_PREFIX: &str = "/private/dropbox";

pub fn router(state: Arc<AppState>) -> Router {
    let gate = state.token_gate.clone();
    let require_token = middleware::from_fn_with_state(gate.clone(), require_header);
    let probe_token = middleware::from_fn_with_state(gate.with_status(StatusCode::OK), require_header);

    let dropbox = Router::new()
        .route("/auth", post(auth::authorize_user))
        .route(
            "/me",
            get(auth::get_current_user).route_layer(probe_token),
        )
        .route(
            "/docs",
            get(documents::get_documents)
                .delete(documents::delete_document)
                .route_layer(require_token.clone()),
        )
        .route(
            "/register",
            post(documents::register_document).route_layer(require_token.clone()),
        )
        .route(
            "/save",
            post(documents::save_document).route_layer(require_token.clone()),
        )
        .route(
            "/upload",
            post(upload::upload_document).route_layer(require_token.clone()),
        )
        .route(
            "/sign-pdf",
            post(sign::sign_pdf).route_layer(require_token),
        );

    Router::new()
        .route("/health", get(controller::health))
        .nest(DROPBOX_PREFIX, dropbox)
        .layer(DefaultBodyLimit::max(state.config.uploads.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
