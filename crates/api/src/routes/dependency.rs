use axum::routing::{get, put};
use axum::Router;

use crate::handlers::dependency;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/versions/{id}/dependencies", get(dependency::list_for_version))
        .route(
            "/versions/{id}/dependencies/{platform}",
            put(dependency::replace_for_platform),
        )
        .route(
            "/projects/{owner}/{slug}/dependents",
            get(dependency::list_dependents),
        )
}
