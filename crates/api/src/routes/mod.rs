pub mod dependency;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /versions/{id}/dependencies                      list all platforms (GET)
/// /versions/{id}/dependencies/{platform}           replace one platform (PUT)
/// /projects/{owner}/{slug}/dependents              versions depending on a project (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(dependency::router())
}
