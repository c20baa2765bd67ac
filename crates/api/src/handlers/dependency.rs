//! Handlers for version dependencies and reverse dependency lookups.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use hangar_core::dependency::validation::validate_dependency_set;
use hangar_core::dependency::PluginDependency;
use hangar_core::error::CoreError;
use hangar_core::linkout::{linkout, SafeHosts};
use hangar_core::namespace::ProjectNamespace;
use hangar_core::platform::Platform;
use hangar_core::types::DbId;
use hangar_db::models::dependency::DependentVersion;
use hangar_db::repositories::DependencyRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A dependency as returned to clients, with a render-safe link for its URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyResponse {
    #[serde(flatten)]
    pub dependency: PluginDependency,
    pub linkout_url: Option<String>,
}

impl DependencyResponse {
    pub fn new(dependency: PluginDependency, safe_hosts: &SafeHosts) -> Self {
        let linkout_url = dependency.external_url().map(|url| linkout(url, safe_hosts));
        Self {
            dependency,
            linkout_url,
        }
    }
}

fn to_responses(deps: Vec<PluginDependency>, safe_hosts: &SafeHosts) -> Vec<DependencyResponse> {
    deps.into_iter()
        .map(|d| DependencyResponse::new(d, safe_hosts))
        .collect()
}

async fn ensure_version_exists(state: &AppState, id: DbId) -> AppResult<()> {
    if DependencyRepo::version_exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ProjectVersion",
            id,
        }))
    }
}

/// GET /api/v1/versions/{id}/dependencies
pub async fn list_for_version(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BTreeMap<Platform, Vec<DependencyResponse>>>>> {
    ensure_version_exists(&state, id).await?;

    let safe_hosts = &state.config.safe_download_hosts;
    let grouped = DependencyRepo::list_for_version(&state.pool, id)
        .await?
        .into_iter()
        .map(|(platform, deps)| (platform, to_responses(deps, safe_hosts)))
        .collect();

    Ok(Json(DataResponse { data: grouped }))
}

/// PUT /api/v1/versions/{id}/dependencies/{platform}
///
/// Replaces every dependency the version declares for `platform`.
pub async fn replace_for_platform(
    State(state): State<AppState>,
    Path((id, platform)): Path<(DbId, String)>,
    Json(deps): Json<Vec<PluginDependency>>,
) -> AppResult<Json<DataResponse<Vec<DependencyResponse>>>> {
    let platform: Platform = platform
        .parse()
        .map_err(|e| AppError::BadRequest(format!("{e}")))?;

    if let Err(err) = validate_dependency_set(&deps) {
        tracing::debug!(version_id = id, %platform, error = %err, "Rejected dependency set");
        return Err(err.into());
    }

    let stored = DependencyRepo::replace_for_platform(&state.pool, id, platform, &deps).await?;
    tracing::info!(
        version_id = id,
        %platform,
        count = stored.len(),
        "Updated version dependencies"
    );

    Ok(Json(DataResponse {
        data: to_responses(stored, &state.config.safe_download_hosts),
    }))
}

/// GET /api/v1/projects/{owner}/{slug}/dependents
pub async fn list_dependents(
    State(state): State<AppState>,
    Path((owner, slug)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Vec<DependentVersion>>>> {
    let namespace = ProjectNamespace::new(owner, slug);
    let dependents = DependencyRepo::find_dependents(&state.pool, &namespace).await?;
    Ok(Json(DataResponse { data: dependents }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn response_flattens_dependency_and_adds_linkout() {
        let safe = SafeHosts::new(["github.com"]);
        let dep = PluginDependency::new(
            Some("Vault".into()),
            true,
            None,
            Some("https://example.com/vault.jar".into()),
        );

        let value = serde_json::to_value(DependencyResponse::new(dep, &safe)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Vault",
                "required": true,
                "namespace": null,
                "externalUrl": "https://example.com/vault.jar",
                "linkoutUrl": "/linkout?remoteUrl=https%3A%2F%2Fexample.com%2Fvault.jar"
            })
        );
    }

    #[test]
    fn namespaced_dependency_has_no_linkout() {
        let dep = PluginDependency::new(
            None,
            false,
            Some(ProjectNamespace::new("PaperMC", "Paper")),
            None,
        );
        let response = DependencyResponse::new(dep, &SafeHosts::default());
        assert_eq!(response.linkout_url, None);
    }
}
