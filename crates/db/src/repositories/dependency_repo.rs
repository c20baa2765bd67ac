//! Repository for the `project_version_dependencies` table.

use hangar_core::dependency::PluginDependency;
use hangar_core::namespace::ProjectNamespace;
use hangar_core::platform::Platform;
use hangar_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::dependency::{
    group_by_platform, DependencyRow, DependentVersion, VersionDependencies,
};

/// Dependency columns with the referenced project's namespace joined under `pn_`.
const SELECT_JOINED: &str = "SELECT d.platform, d.name, d.required, d.external_url, \
        p.owner_name AS pn_owner, p.slug AS pn_slug \
     FROM project_version_dependencies d \
     LEFT JOIN projects p ON p.id = d.project_id";

#[derive(Debug, thiserror::Error)]
pub enum DependencyRepoError {
    /// The version being written does not exist.
    #[error("Project version not found: {0}")]
    UnknownVersion(DbId),

    /// A namespaced dependency points at a project that does not exist.
    #[error("Project not found: {0}")]
    UnknownProject(ProjectNamespace),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub struct DependencyRepo;

impl DependencyRepo {
    /// Whether a version with this id exists.
    pub async fn version_exists(pool: &PgPool, version_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM project_versions WHERE id = $1)",
        )
        .bind(version_id)
        .fetch_one(pool)
        .await
    }

    /// All dependencies of a version, grouped by platform.
    pub async fn list_for_version(
        pool: &PgPool,
        version_id: DbId,
    ) -> Result<VersionDependencies, sqlx::Error> {
        let query = format!("{SELECT_JOINED} WHERE d.version_id = $1 ORDER BY d.platform, d.id");
        let rows = sqlx::query_as::<_, DependencyRow>(&query)
            .bind(version_id)
            .fetch_all(pool)
            .await?;
        Ok(group_by_platform(rows))
    }

    /// Dependencies of a version for a single platform.
    pub async fn list_for_platform(
        pool: &PgPool,
        version_id: DbId,
        platform: Platform,
    ) -> Result<Vec<PluginDependency>, sqlx::Error> {
        let query = format!(
            "{SELECT_JOINED} WHERE d.version_id = $1 AND d.platform = $2 ORDER BY d.id"
        );
        let rows = sqlx::query_as::<_, DependencyRow>(&query)
            .bind(version_id)
            .bind(platform.as_str())
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.dependency).collect())
    }

    /// Replace the dependencies a version declares for `platform`.
    ///
    /// Runs in one transaction holding a row lock on the version, so
    /// concurrent replaces of the same version apply one after the other.
    /// Namespaced dependencies are resolved to a project id first; if any
    /// project is missing nothing is changed.
    pub async fn replace_for_platform(
        pool: &PgPool,
        version_id: DbId,
        platform: Platform,
        deps: &[PluginDependency],
    ) -> Result<Vec<PluginDependency>, DependencyRepoError> {
        let mut tx = pool.begin().await?;

        sqlx::query_scalar::<_, DbId>("SELECT id FROM project_versions WHERE id = $1 FOR UPDATE")
            .bind(version_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DependencyRepoError::UnknownVersion(version_id))?;

        sqlx::query(
            "DELETE FROM project_version_dependencies WHERE version_id = $1 AND platform = $2",
        )
        .bind(version_id)
        .bind(platform.as_str())
        .execute(&mut *tx)
        .await?;

        for dep in deps {
            let project_id = match dep.namespace() {
                Some(ns) => Some(resolve_project(&mut tx, ns).await?),
                None => None,
            };

            sqlx::query(
                "INSERT INTO project_version_dependencies \
                    (version_id, platform, name, required, project_id, external_url) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(version_id)
            .bind(platform.as_str())
            .bind(dep.name())
            .bind(dep.is_required())
            .bind(project_id)
            .bind(dep.external_url())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(
            version_id,
            %platform,
            count = deps.len(),
            "Replaced version dependencies"
        );

        Ok(Self::list_for_platform(pool, version_id, platform).await?)
    }

    /// Versions that declare a dependency on the project at `namespace`.
    pub async fn find_dependents(
        pool: &PgPool,
        namespace: &ProjectNamespace,
    ) -> Result<Vec<DependentVersion>, sqlx::Error> {
        sqlx::query_as::<_, DependentVersion>(
            "SELECT v.id AS version_id, v.version_string, dp.owner_name, dp.slug, \
                    d.platform, d.required, v.created_at \
             FROM project_version_dependencies d \
             JOIN projects target ON target.id = d.project_id \
             JOIN project_versions v ON v.id = d.version_id \
             JOIN projects dp ON dp.id = v.project_id \
             WHERE lower(target.owner_name) = lower($1) AND lower(target.slug) = lower($2) \
             ORDER BY v.created_at DESC, d.platform",
        )
        .bind(&namespace.owner)
        .bind(&namespace.slug)
        .fetch_all(pool)
        .await
    }
}

async fn resolve_project(
    conn: &mut PgConnection,
    namespace: &ProjectNamespace,
) -> Result<DbId, DependencyRepoError> {
    sqlx::query_scalar::<_, DbId>(
        "SELECT id FROM projects WHERE lower(owner_name) = lower($1) AND lower(slug) = lower($2)",
    )
    .bind(&namespace.owner)
    .bind(&namespace.slug)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DependencyRepoError::UnknownProject(namespace.clone()))
}
