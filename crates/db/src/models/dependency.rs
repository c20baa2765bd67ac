//! Dependency rows from `project_version_dependencies`.

use std::collections::BTreeMap;

use hangar_core::dependency::PluginDependency;
use hangar_core::namespace::ProjectNamespace;
use hangar_core::platform::Platform;
use hangar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// Column prefix under which the referenced project's namespace is joined.
pub const NAMESPACE_PREFIX: &str = "pn";

/// Dependencies of one version, keyed by platform.
pub type VersionDependencies = BTreeMap<Platform, Vec<PluginDependency>>;

/// A dependency row joined with its referenced project, if any.
///
/// Expects the columns `platform`, `name`, `required`, `external_url`,
/// `pn_owner` and `pn_slug`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRow {
    pub platform: Platform,
    pub dependency: PluginDependency,
}

impl<'r> FromRow<'r, PgRow> for DependencyRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let platform: String = row.try_get("platform")?;
        let platform = platform
            .parse::<Platform>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "platform".to_string(),
                source: Box::new(e),
            })?;

        let dependency = PluginDependency::new(
            row.try_get("name")?,
            row.try_get("required")?,
            nested_namespace(row, NAMESPACE_PREFIX)?,
            row.try_get("external_url")?,
        );

        Ok(Self {
            platform,
            dependency,
        })
    }
}

/// Read a [`ProjectNamespace`] from `{prefix}_owner` / `{prefix}_slug`.
///
/// A left join with no matching project yields `None`.
pub fn nested_namespace(
    row: &PgRow,
    prefix: &str,
) -> Result<Option<ProjectNamespace>, sqlx::Error> {
    let owner_col = format!("{prefix}_owner");
    let slug_col = format!("{prefix}_slug");
    Ok(ProjectNamespace::from_parts(
        row.try_get(owner_col.as_str())?,
        row.try_get(slug_col.as_str())?,
    ))
}

/// Group rows by platform, preserving row order within each platform.
pub fn group_by_platform(rows: impl IntoIterator<Item = DependencyRow>) -> VersionDependencies {
    let mut grouped = VersionDependencies::new();
    for row in rows {
        grouped.entry(row.platform).or_default().push(row.dependency);
    }
    grouped
}

/// A version that declares a dependency on some project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DependentVersion {
    pub version_id: DbId,
    pub version_string: String,
    pub owner_name: String,
    pub slug: String,
    pub platform: String,
    pub required: bool,
    pub created_at: Timestamp,
}
