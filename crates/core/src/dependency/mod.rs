//! Dependency declarations attached to a plugin version.
//!
//! A dependency either points at another hosted project through its
//! [`ProjectNamespace`], or at an external resource through a URL. Whether
//! an instance actually satisfies those requirements is checked separately
//! by [`validation`], so rows and payloads can be inspected before being
//! accepted.

pub mod validation;

use serde::{Deserialize, Serialize, Serializer};

use crate::named::Named;
use crate::namespace::ProjectNamespace;

/// One dependency edge from a plugin version.
///
/// Immutable once built. Equality and hashing cover the four stored fields,
/// with the stored (not effective) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "DependencyPayload")]
pub struct PluginDependency {
    name: Option<String>,
    required: bool,
    namespace: Option<ProjectNamespace>,
    external_url: Option<String>,
}

impl PluginDependency {
    /// Build a dependency from all four fields.
    ///
    /// When a namespace is given the plain name is dropped: the project's
    /// slug is the only name a namespaced dependency has.
    pub fn new(
        name: Option<String>,
        required: bool,
        namespace: Option<ProjectNamespace>,
        external_url: Option<String>,
    ) -> Self {
        Self {
            name: if namespace.is_some() { None } else { name },
            required,
            namespace,
            external_url,
        }
    }

    /// A dependency known only by name, with no namespace and no URL.
    ///
    /// Intended for dependencies constructed in code (platform defaults and
    /// the like). The result is not locatable, so it fails
    /// [`validation::DependencyRule::Locatable`] if it is ever validated as
    /// user input.
    pub fn of(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: Some(name.into()),
            required,
            namespace: None,
            external_url: None,
        }
    }

    /// Effective name: the namespace slug if there is one, otherwise the stored name.
    pub fn name(&self) -> Option<&str> {
        match &self.namespace {
            Some(ns) => Some(&ns.slug),
            None => self.name.as_deref(),
        }
    }

    /// The stored name field, `None` whenever a namespace is present.
    pub fn raw_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn namespace(&self) -> Option<&ProjectNamespace> {
        self.namespace.as_ref()
    }

    pub fn external_url(&self) -> Option<&str> {
        self.external_url.as_deref()
    }
}

impl Named for PluginDependency {
    fn name(&self) -> Option<&str> {
        PluginDependency::name(self)
    }
}

/// Incoming JSON shape. Converted through [`PluginDependency::new`] so
/// payloads get the same name suppression as every other construction path.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DependencyPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    namespace: Option<ProjectNamespace>,
    #[serde(default)]
    external_url: Option<String>,
}

impl From<DependencyPayload> for PluginDependency {
    fn from(p: DependencyPayload) -> Self {
        PluginDependency::new(p.name, p.required, p.namespace, p.external_url)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DependencyView<'a> {
    name: Option<&'a str>,
    required: bool,
    namespace: Option<&'a ProjectNamespace>,
    external_url: Option<&'a str>,
}

impl Serialize for PluginDependency {
    /// Writes the effective name, so namespaced dependencies show their slug.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DependencyView {
            name: self.name(),
            required: self.required,
            namespace: self.namespace.as_ref(),
            external_url: self.external_url.as_deref(),
        }
        .serialize(serializer)
    }
}
