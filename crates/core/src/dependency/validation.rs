//! Cross-field rules for dependency declarations.
//!
//! Construction never fails; these checks run at the boundary where user
//! input is accepted. Blank strings count as missing.

use std::borrow::Cow;
use std::collections::HashSet;

use validator::{Validate, ValidationError, ValidationErrors};

use super::PluginDependency;
use crate::error::CoreError;

/// A cross-field requirement a dependency can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyRule {
    /// Needs a namespace or an external URL.
    Locatable,
    /// Needs a name or a namespace.
    Nameable,
}

impl DependencyRule {
    pub fn code(self) -> &'static str {
        match self {
            DependencyRule::Locatable => "dependency_locatable",
            DependencyRule::Nameable => "dependency_nameable",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DependencyRule::Locatable => {
                "Must specify a namespace or external URL for a dependency"
            }
            DependencyRule::Nameable => "Must specify a name or namespace for a dependency",
        }
    }

    fn to_validation_error(self) -> ValidationError {
        let mut err = ValidationError::new(self.code());
        err.message = Some(Cow::Borrowed(self.message()));
        err
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

/// Every rule `dep` violates, in declaration order.
pub fn dependency_violations(dep: &PluginDependency) -> Vec<DependencyRule> {
    let has_namespace = dep.namespace().is_some();
    let mut violations = Vec::new();

    if !has_namespace && !is_present(dep.external_url()) {
        violations.push(DependencyRule::Locatable);
    }
    if !has_namespace && !is_present(dep.raw_name()) {
        violations.push(DependencyRule::Nameable);
    }

    violations
}

/// Reject `dep` with the message of the first rule it violates.
pub fn ensure_valid(dep: &PluginDependency) -> Result<(), CoreError> {
    match dependency_violations(dep).first() {
        Some(rule) => Err(CoreError::Validation(rule.message().to_string())),
        None => Ok(()),
    }
}

/// Validate all dependencies declared for one platform.
///
/// Each entry must pass its own rules, and no two entries may share an
/// effective name (compared case-insensitively).
pub fn validate_dependency_set(deps: &[PluginDependency]) -> Result<(), CoreError> {
    let mut seen = HashSet::new();

    for (index, dep) in deps.iter().enumerate() {
        ensure_valid(dep).map_err(|err| match err {
            CoreError::Validation(msg) => {
                CoreError::Validation(format!("dependencies[{index}]: {msg}"))
            }
            other => other,
        })?;

        if let Some(name) = dep.name() {
            if !seen.insert(name.to_lowercase()) {
                return Err(CoreError::Conflict(format!(
                    "Duplicate dependency name: {name}"
                )));
            }
        }
    }

    Ok(())
}

impl Validate for PluginDependency {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let violations = dependency_violations(self);
        if violations.is_empty() {
            return Ok(());
        }

        let mut errors = ValidationErrors::new();
        for rule in violations {
            errors.add("__all__", rule.to_validation_error());
        }
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::namespace::ProjectNamespace;

    fn ns() -> Option<ProjectNamespace> {
        Some(ProjectNamespace::new("PaperMC", "Paper"))
    }

    #[test]
    fn namespaced_dependency_is_valid() {
        let dep = PluginDependency::new(None, true, ns(), None);
        assert!(dependency_violations(&dep).is_empty());
        assert!(dep.validate().is_ok());
    }

    #[test]
    fn named_external_dependency_is_valid() {
        let dep = PluginDependency::new(
            Some("Vault".into()),
            false,
            None,
            Some("https://github.com/MilkBowl/Vault".into()),
        );
        assert!(dependency_violations(&dep).is_empty());
    }

    #[test]
    fn missing_namespace_and_url_is_not_locatable() {
        for required in [true, false] {
            let dep = PluginDependency::new(Some("Vault".into()), required, None, None);
            assert_eq!(dependency_violations(&dep), vec![DependencyRule::Locatable]);
        }
    }

    #[test]
    fn missing_name_and_namespace_is_not_nameable() {
        for required in [true, false] {
            let dep = PluginDependency::new(None, required, None, Some("https://x.io".into()));
            assert_eq!(dependency_violations(&dep), vec![DependencyRule::Nameable]);
        }
    }

    #[test]
    fn empty_dependency_violates_both_rules() {
        let dep = PluginDependency::new(None, false, None, None);
        assert_eq!(
            dependency_violations(&dep),
            vec![DependencyRule::Locatable, DependencyRule::Nameable]
        );
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let dep = PluginDependency::new(Some("  ".into()), false, None, Some(String::new()));
        assert_eq!(
            dependency_violations(&dep),
            vec![DependencyRule::Locatable, DependencyRule::Nameable]
        );
    }

    #[test]
    fn factory_dependency_is_not_locatable() {
        let dep = PluginDependency::of("spigot-api", true);
        assert_eq!(dependency_violations(&dep), vec![DependencyRule::Locatable]);
    }

    #[test]
    fn ensure_valid_reports_rule_message() {
        let dep = PluginDependency::of("spigot-api", true);
        assert_matches!(
            ensure_valid(&dep),
            Err(CoreError::Validation(msg))
                if msg == "Must specify a namespace or external URL for a dependency"
        );
    }

    #[test]
    fn validate_reports_schema_errors() {
        let dep = PluginDependency::new(None, false, None, None);
        let errors = dep.validate().unwrap_err();
        let all = errors.field_errors();
        let schema = all.get("__all__").expect("schema errors");
        assert_eq!(schema.len(), 2);
        assert_eq!(schema[0].code, "dependency_locatable");
        assert_eq!(
            schema[1].message.as_deref(),
            Some("Must specify a name or namespace for a dependency")
        );
    }

    #[test]
    fn set_reports_index_of_invalid_entry() {
        let deps = vec![
            PluginDependency::new(None, true, ns(), None),
            PluginDependency::of("spigot-api", true),
        ];
        assert_matches!(
            validate_dependency_set(&deps),
            Err(CoreError::Validation(msg)) if msg.starts_with("dependencies[1]: ")
        );
    }

    #[test]
    fn set_prefixes_single_entry_message() {
        let dep = PluginDependency::new(None, false, None, Some("https://x.io".into()));
        let Err(CoreError::Validation(single)) = ensure_valid(&dep) else {
            panic!("expected a validation error");
        };
        assert_matches!(
            validate_dependency_set(&[dep]),
            Err(CoreError::Validation(msg)) if msg == format!("dependencies[0]: {single}")
        );
    }

    #[test]
    fn set_rejects_duplicate_effective_names() {
        let deps = vec![
            PluginDependency::new(None, true, ns(), None),
            PluginDependency::new(Some("paper".into()), false, None, Some("https://x.io".into())),
        ];
        assert_matches!(validate_dependency_set(&deps), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn set_accepts_distinct_dependencies() {
        let deps = vec![
            PluginDependency::new(None, true, ns(), None),
            PluginDependency::new(Some("Vault".into()), false, None, Some("https://x.io".into())),
        ];
        assert!(validate_dependency_set(&deps).is_ok());
        assert!(validate_dependency_set(&[]).is_ok());
    }
}
