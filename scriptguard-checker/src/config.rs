//! Policy files
//!
//! A policy file describes changes on top of the default policy:
//!
//! ```toml
//! name = "report-formulas"
//! listener = "SanitizerListener"
//! reserved_identifier_pattern = "^\\$[a-z]+$"
//!
//! [keywords]
//! async = true
//!
//! [built_in_objects]
//! remove = ["eval", "require"]
//!
//! [reserved_mutable]
//! add = ["result"]
//! ```
//!
//! Each identifier set table is applied as `clear`, then `add`, then
//! `remove`.

use regex::Regex;
use scriptguard_core::options::DEFAULT_OPTIONS_NAME;
use scriptguard_core::{
    IdentifierSet, ListenerRegistry, PolicyKeyword, SanitizerError, SanitizerOptions,
    SanitizerOptionsBuilder,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read policy file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse policy TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid reserved identifier pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Invalid policy listener: {0}")]
    Listener(#[source] SanitizerError),
    #[error("Invalid policy value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Changes to one identifier set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetPatch {
    #[serde(default)]
    pub clear: bool,
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

impl SetPatch {
    fn apply(&self, builder: SanitizerOptionsBuilder, which: IdentifierSet) -> SanitizerOptionsBuilder {
        let builder = if self.clear { builder.clear(which) } else { builder };
        builder.add(which, self.add.iter().cloned()).remove(which, &self.remove)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyFile {
    pub name: Option<String>,
    pub listener: Option<String>,
    pub reserved_identifier_pattern: Option<String>,
    #[serde(default)]
    pub keywords: BTreeMap<String, bool>,
    #[serde(default)]
    pub built_in_objects: SetPatch,
    #[serde(default)]
    pub disallowed: SetPatch,
    #[serde(default)]
    pub reserved: SetPatch,
    #[serde(default)]
    pub reserved_mutable: SetPatch,
    #[serde(default)]
    pub reserved_function: SetPatch,
}

impl PolicyFile {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let policy = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), name = ?policy.name, "loaded policy file");
        Ok(policy)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let policy: PolicyFile = toml::from_str(contents)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.listener.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "listener",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(name) = self.keywords.keys().find(|name| PolicyKeyword::from_name(name).is_none()) {
            return Err(ConfigError::InvalidValue {
                field: "keywords",
                reason: format!("unknown keyword {:?}", name),
            });
        }
        for (field, patch) in self.patches() {
            if let Some(name) = patch.add.iter().chain(&patch.remove).find(|name| name.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("identifier {:?} must not be blank", name),
                });
            }
        }
        Ok(())
    }

    fn patches(&self) -> [(&'static str, &SetPatch); 5] {
        [
            ("built_in_objects", &self.built_in_objects),
            ("disallowed", &self.disallowed),
            ("reserved", &self.reserved),
            ("reserved_mutable", &self.reserved_mutable),
            ("reserved_function", &self.reserved_function),
        ]
    }

    /// Apply this file on top of `builder`.
    pub fn apply(
        &self,
        builder: SanitizerOptionsBuilder,
        registry: &ListenerRegistry,
    ) -> Result<SanitizerOptionsBuilder, ConfigError> {
        let mut builder = match &self.name {
            Some(name) => builder.name(name.as_str()),
            None => builder,
        };

        for (which, (_, patch)) in IdentifierSet::ALL.into_iter().zip(self.patches()) {
            builder = patch.apply(builder, which);
        }

        for (name, enabled) in &self.keywords {
            if let Some(keyword) = PolicyKeyword::from_name(name) {
                builder = builder.keyword_enabled(keyword, *enabled);
            }
        }

        if let Some(pattern) = &self.reserved_identifier_pattern {
            let regex = Regex::new(pattern)?;
            builder = builder.reserved_identifier_matcher(move |identifier| regex.is_match(identifier));
        }

        if let Some(listener) = &self.listener {
            let binding = registry.resolve(listener).map_err(ConfigError::Listener)?;
            builder = builder.listener(binding);
        }

        Ok(builder)
    }

    /// Build a policy from this file on top of the default tables.
    pub fn into_options(&self, registry: &ListenerRegistry) -> Result<SanitizerOptions, ConfigError> {
        let builder = SanitizerOptionsBuilder::new(DEFAULT_OPTIONS_NAME);
        Ok(self.apply(builder, registry)?.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptguard_core::{ErrorKind, KeywordFlags};

    const POLICY: &str = r#"
name = "formulas"
listener = "SanitizerListener"
reserved_identifier_pattern = "^\\$[a-z]+$"

[keywords]
async = true
await = true
var = false

[built_in_objects]
remove = ["require"]

[disallowed]
add = ["fetch"]
remove = ["Promise"]

[reserved_mutable]
add = ["result"]

[reserved_function]
clear = true
add = ["run"]
"#;

    #[test]
    fn test_policy_file_builds_options() {
        let policy = PolicyFile::from_toml_str(POLICY).unwrap();
        let options = policy.into_options(&ListenerRegistry::with_defaults()).unwrap();

        assert_eq!(options.name(), "formulas");
        assert_eq!(options.keywords(), KeywordFlags::ASYNC | KeywordFlags::AWAIT);
        assert!(!options.is_built_in_object("require"));
        assert!(options.is_disallowed("fetch"));
        assert!(!options.is_disallowed("Promise"));
        assert!(options.is_reserved_mutable("result"));
        assert!(options.is_reserved_function("run"));
        assert!(!options.is_reserved_function("main"));
        assert!((options.reserved_identifier_matcher())("$total"));
        assert!(!(options.reserved_identifier_matcher())("total"));
    }

    #[test]
    fn test_empty_file_is_default_policy() {
        let options = PolicyFile::from_toml_str("")
            .unwrap()
            .into_options(&ListenerRegistry::with_defaults())
            .unwrap();
        let defaults = SanitizerOptions::default_options();
        assert_eq!(options.name(), defaults.name());
        assert_eq!(options.built_in_objects(), defaults.built_in_objects());
        assert_eq!(options.disallowed_identifiers(), defaults.disallowed_identifiers());
        assert!(options.keywords().is_empty());
    }

    #[test]
    fn test_unknown_fields_and_keywords_are_rejected() {
        assert!(matches!(
            PolicyFile::from_toml_str("colour = \"red\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            PolicyFile::from_toml_str("[keywords]\ngoto = true"),
            Err(ConfigError::InvalidValue { field: "keywords", .. })
        ));
        assert!(matches!(
            PolicyFile::from_toml_str("[disallowed]\nadd = [\" \"]"),
            Err(ConfigError::InvalidValue { field: "disallowed", .. })
        ));
    }

    #[test]
    fn test_bad_pattern_and_listener() {
        let registry = ListenerRegistry::with_defaults();

        let policy = PolicyFile::from_toml_str("reserved_identifier_pattern = \"(\"").unwrap();
        assert!(matches!(policy.into_options(&registry), Err(ConfigError::Pattern(_))));

        let policy = PolicyFile::from_toml_str("listener = \"Missing\"").unwrap();
        match policy.into_options(&registry) {
            Err(ConfigError::Listener(error)) => assert_eq!(error.kind(), ErrorKind::ListenerNotFound),
            other => panic!("expected listener error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_names_path() {
        let error = PolicyFile::from_path(Path::new("/nonexistent/policy.toml")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/policy.toml"));
    }
}
