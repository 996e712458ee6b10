//! Checker configuration, loadable from TOML.
//!
//! ```toml
//! strict_identifiers = true
//! constructor_resolution = "arity"
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::path::Path;

use serde::Deserialize;

/// How `new C(args)` picks among the constructors of `C`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtorResolution {
    /// First constructor, in declaration order, whose parameter count matches.
    Arity,
    /// Score candidates like function overloads; fall back to the first arity match.
    #[default]
    Scored,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferConfig {
    /// Unknown identifiers are errors rather than fresh type variables.
    pub strict_identifiers: bool,
    /// Member access also searches superclasses.
    pub inherited_members: bool,
    pub constructor_resolution: CtorResolution,
    /// Leftover type variables are errors rather than warnings.
    pub deny_unresolved: bool,
}

impl Default for InferConfig {
    fn default() -> Self {
        InferConfig {
            strict_identifiers: false,
            inherited_members: true,
            constructor_resolution: CtorResolution::Scored,
            deny_unresolved: true,
        }
    }
}

impl InferConfig {
    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<InferConfig, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<InferConfig, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse checker config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml = r#"
strict_identifiers = true
inherited_members = false
constructor_resolution = "arity"
deny_unresolved = false
"#;
        let config = InferConfig::from_toml(toml).unwrap();
        assert!(config.strict_identifiers);
        assert!(!config.inherited_members);
        assert_eq!(config.constructor_resolution, CtorResolution::Arity);
        assert!(!config.deny_unresolved);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config = InferConfig::from_toml("strict_identifiers = true").unwrap();
        assert_eq!(
            config,
            InferConfig {
                strict_identifiers: true,
                ..InferConfig::default()
            }
        );
        assert_eq!(InferConfig::from_toml("").unwrap(), InferConfig::default());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = InferConfig::from_toml("strict = true").unwrap_err();
        assert!(err.starts_with("Failed to parse checker config"), "got: {}", err);
    }

    #[test]
    fn bad_resolution_value_is_rejected() {
        assert!(InferConfig::from_toml(r#"constructor_resolution = "best""#).is_err());
    }

    #[test]
    fn missing_file() {
        let err = InferConfig::from_file(Path::new("/nonexistent/tlox.toml")).unwrap_err();
        assert!(err.starts_with("Failed to read"));
    }
}
