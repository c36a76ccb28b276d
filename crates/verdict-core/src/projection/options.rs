//! ProjectionOptions - envelope の出力設定
//!
//! グローバルな可変設定は持たず、呼び出しごとに渡します。
//!
//! # 設定ファイル
//! ```toml
//! [projection]
//! naming = "snake_case"
//! use_object_envelope = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::naming::NamingPolicy;

/// ConfigError は設定の読み込みエラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown naming policy '{0}' (expected camelCase, snake_case, PascalCase, kebab-case or as-is)")]
    UnknownNaming(String),
}

/// Output settings for projection.
///
/// Defaults: camelCase keys, object payloads wrapped in `{data}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionOptions {
    pub naming: NamingPolicy,
    /// `false` emits a successful object payload bare, without `{data: ...}`.
    pub use_object_envelope: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::CamelCase,
            use_object_envelope: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    projection: ProjectionOptions,
}

impl ProjectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_object_envelope(mut self, enabled: bool) -> Self {
        self.use_object_envelope = enabled;
        self
    }

    /// Parse the `[projection]` table of a TOML document.
    ///
    /// A missing table or missing keys fall back to the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.projection)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_camel_case_with_envelope() {
        let options = ProjectionOptions::default();
        assert_eq!(options.naming, NamingPolicy::CamelCase);
        assert!(options.use_object_envelope);
    }

    #[test]
    fn parses_projection_table() {
        let options = ProjectionOptions::from_toml_str(
            r#"
            [projection]
            naming = "snake_case"
            use_object_envelope = false
            "#,
        )
        .unwrap();
        assert_eq!(
            options,
            ProjectionOptions::new()
                .with_naming(NamingPolicy::SnakeCase)
                .with_object_envelope(false)
        );
    }

    #[test]
    fn missing_keys_use_defaults() {
        let options = ProjectionOptions::from_toml_str("[projection]\nnaming = \"kebab-case\"\n")
            .unwrap();
        assert_eq!(options.naming, NamingPolicy::KebabCase);
        assert!(options.use_object_envelope);

        let empty = ProjectionOptions::from_toml_str("").unwrap();
        assert_eq!(empty, ProjectionOptions::default());
    }

    #[test]
    fn rejects_unknown_naming_value() {
        let err = ProjectionOptions::from_toml_str("[projection]\nnaming = \"shouty\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[projection]\nuse_object_envelope = false").unwrap();

        let options = ProjectionOptions::from_path(file.path()).unwrap();
        assert!(!options.use_object_envelope);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = ProjectionOptions::from_path(&path).unwrap_err();
        match err {
            ConfigError::Read { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
