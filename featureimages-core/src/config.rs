//! Configuration - Explicit Values, No Statics

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::breakpoints::BreakpointTable;
use crate::css::{FallbackPolicy, StyleConfig};
use crate::fields::FeatureOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureImagesConfig {
    /// Folder holding one sub-folder per page, relative to the assets dir.
    #[serde(default = "default_root")]
    pub feature_images_root: String,
    /// File name of the generated stylesheet inside each page folder.
    #[serde(default = "default_css_include_name")]
    pub css_include_name: String,
    #[serde(default = "default_true")]
    pub enable_cms_fields: bool,
    #[serde(default)]
    pub breakpoints: BreakpointTable,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub fallback: FallbackPolicy,
    #[serde(default)]
    pub options: FeatureOptions,
}

fn default_root() -> String { "feature-images/".to_string() }
fn default_css_include_name() -> String { "include.css".to_string() }
fn default_true() -> bool { true }

impl Default for FeatureImagesConfig {
    fn default() -> Self {
        Self {
            feature_images_root: default_root(),
            css_include_name: default_css_include_name(),
            enable_cms_fields: true,
            breakpoints: BreakpointTable::default(),
            style: StyleConfig::default(),
            fallback: FallbackPolicy::default(),
            options: FeatureOptions::default(),
        }
    }
}

impl FeatureImagesConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.css_include_name.trim();
        if name.is_empty() {
            return Err(ConfigError::Invalid("cssIncludeName must not be empty".into()));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(ConfigError::Invalid(format!(
                "cssIncludeName must be a bare file name, got {}",
                self.css_include_name
            )));
        }
        if self.breakpoints.is_empty() {
            return Err(ConfigError::Invalid("breakpoints must not be empty".into()));
        }
        Ok(())
    }

    /// `assets_dir/<root>/<folder>/<include>`. The folder name comes from the host.
    pub fn stylesheet_path(&self, assets_dir: &Path, folder_name: &str) -> PathBuf {
        assets_dir
            .join(self.feature_images_root.trim_matches('/'))
            .join(folder_name.trim_matches('/'))
            .join(&self.css_include_name)
    }

    /// Web path of the same file, e.g. `assets/feature-images/5_about/include.css`.
    pub fn stylesheet_url(&self, folder_name: &str) -> String {
        ["assets", self.feature_images_root.as_str(), folder_name, self.css_include_name.as_str()]
            .iter()
            .map(|part| part.trim_matches('/'))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = FeatureImagesConfig::from_json("{}").unwrap();
        assert_eq!(config, FeatureImagesConfig::default());
        assert_eq!(config.feature_images_root, "feature-images/");
        assert_eq!(config.css_include_name, "include.css");
        assert!(config.enable_cms_fields);
        assert_eq!(config.breakpoints.len(), 4);
        assert_eq!(config.fallback, FallbackPolicy::SingleStep);
    }

    #[test]
    fn test_partial_override() {
        let config = FeatureImagesConfig::from_json(
            r#"{"cssIncludeName": "hero.css", "fallback": "chain", "style": {"mobileMaxWidth": 600}}"#,
        )
        .unwrap();
        assert_eq!(config.css_include_name, "hero.css");
        assert_eq!(config.fallback, FallbackPolicy::Chain);
        assert_eq!(config.style.mobile_max_width, 600);
        assert_eq!(config.style.selector, ".feature-image");
    }

    #[test]
    fn test_rejects_bad_include_name() {
        assert!(matches!(
            FeatureImagesConfig::from_json(r#"{"cssIncludeName": ""}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            FeatureImagesConfig::from_json(r#"{"cssIncludeName": "a/b.css"}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            FeatureImagesConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_stylesheet_locations() {
        let config = FeatureImagesConfig::default();
        assert_eq!(
            config.stylesheet_path(Path::new("/srv/assets"), "5_about-us"),
            PathBuf::from("/srv/assets/feature-images/5_about-us/include.css")
        );
        assert_eq!(config.stylesheet_url("5_about-us"), "assets/feature-images/5_about-us/include.css");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("featureimages.json");
        fs::write(&path, r#"{"enableCmsFields": false}"#).unwrap();
        let config = FeatureImagesConfig::load_from_file(&path).unwrap();
        assert!(!config.enable_cms_fields);

        let missing = FeatureImagesConfig::load_from_file(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
