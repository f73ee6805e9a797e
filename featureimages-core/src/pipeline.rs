//! Stylesheet Pipeline - Single Entry Point
//!
//! CRITICAL: compile MUST call validate internally. No bypass.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use chrono::{DateTime, Utc};

use crate::breakpoints::{ImageSlot, SlotImages};
use crate::config::FeatureImagesConfig;
use crate::css::ResponsiveBackgroundCss;
use crate::hashing::{compute_input_hash, compute_stylesheet_hash};
use crate::resolver::UrlResolver;
use crate::validation::{ValidationResult, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Payload describing one page's images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageImages {
    pub page_id: u64,
    #[serde(default)]
    pub images: SlotImages,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledStylesheet {
    pub page_id: u64,
    pub css: String,
    pub largest_url: Option<String>,
    pub rule_count: usize,
    pub mobile_provided: bool,
    pub input_hash: String,
    pub stylesheet_hash: String,
    pub engine_version: String,
    pub generated_at: DateTime<Utc>,
    pub validation: ValidationResult,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WriteOutcome {
    /// Page has no feature images; nothing to write.
    Skipped,
    /// File already held identical content.
    Unchanged { path: PathBuf, hash: String },
    Written { path: PathBuf, hash: String },
}

/// The stylesheet pipeline - single entry point for page stylesheets
pub struct FeatureImagePipeline {
    config: FeatureImagesConfig,
    generator: ResponsiveBackgroundCss,
    validator: Validator,
}

impl FeatureImagePipeline {
    pub fn new(config: FeatureImagesConfig) -> Self {
        let generator = ResponsiveBackgroundCss::new(config.style.clone(), config.fallback);
        Self {
            config,
            generator,
            validator: Validator::new(),
        }
    }

    pub fn config(&self) -> &FeatureImagesConfig {
        &self.config
    }

    /// Any image at all counts, since smaller tiers fall back to larger ones.
    pub fn has_feature_images(&self, images: &SlotImages) -> bool {
        self.config
            .breakpoints
            .tiers()
            .iter()
            .any(|bp| images.is_present(bp.slot))
    }

    /// The mobile rule only shows the image when the table has a mobile tier
    /// to carry it.
    pub fn mobile_provided(&self, images: &SlotImages) -> bool {
        self.config.breakpoints.contains_slot(ImageSlot::Mobile) && images.mobile_provided()
    }

    /// This is the ONLY validation entry point.
    pub fn validate(&self, images: &SlotImages) -> ValidationResult {
        self.validator.validate(&self.config.breakpoints, images)
    }

    /// Generate the stylesheet for a page.
    ///
    /// CRITICAL: This ALWAYS calls validate internally.
    pub fn compile<R>(&self, page_id: u64, images: &SlotImages, resolver: &R) -> Result<CompiledStylesheet, PipelineError>
    where
        R: UrlResolver + ?Sized,
    {
        let validation = self.validate(images);
        if validation.has_errors() {
            return Err(PipelineError::ValidationFailed(validation.error_messages().join("; ")));
        }
        for warning in &validation.violations {
            tracing::warn!(page_id, rule = %warning.rule, "{}", warning.message);
        }

        let tiers = images.pair_with(&self.config.breakpoints);
        let generated = self.generator.generate(&tiers, self.mobile_provided(images), resolver);
        let rule_count = generated.rule_count();

        let stylesheet_hash = compute_stylesheet_hash(&generated.css);
        let input_hash = compute_input_hash(images, &self.config)?;

        tracing::debug!(page_id, rules = rule_count, hash = %stylesheet_hash, "compiled stylesheet");

        Ok(CompiledStylesheet {
            page_id,
            css: generated.css,
            largest_url: generated.largest_url,
            rule_count,
            mobile_provided: generated.mobile_provided,
            input_hash,
            stylesheet_hash,
            engine_version: ENGINE_VERSION.to_string(),
            generated_at: Utc::now(),
            validation,
        })
    }

    /// Post-save hook: rewrite the page stylesheet if its content changed.
    pub fn regenerate<R>(
        &self,
        page_id: u64,
        images: &SlotImages,
        resolver: &R,
        path: &Path,
    ) -> Result<WriteOutcome, PipelineError>
    where
        R: UrlResolver + ?Sized,
    {
        if !self.has_feature_images(images) {
            tracing::debug!(page_id, "no feature images, stylesheet not written");
            return Ok(WriteOutcome::Skipped);
        }

        let compiled = self.compile(page_id, images, resolver)?;
        let hash = compiled.stylesheet_hash;

        if let Ok(existing) = fs::read_to_string(path) {
            if compute_stylesheet_hash(&existing) == hash {
                tracing::debug!(page_id, path = %path.display(), "stylesheet unchanged");
                return Ok(WriteOutcome::Unchanged { path: path.to_path_buf(), hash });
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, &compiled.css).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(page_id, path = %path.display(), rules = compiled.rule_count, "wrote feature image stylesheet");
        Ok(WriteOutcome::Written { path: path.to_path_buf(), hash })
    }

    /// Render-time requirement: make sure the stylesheet exists and return
    /// its path. Failures are logged and swallowed so page rendering proceeds.
    pub fn ensure_stylesheet<R>(
        &self,
        page_id: u64,
        images: &SlotImages,
        resolver: &R,
        path: &Path,
    ) -> Option<PathBuf>
    where
        R: UrlResolver + ?Sized,
    {
        if !self.has_feature_images(images) {
            return None;
        }

        if !path.exists() {
            if let Err(e) = self.regenerate(page_id, images, resolver, path) {
                tracing::warn!(page_id, path = %path.display(), "{}", e);
            }
        }

        path.exists().then(|| path.to_path_buf())
    }
}

impl Default for FeatureImagePipeline {
    fn default() -> Self {
        Self::new(FeatureImagesConfig::default())
    }
}
