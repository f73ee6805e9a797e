//! CMS Field Plan
//!
//! Which editor fields a page type gets, decided once from explicit options.
//! Rendering them is the host's job.

use serde::{Deserialize, Serialize};

use crate::breakpoints::ImageSlot;
use crate::config::FeatureImagesConfig;

/// Tab the host should place the fields on.
pub const FIELD_TAB: &str = "Root.FeatureImages";

/// Optional behaviours a page type opts into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub show_accessible_description: bool,
    #[serde(default)]
    pub show_mobile: bool,
    #[serde(default)]
    pub show_text: bool,
}

fn default_true() -> bool { true }

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            show_accessible_description: false,
            show_mobile: false,
            show_text: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    ImageUpload,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub tab: &'static str,
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub slot: Option<ImageSlot>,
    /// Recommended pixel size shown under upload fields.
    pub description: Option<&'static str>,
}

impl FieldDescriptor {
    const fn upload(name: &'static str, label: &'static str, slot: ImageSlot, size: &'static str) -> Self {
        Self { tab: FIELD_TAB, name, label, kind: FieldKind::ImageUpload, slot: Some(slot), description: Some(size) }
    }
}

/// Fields in display order. Empty when CMS fields are switched off.
pub fn plan_fields(config: &FeatureImagesConfig) -> Vec<FieldDescriptor> {
    let options = &config.options;
    if !config.enable_cms_fields || !options.enabled {
        return vec![];
    }

    let mut fields = Vec::with_capacity(6);

    if options.show_accessible_description {
        fields.push(FieldDescriptor {
            tab: FIELD_TAB,
            name: "FeaturedImageText",
            label: "Describe the text on the featured image (if present)",
            kind: FieldKind::Text,
            slot: None,
            description: None,
        });
    }
    if options.show_mobile {
        fields.push(FieldDescriptor::upload("FeatureImageMobile", "Mobile", ImageSlot::Mobile, "767 x 210 px"));
    }
    fields.push(FieldDescriptor::upload("FeatureImageSmall", "Small", ImageSlot::Small, "991 x 180 px"));
    fields.push(FieldDescriptor::upload("FeatureImageMedium", "Medium", ImageSlot::Medium, "1366 x 180 px"));
    fields.push(FieldDescriptor::upload("FeatureImageLarge", "Large", ImageSlot::Large, "1920 x 250 px"));
    if options.show_text {
        fields.push(FieldDescriptor {
            tab: FIELD_TAB,
            name: "FeatureText",
            label: "Feature text",
            kind: FieldKind::Textarea,
            slot: None,
            description: None,
        });
    }

    fields
}
