//! Breakpoint System - Ordered Fallback Tiers
//!
//! The table runs largest threshold first. That order IS the fallback chain.

use serde::{Deserialize, Serialize};

/// The four image relations a page carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    Large,
    Medium,
    Small,
    Mobile,
}

impl ImageSlot {
    pub fn name(&self) -> &'static str {
        match self {
            ImageSlot::Large => "large",
            ImageSlot::Medium => "medium",
            ImageSlot::Small => "small",
            ImageSlot::Mobile => "mobile",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    /// Minimum viewport width in pixels.
    pub min_width: u32,
    pub slot: ImageSlot,
}

impl Breakpoint {
    pub const fn new(min_width: u32, slot: ImageSlot) -> Self {
        Self { min_width, slot }
    }

    /// CSS length, e.g. `992px`
    pub fn label(&self) -> String {
        format!("{}px", self.min_width)
    }
}

/// Bootstrap screen-lg-min, screen-md-min, screen-sm-min, then everything else.
pub const DEFAULT_BREAKPOINTS: [Breakpoint; 4] = [
    Breakpoint::new(1367, ImageSlot::Large),
    Breakpoint::new(992, ImageSlot::Medium),
    Breakpoint::new(768, ImageSlot::Small),
    Breakpoint::new(1, ImageSlot::Mobile),
];

/// Ordered breakpoint table, largest threshold first. Never re-sorted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct BreakpointTable {
    tiers: Vec<Breakpoint>,
}

impl BreakpointTable {
    pub fn new(tiers: Vec<Breakpoint>) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &[Breakpoint] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn contains_slot(&self, slot: ImageSlot) -> bool {
        self.tiers.iter().any(|bp| bp.slot == slot)
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKPOINTS.to_vec())
    }
}

/// Opaque image handle plus the absolute URL the asset store reports for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageReference {
    pub id: String,
    pub url: String,
}

impl ImageReference {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self { id: id.into(), url: url.into() }
    }

    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointImage {
    pub breakpoint: Breakpoint,
    pub image: Option<ImageReference>,
}

impl BreakpointImage {
    pub fn new(breakpoint: Breakpoint, image: Option<ImageReference>) -> Self {
        Self { breakpoint, image }
    }

    /// The tier's own image, only if it has an identifier.
    pub fn present_image(&self) -> Option<&ImageReference> {
        self.image.as_ref().filter(|i| i.is_present())
    }
}

/// The page's image relations, one per slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotImages {
    #[serde(default)]
    pub large: Option<ImageReference>,
    #[serde(default)]
    pub medium: Option<ImageReference>,
    #[serde(default)]
    pub small: Option<ImageReference>,
    #[serde(default)]
    pub mobile: Option<ImageReference>,
}

impl SlotImages {
    pub fn get(&self, slot: ImageSlot) -> Option<&ImageReference> {
        match slot {
            ImageSlot::Large => self.large.as_ref(),
            ImageSlot::Medium => self.medium.as_ref(),
            ImageSlot::Small => self.small.as_ref(),
            ImageSlot::Mobile => self.mobile.as_ref(),
        }
    }

    pub fn is_present(&self, slot: ImageSlot) -> bool {
        self.get(slot).map_or(false, ImageReference::is_present)
    }

    pub fn mobile_provided(&self) -> bool {
        self.is_present(ImageSlot::Mobile)
    }

    pub fn pair_with(&self, table: &BreakpointTable) -> Vec<BreakpointImage> {
        table
            .tiers()
            .iter()
            .map(|bp| BreakpointImage::new(*bp, self.get(bp.slot).cloned()))
            .collect()
    }
}
