//! FeatureImages Core - Responsive Background Stylesheets
//!
//! # The Rules
//! 1. Breakpoints Run Largest First
//! 2. A Missing Tier Borrows From A Larger One
//! 3. Mobile Never Propagates Upward
//! 4. Deterministic Output
//! 5. Stylesheets Are Host-Relative

pub mod breakpoints;
pub mod resolver;
pub mod css;
pub mod validation;
pub mod hashing;
pub mod config;
pub mod fields;
pub mod pipeline;

pub use breakpoints::{Breakpoint, BreakpointImage, BreakpointTable, ImageReference, ImageSlot, SlotImages, DEFAULT_BREAKPOINTS};
pub use resolver::{HostRelativeResolver, IdentityResolver, UrlResolver};
pub use css::{generate, resolve_tiers, FallbackPolicy, GeneratedCss, ResponsiveBackgroundCss, StyleConfig};
pub use validation::{ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};
pub use hashing::{compute_input_hash, compute_stylesheet_hash, canonical_json};
pub use config::{ConfigError, FeatureImagesConfig};
pub use fields::{plan_fields, FeatureOptions, FieldDescriptor, FieldKind};
pub use pipeline::{CompiledStylesheet, FeatureImagePipeline, PageImages, PipelineError, WriteOutcome};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
