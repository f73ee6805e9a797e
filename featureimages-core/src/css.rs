//! Responsive Background CSS Generator
//!
//! Largest available image wins. A tier without its own image borrows the
//! nearest larger tier's image; only the breakpoint context changes.
//!
//! Pure string computation: no disk, no network, no shared state.

use serde::{Deserialize, Serialize};

use crate::breakpoints::{Breakpoint, BreakpointImage, ImageReference};
use crate::resolver::UrlResolver;

/// How far a larger tier's image travels down the table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// An empty tier borrows only from the tier directly above it, and only
    /// when that tier had its own image. Matches legacy stylesheets.
    #[default]
    SingleStep,
    /// The nearest larger present image fills every smaller empty tier.
    Chain,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    #[serde(default = "default_selector")]
    pub selector: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_mobile_max_width")]
    pub mobile_max_width: u32,
    #[serde(default = "default_mobile_row_margin_top")]
    pub mobile_row_margin_top: u32,
}

fn default_selector() -> String { ".feature-image".to_string() }
fn default_background_color() -> String { "#231f20".to_string() }
fn default_mobile_max_width() -> u32 { 767 }
fn default_mobile_row_margin_top() -> u32 { 188 }

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            background_color: default_background_color(),
            mobile_max_width: default_mobile_max_width(),
            mobile_row_margin_top: default_mobile_row_margin_top(),
        }
    }
}

/// One tier after fallback: which image (if any) backs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTier<'a> {
    pub breakpoint: Breakpoint,
    pub source: Option<&'a ImageReference>,
    /// True when `source` came from a larger tier.
    pub inherited: bool,
}

/// Fold the ordered tiers into the image each one should display.
pub fn resolve_tiers(tiers: &[BreakpointImage], policy: FallbackPolicy) -> Vec<ResolvedTier<'_>> {
    tiers
        .iter()
        .scan(None::<&ImageReference>, |carry, tier| {
            let own = tier.present_image();
            let source = own.or(*carry);
            *carry = match policy {
                FallbackPolicy::Chain => source,
                FallbackPolicy::SingleStep => own,
            };
            Some(ResolvedTier {
                breakpoint: tier.breakpoint,
                source,
                inherited: own.is_none() && source.is_some(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundRule {
    pub breakpoint: Breakpoint,
    pub url: String,
    pub inherited: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCss {
    pub css: String,
    /// Background rules, largest threshold first.
    pub rules: Vec<BackgroundRule>,
    /// URL of the largest image found. Reserved for a legacy-browser
    /// stylesheet; nothing emits it yet.
    pub largest_url: Option<String>,
    pub mobile_provided: bool,
}

impl GeneratedCss {
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// The generator. Holds presentation settings only; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct ResponsiveBackgroundCss {
    style: StyleConfig,
    policy: FallbackPolicy,
}

impl ResponsiveBackgroundCss {
    pub fn new(style: StyleConfig, policy: FallbackPolicy) -> Self {
        Self { style, policy }
    }

    /// Build the stylesheet.
    ///
    /// `tiers` must already be largest threshold first; they are walked in the
    /// order given.
    pub fn generate<R>(&self, tiers: &[BreakpointImage], mobile_provided: bool, resolver: &R) -> GeneratedCss
    where
        R: UrlResolver + ?Sized,
    {
        let rules: Vec<BackgroundRule> = resolve_tiers(tiers, self.policy)
            .into_iter()
            .filter_map(|tier| {
                let Some(source) = tier.source else {
                    tracing::debug!(breakpoint = %tier.breakpoint.label(), "no image for tier");
                    return None;
                };
                let url = resolver.resolve(source);
                tracing::debug!(
                    breakpoint = %tier.breakpoint.label(),
                    image = %source.id,
                    inherited = tier.inherited,
                    "background rule"
                );
                Some(BackgroundRule {
                    breakpoint: tier.breakpoint,
                    url,
                    inherited: tier.inherited,
                })
            })
            .collect();

        let largest_url = rules.first().map(|r| r.url.clone());

        // Built large to small with the mobile rule last, then flipped so the
        // file reads mobile first and ascending by min-width.
        let mut clauses: Vec<String> = rules.iter().map(|r| self.render_background(r)).collect();
        clauses.push(self.render_mobile(mobile_provided));
        clauses.reverse();

        GeneratedCss {
            css: clauses.join("\n"),
            rules,
            largest_url,
            mobile_provided,
        }
    }

    fn render_background(&self, rule: &BackgroundRule) -> String {
        format!(
            "@media (min-width: {}) {{\n\t{} {{\n\t\tbackground: url({}) {} no-repeat;\n\t\tbackground-position:center;\t}}\n}}\n\n",
            rule.breakpoint.label(),
            self.style.selector,
            rule.url,
            self.style.background_color,
        )
    }

    fn render_mobile(&self, mobile_provided: bool) -> String {
        let sel = &self.style.selector;
        let max = self.style.mobile_max_width;
        if mobile_provided {
            format!(
                "@media (max-width: {max}px) {{\n\t{sel} {{\n\t\tdisplay: block!important; margin-bottom: 0!important;\n\t}}\n\t{sel} .row{{margin-top: {top}px!important;}}\n}}\n\n",
                top = self.style.mobile_row_margin_top,
            )
        } else {
            // Hidden on mobile; wider breakpoints override.
            format!(
                "@media (max-width: {max}px) {{\n\t{sel} {{\n\t\tdisplay: none;\n\t\tvisibility: hidden;\n\t}}\n}}\n\n"
            )
        }
    }
}

/// Default styling and single-step fallback.
pub fn generate<R>(tiers: &[BreakpointImage], mobile_provided: bool, resolver: &R) -> String
where
    R: UrlResolver + ?Sized,
{
    ResponsiveBackgroundCss::default()
        .generate(tiers, mobile_provided, resolver)
        .css
}
