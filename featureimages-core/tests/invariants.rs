//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use featureimages_core::{
    generate, FallbackPolicy, FeatureImagePipeline, FeatureImagesConfig, HostRelativeResolver,
    IdentityResolver, ImageReference, ImageSlot, ResponsiveBackgroundCss, SlotImages,
    StyleConfig, WriteOutcome,
    breakpoints::{Breakpoint, BreakpointTable},
};
use proptest::prelude::*;
use std::fs;

fn img(id: &str) -> Option<ImageReference> {
    Some(ImageReference::new(id, format!("https://www.example.govt.nz/assets/feature-images/5_about/{}.jpg", id)))
}

fn slots(large: bool, medium: bool, small: bool, mobile: bool) -> SlotImages {
    SlotImages {
        large: if large { img("large") } else { None },
        medium: if medium { img("medium") } else { None },
        small: if small { img("small") } else { None },
        mobile: if mobile { img("mobile") } else { None },
    }
}

fn background_rules(css: &str) -> Vec<String> {
    css.lines()
        .filter_map(|l| l.strip_prefix("@media (min-width: "))
        .map(|rest| rest.trim_end_matches(") {").to_string())
        .collect()
}

#[test]
fn invariant_worked_example() {
    let images = SlotImages { medium: Some(ImageReference::new("img-M", "/assets/img-M.jpg")), ..Default::default() };
    let tiers = images.pair_with(&BreakpointTable::default());
    let css = generate(&tiers, images.mobile_provided(), &IdentityResolver);

    assert_eq!(css.matches("@media (min-width:").count(), 2);
    assert!(!css.contains("min-width: 1px"));
    assert!(!css.contains("1367px"));

    let expected = concat!(
        "@media (max-width: 767px) {\n\t.feature-image {\n\t\tdisplay: none;\n\t\tvisibility: hidden;\n\t}\n}\n\n",
        "\n",
        "@media (min-width: 768px) {\n\t.feature-image {\n\t\tbackground: url(/assets/img-M.jpg) #231f20 no-repeat;\n\t\tbackground-position:center;\t}\n}\n\n",
        "\n",
        "@media (min-width: 992px) {\n\t.feature-image {\n\t\tbackground: url(/assets/img-M.jpg) #231f20 no-repeat;\n\t\tbackground-position:center;\t}\n}\n\n",
    );
    assert_eq!(css, expected);
}

#[test]
fn invariant_default_config_matches_generate() {
    let images = SlotImages { medium: Some(ImageReference::new("img-M", "/assets/img-M.jpg")), ..Default::default() };
    let compiled = FeatureImagePipeline::default().compile(2, &images, &IdentityResolver).unwrap();
    let direct = generate(&images.pair_with(&BreakpointTable::default()), false, &IdentityResolver);

    assert_eq!(compiled.css, direct);
    assert_eq!(compiled.rule_count, 2);
}

#[test]
fn invariant_mobile_rule_exactly_once() {
    for mobile in [false, true] {
        let images = slots(true, false, true, mobile);
        let css = generate(&images.pair_with(&BreakpointTable::default()), mobile, &IdentityResolver);
        assert_eq!(css.matches("@media (max-width: 767px)").count(), 1);
        assert_eq!(css.contains("display: block!important"), mobile);
        assert_eq!(css.contains("display: none"), !mobile);
    }
}

#[test]
fn invariant_generator_does_not_resort() {
    // Ascending input is walked as given: the 1px image fills everything after it.
    let table = BreakpointTable::new(vec![
        Breakpoint::new(1, ImageSlot::Mobile),
        Breakpoint::new(1367, ImageSlot::Large),
    ]);
    let tiers = slots(false, false, false, true).pair_with(&table);
    let out = ResponsiveBackgroundCss::default().generate(&tiers, true, &IdentityResolver);
    assert_eq!(out.rule_count(), 2);
    assert!(out.rules[1].inherited);
    assert_eq!(out.rules[0].breakpoint.min_width, 1);
}

#[test]
fn invariant_compile_calls_validate() {
    let mut config = FeatureImagesConfig::default();
    config.breakpoints = BreakpointTable::new(vec![
        Breakpoint::new(768, ImageSlot::Small),
        Breakpoint::new(992, ImageSlot::Medium),
    ]);
    let pipeline = FeatureImagePipeline::new(config);

    let result = pipeline.compile(1, &slots(true, true, true, false), &IdentityResolver);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Validation failed"));
}

#[test]
fn invariant_compiled_is_host_relative() {
    let pipeline = FeatureImagePipeline::default();
    let resolver = HostRelativeResolver::new("https://www.example.govt.nz");
    let compiled = pipeline.compile(5, &slots(true, true, false, false), &resolver).unwrap();

    assert!(!compiled.css.contains("https://"));
    assert_eq!(compiled.largest_url.as_deref(), Some("/assets/feature-images/5_about/large.jpg"));
    assert_eq!(background_rules(&compiled.css), vec!["768px", "992px", "1367px"]);
    assert!(!compiled.stylesheet_hash.is_empty());
}

#[test]
fn invariant_hashes_stable() {
    let pipeline = FeatureImagePipeline::default();
    let images = slots(true, false, false, true);

    let a = pipeline.compile(9, &images, &IdentityResolver).unwrap();
    let b = pipeline.compile(9, &images, &IdentityResolver).unwrap();

    assert_eq!(a.css, b.css);
    assert_eq!(a.stylesheet_hash, b.stylesheet_hash);
    assert_eq!(a.input_hash, b.input_hash);
}

#[test]
fn invariant_regenerate_skips_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let config = FeatureImagesConfig::default();
    let path = config.stylesheet_path(dir.path(), "5_about");
    let pipeline = FeatureImagePipeline::new(config);
    let images = slots(false, true, false, false);

    let first = pipeline.regenerate(5, &images, &IdentityResolver, &path).unwrap();
    assert!(matches!(first, WriteOutcome::Written { .. }));
    assert!(path.exists());

    let second = pipeline.regenerate(5, &images, &IdentityResolver, &path).unwrap();
    assert!(matches!(second, WriteOutcome::Unchanged { .. }));

    let changed = pipeline.regenerate(5, &slots(true, true, false, false), &IdentityResolver, &path).unwrap();
    assert!(matches!(changed, WriteOutcome::Written { .. }));
    assert!(fs::read_to_string(&path).unwrap().contains("1367px"));
}

#[test]
fn invariant_regenerate_without_images_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("include.css");
    let pipeline = FeatureImagePipeline::default();

    let outcome = pipeline.regenerate(5, &SlotImages::default(), &IdentityResolver, &path).unwrap();
    assert_eq!(outcome, WriteOutcome::Skipped);
    assert!(!path.exists());
    assert!(pipeline.ensure_stylesheet(5, &SlotImages::default(), &IdentityResolver, &path).is_none());
}

#[test]
fn invariant_ensure_stylesheet_creates_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feature-images").join("7_news").join("include.css");
    let pipeline = FeatureImagePipeline::default();
    let images = slots(false, false, true, false);

    assert_eq!(pipeline.ensure_stylesheet(7, &images, &IdentityResolver, &path), Some(path.clone()));
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("@media (min-width: 768px)"));

    // Existing file is left alone.
    fs::write(&path, "/* hand edited */").unwrap();
    assert_eq!(pipeline.ensure_stylesheet(7, &images, &IdentityResolver, &path), Some(path.clone()));
    assert_eq!(fs::read_to_string(&path).unwrap(), "/* hand edited */");
}

#[test]
fn invariant_ensure_stylesheet_logs_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    // Parent is a regular file, so the directory cannot be created.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let path = blocker.join("include.css");

    let pipeline = FeatureImagePipeline::default();
    assert!(pipeline.ensure_stylesheet(1, &slots(true, false, false, false), &IdentityResolver, &path).is_none());
}

proptest! {
    #[test]
    fn prop_chain_rule_count_matches_tiers_with_source(
        large in any::<bool>(),
        medium in any::<bool>(),
        small in any::<bool>(),
        mobile in any::<bool>(),
    ) {
        let images = slots(large, medium, small, mobile);
        let tiers = images.pair_with(&BreakpointTable::default());
        let gen = ResponsiveBackgroundCss::new(StyleConfig::default(), FallbackPolicy::Chain);
        let out = gen.generate(&tiers, mobile, &IdentityResolver);

        let present = [large, medium, small, mobile];
        let expected = (0..4).filter(|&i| present[..=i].iter().any(|p| *p)).count();

        prop_assert_eq!(out.rule_count(), expected);
        prop_assert_eq!(background_rules(&out.css).len(), expected);
        prop_assert_eq!(out.css.matches("@media (max-width: 767px)").count(), 1);
    }

    #[test]
    fn prop_default_rule_count_reaches_one_tier(
        large in any::<bool>(),
        medium in any::<bool>(),
        small in any::<bool>(),
        mobile in any::<bool>(),
    ) {
        let images = slots(large, medium, small, mobile);
        let css = generate(&images.pair_with(&BreakpointTable::default()), mobile, &IdentityResolver);

        let present = [large, medium, small, mobile];
        let expected = (0..4).filter(|&i| present[i] || (i > 0 && present[i - 1])).count();

        prop_assert_eq!(background_rules(&css).len(), expected);
    }

    #[test]
    fn prop_rules_ascend_and_repeat(
        large in any::<bool>(),
        medium in any::<bool>(),
        small in any::<bool>(),
        mobile in any::<bool>(),
        single_step in any::<bool>(),
    ) {
        let policy = if single_step { FallbackPolicy::SingleStep } else { FallbackPolicy::Chain };
        let gen = ResponsiveBackgroundCss::new(StyleConfig::default(), policy);
        let tiers = slots(large, medium, small, mobile).pair_with(&BreakpointTable::default());

        let first = gen.generate(&tiers, mobile, &IdentityResolver);
        let second = gen.generate(&tiers, mobile, &IdentityResolver);
        prop_assert_eq!(&first.css, &second.css);

        let widths: Vec<u32> = background_rules(&first.css)
            .iter()
            .map(|w| w.trim_end_matches("px").parse().unwrap())
            .collect();
        let mut sorted = widths.clone();
        sorted.sort_unstable();
        prop_assert_eq!(widths, sorted);

        if mobile {
            prop_assert!(first.css.contains("display: block!important"));
        } else {
            prop_assert!(first.css.contains("display: none"));
        }
    }
}
