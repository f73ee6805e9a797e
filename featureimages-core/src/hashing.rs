//! Hashing System - SHA-256 for Stylesheets
//!
//! Lets the pipeline skip rewriting a stylesheet whose content has not changed.

use sha2::{Sha256, Digest};
use serde::Serialize;
use serde_json::{Value, to_string};

use crate::breakpoints::SlotImages;
use crate::config::FeatureImagesConfig;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(sort_value).collect())
        }
        _ => v.clone()
    }
}

/// Hash of everything that shapes the stylesheet: images plus config.
pub fn compute_input_hash(
    images: &SlotImages,
    config: &FeatureImagesConfig,
) -> Result<String, serde_json::Error> {
    let combined = format!("{}:{}", canonical_json(images)?, canonical_json(config)?);
    Ok(sha256_hex(combined.as_bytes()))
}

pub fn compute_stylesheet_hash(css: &str) -> String {
    sha256_hex(css.as_bytes())
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
