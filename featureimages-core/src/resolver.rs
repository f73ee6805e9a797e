//! URL Resolution
//!
//! Stylesheets must work on every environment, so URLs are host-relative.

use crate::breakpoints::ImageReference;

/// Maps an image reference to the URL written into `url(...)`.
pub trait UrlResolver {
    fn resolve(&self, image: &ImageReference) -> String;
}

impl<F> UrlResolver for F
where
    F: Fn(&ImageReference) -> String,
{
    fn resolve(&self, image: &ImageReference) -> String {
        self(image)
    }
}

/// Returns the stored URL untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl UrlResolver for IdentityResolver {
    fn resolve(&self, image: &ImageReference) -> String {
        image.url.clone()
    }
}

/// Strips a leading protocol-and-host, e.g. `https://www.example.govt.nz`.
#[derive(Debug, Clone)]
pub struct HostRelativeResolver {
    protocol_and_host: String,
}

impl HostRelativeResolver {
    pub fn new(protocol_and_host: impl Into<String>) -> Self {
        let host: String = protocol_and_host.into();
        Self {
            protocol_and_host: host.trim_end_matches('/').to_string(),
        }
    }
}

impl UrlResolver for HostRelativeResolver {
    fn resolve(&self, image: &ImageReference) -> String {
        if self.protocol_and_host.is_empty() {
            return image.url.clone();
        }
        match image.url.strip_prefix(&self.protocol_and_host) {
            Some(rest) => rest.to_string(),
            None => image.url.clone(),
        }
    }
}
