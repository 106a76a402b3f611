use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::error::{TokenError, TokenResult};

/// Source of decoded bitmaps, keyed by locator.
///
/// Implementations decide what a locator means (a path, a URL, a key into an upload store).
/// Failures are reported, never retried; the cache decides whether a failure is fatal.
pub trait ImageLoader {
    /// Load and decode the bitmap at `locator`.
    fn load(&self, locator: &str) -> TokenResult<PreparedImage>;
}

impl<L: ImageLoader + ?Sized> ImageLoader for &L {
    fn load(&self, locator: &str) -> TokenResult<PreparedImage> {
        (**self).load(locator)
    }
}

/// Loads locators from a directory on disk.
///
/// Locators are interpreted relative to `root`; a leading `/` is treated as the root itself,
/// matching web-root-relative manifest paths. `data:image/...;base64,` URLs are decoded
/// in place.
#[derive(Debug, Clone)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    /// Create a loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory locators are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_bytes(&self, locator: &str) -> TokenResult<Vec<u8>> {
        if let Some(bytes) = decode_data_url(locator)? {
            return Ok(bytes);
        }
        if locator.contains("://") {
            return Err(TokenError::decode(format!(
                "remote locator '{locator}' must be fetched by the caller"
            )));
        }
        let norm = normalize_rel_path(locator.trim_start_matches('/'))?;
        let p = self.root.join(Path::new(&norm));
        std::fs::read(&p)
            .map_err(|e| TokenError::decode(format!("failed to read asset '{}': {e}", p.display())))
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, locator: &str) -> TokenResult<PreparedImage> {
        let bytes = self.read_bytes(locator)?;
        decode_image(&bytes)
    }
}

/// Decode the payload of a base64 `data:` URL. Returns `Ok(None)` for other locators.
pub fn decode_data_url(locator: &str) -> TokenResult<Option<Vec<u8>>> {
    let Some(rest) = locator.strip_prefix("data:") else {
        return Ok(None);
    };
    let Some((_, payload)) = rest.split_once(";base64,") else {
        return Err(TokenError::decode("only base64 data URLs are supported"));
    };
    BASE64_STANDARD
        .decode(payload.trim())
        .map(Some)
        .map_err(|e| TokenError::decode(format!("invalid base64 data URL: {e}")))
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> TokenResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(TokenError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(TokenError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(TokenError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(TokenError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
