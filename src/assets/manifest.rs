use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{TokenError, TokenResult};
use crate::scene::model::CanvasDoc;

/// Top-level frame catalog grouping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainCategory {
    /// Character classes.
    Classes,
    /// Playable races.
    Races,
    /// World locations.
    World,
    /// Themes.
    Thematic,
    /// Seasonal sets.
    Seasonal,
    /// Utility frames.
    Utility,
}

/// Library frame metadata as published by the asset manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMeta {
    /// Frame id; also the stem of conventional file names.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Catalog grouping.
    pub main_category: MainCategory,
    /// Second-level grouping, e.g. `warlock`.
    pub sub_category: String,
    /// Optional third-level grouping, e.g. `hexblade`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_sub_category: Option<String>,
    /// Race family, for race frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Thumbnail file relative to `base_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,
    /// 1024px master file relative to `base_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_path: Option<String>,
    /// Directory or URL prefix holding the frame files.
    pub base_path: String,
    /// Shared mask file relative to `base_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_path: Option<String>,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Library picture (background, overlay or portrait).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortraitMeta {
    /// Asset id.
    pub id: String,
    /// Source locator.
    pub src: String,
}

/// The full asset manifest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Library frames.
    #[serde(default)]
    pub frames: Vec<FrameMeta>,
    /// Library backgrounds.
    #[serde(default)]
    pub backgrounds: Vec<PortraitMeta>,
    /// Library overlays.
    #[serde(default)]
    pub overlays: Vec<PortraitMeta>,
    /// Library portraits.
    #[serde(default)]
    pub portraits: Vec<PortraitMeta>,
}

/// Which file of a library frame to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameAssetKind {
    /// 256px preview.
    Thumbnail,
    /// 1024px artwork.
    Master,
    /// Grayscale stencil.
    Mask,
}

/// Resolve a library frame file to a loadable locator.
pub fn frame_src(meta: &FrameMeta, kind: FrameAssetKind) -> String {
    let base = meta.base_path.trim_end_matches('/');
    let file = match kind {
        FrameAssetKind::Mask => meta
            .mask_path
            .clone()
            .unwrap_or_else(|| format!("{}_mask.png", meta.id)),
        FrameAssetKind::Thumbnail => meta
            .thumbnail_path
            .clone()
            .unwrap_or_else(|| format!("{}_256.png", meta.id)),
        FrameAssetKind::Master => meta
            .master_path
            .clone()
            .unwrap_or_else(|| format!("{}_1024.png", meta.id)),
    };
    if base.is_empty() {
        file
    } else {
        format!("{base}/{file}")
    }
}

impl AssetRecord {
    /// Parse a manifest from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TokenResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| TokenError::serde(format!("parse asset manifest JSON: {e}")))
    }

    /// Parse a manifest from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TokenResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TokenError::validation(format!("open asset manifest '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Look up a library frame by id.
    pub fn frame(&self, id: &str) -> Option<&FrameMeta> {
        self.frames.iter().find(|f| f.id == id)
    }

    /// Frames matching every provided category filter; `None` means "any".
    pub fn frames_by_category(
        &self,
        main: Option<MainCategory>,
        sub: Option<&str>,
        sub_sub: Option<&str>,
    ) -> Vec<&FrameMeta> {
        self.frames
            .iter()
            .filter(|f| main.is_none_or(|m| f.main_category == m))
            .filter(|f| sub.is_none_or(|s| f.sub_category == s))
            .filter(|f| sub_sub.is_none_or(|s| f.sub_sub_category.as_deref() == Some(s)))
            .collect()
    }

    /// Case-insensitive search over frame names and tags. A blank query matches everything.
    pub fn search_frames(&self, query: &str) -> Vec<&FrameMeta> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return self.frames.iter().collect();
        }
        self.frames
            .iter()
            .filter(|f| {
                f.name.to_lowercase().contains(&q)
                    || f.tags.iter().any(|t| t.to_lowercase().contains(&q))
            })
            .collect()
    }
}

/// Frame and mask locators chosen for one composition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameSources {
    /// Frame artwork locator.
    pub frame: Option<String>,
    /// Mask locator.
    pub mask: Option<String>,
    /// Whether the sources came from the document's custom frame.
    pub custom: bool,
}

impl FrameSources {
    /// Pick the frame/mask pair for `doc`.
    ///
    /// A custom frame wins over the library selection, and a custom frame without a mask
    /// yields no mask at all.
    pub fn resolve(doc: &CanvasDoc, selected: Option<&FrameMeta>) -> Self {
        if let Some(custom) = &doc.custom_frame {
            let frame = non_empty(&custom.frame_url);
            let mask = non_empty(&custom.mask_url);
            if frame.is_some() || mask.is_some() {
                tracing::debug!(
                    has_frame = frame.is_some(),
                    has_mask = mask.is_some(),
                    "using custom frame"
                );
                return Self {
                    frame,
                    mask,
                    custom: true,
                };
            }
        }
        match selected {
            Some(meta) => Self {
                frame: Some(frame_src(meta, FrameAssetKind::Master)),
                mask: Some(frame_src(meta, FrameAssetKind::Mask)),
                custom: false,
            },
            None => Self::default(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_owned())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/manifest.rs"]
mod tests;
