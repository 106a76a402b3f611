use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::TokenSize;
use crate::foundation::error::{TokenError, TokenResult};

/// Smallest scale the editor lets a user pick.
pub const MIN_SCALE: f64 = 0.1;
/// Largest scale the editor lets a user pick.
pub const MAX_SCALE: f64 = 3.0;

/// Placement of a layer, authored in the 512-unit display space.
///
/// `x`/`y` offset the layer center from the canvas center, `rotation` is in degrees and
/// `scale` multiplies the layer's natural size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Horizontal offset from canvas center, display units.
    pub x: f64,
    /// Vertical offset from canvas center, display units.
    pub y: f64,
    /// Dimensionless size multiplier.
    pub scale: f64,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// Apply a partial update.
    pub fn patched(self, patch: TransformPatch) -> Self {
        Self {
            x: patch.x.unwrap_or(self.x),
            y: patch.y.unwrap_or(self.y),
            scale: patch.scale.unwrap_or(self.scale),
            rotation: patch.rotation.unwrap_or(self.rotation),
        }
    }
}

/// Partial [`Transform`] update; `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformPatch {
    /// New `x`.
    pub x: Option<f64>,
    /// New `y`.
    pub y: Option<f64>,
    /// New `scale`.
    pub scale: Option<f64>,
    /// New `rotation`.
    pub rotation: Option<f64>,
}

/// Discriminant of an image layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Backdrop behind the portrait; clipped by the frame mask.
    Background,
    /// Decorative border drawn full-bleed over the masked stack.
    Frame,
    /// Portrait; clipped by the frame mask, may carry a brightness adjustment.
    Character,
    /// Free decoration drawn above the frame.
    Overlay,
}

/// One raster layer of a [`CanvasDoc`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayer {
    /// Unique id (also the image cache key).
    pub id: String,
    /// Layer discriminant.
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Source locator; empty for color-only backgrounds.
    #[serde(default)]
    pub src: String,
    /// Display name shown by editors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Natural width of the source bitmap, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_width: Option<u32>,
    /// Natural height of the source bitmap, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_height: Option<u32>,
    /// Opacity in `[0, 1]`; absent means fully opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Brightness percentage (0-200, 100 = unchanged). Honored for characters only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    /// Solid CSS fill used by a background that has no image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Placement in display space.
    #[serde(default)]
    pub transform: Transform,
    /// Editor-only lock flag; no effect on rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Hidden layers are skipped by the renderer.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl ImageLayer {
    /// A visible layer with default transform.
    pub fn new(id: impl Into<String>, kind: LayerKind, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            src: src.into(),
            name: None,
            natural_width: None,
            natural_height: None,
            opacity: None,
            brightness: None,
            background_color: None,
            transform: Transform::default(),
            locked: None,
            visible: true,
        }
    }

    /// Effective opacity, clamped.
    pub fn effective_opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    /// Whether the layer has an image source to load.
    pub fn has_source(&self) -> bool {
        !self.src.trim().is_empty()
    }

    /// Apply a partial update.
    pub fn patched(&self, patch: &ImageLayerPatch) -> Self {
        let mut out = self.clone();
        if let Some(v) = &patch.src {
            out.src = v.clone();
        }
        if let Some(v) = &patch.name {
            out.name = Some(v.clone());
        }
        if let Some(v) = patch.natural_width {
            out.natural_width = Some(v);
        }
        if let Some(v) = patch.natural_height {
            out.natural_height = Some(v);
        }
        if let Some(v) = patch.opacity {
            out.opacity = Some(v);
        }
        if let Some(v) = patch.brightness {
            out.brightness = Some(v);
        }
        if let Some(v) = &patch.background_color {
            out.background_color = v.clone();
        }
        if let Some(v) = patch.transform {
            out.transform = out.transform.patched(v);
        }
        if let Some(v) = patch.locked {
            out.locked = Some(v);
        }
        if let Some(v) = patch.visible {
            out.visible = v;
        }
        out
    }
}

/// Partial [`ImageLayer`] update. Ids and kinds are never patched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageLayerPatch {
    /// New source locator.
    pub src: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New natural width.
    pub natural_width: Option<u32>,
    /// New natural height.
    pub natural_height: Option<u32>,
    /// New opacity.
    pub opacity: Option<f32>,
    /// New brightness.
    pub brightness: Option<f32>,
    /// `Some(None)` clears the fill color.
    pub background_color: Option<Option<String>>,
    /// Transform update merged field by field.
    pub transform: Option<TransformPatch>,
    /// New lock flag.
    pub locked: Option<bool>,
    /// New visibility.
    pub visible: Option<bool>,
}

/// Horizontal text anchoring relative to the layer origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Text starts at the origin.
    Left,
    /// Text is centered on the origin.
    #[default]
    Center,
    /// Text ends at the origin.
    Right,
}

/// Outline drawn around the glyphs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStroke {
    /// CSS color.
    pub color: String,
    /// Line width in text units.
    pub width: f64,
}

/// Drop shadow behind stroke and fill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShadow {
    /// Blur amount in device pixels (twice the gaussian sigma).
    pub blur: f64,
    /// Horizontal device-pixel offset.
    pub offset_x: f64,
    /// Vertical device-pixel offset.
    pub offset_y: f64,
    /// CSS color.
    pub color: String,
}

/// The single optional text layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    /// Layer id.
    pub id: String,
    /// Text content.
    pub text: String,
    /// CSS fill color.
    pub color: String,
    /// Font family name, resolved against the registered fonts.
    pub font_family: String,
    /// CSS numeric weight (100-900).
    pub font_weight: u16,
    /// Font size in text units.
    pub font_size: f64,
    /// Horizontal alignment.
    #[serde(default)]
    pub align: TextAlign,
    /// Optional outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<TextStroke>,
    /// Optional drop shadow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<TextShadow>,
    /// Placement in display space.
    #[serde(default)]
    pub transform: Transform,
    /// Hidden text is skipped by the renderer.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Editor-only lock flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

/// Partial [`TextLayer`] update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayerPatch {
    /// New text.
    pub text: Option<String>,
    /// New fill color.
    pub color: Option<String>,
    /// New family.
    pub font_family: Option<String>,
    /// New weight.
    pub font_weight: Option<u16>,
    /// New size.
    pub font_size: Option<f64>,
    /// New alignment.
    pub align: Option<TextAlign>,
    /// `Some(None)` removes the stroke.
    pub stroke: Option<Option<TextStroke>>,
    /// `Some(None)` removes the shadow.
    pub shadow: Option<Option<TextShadow>>,
    /// Transform update merged field by field.
    pub transform: Option<TransformPatch>,
    /// New visibility.
    pub visible: Option<bool>,
    /// New lock flag.
    pub locked: Option<bool>,
}

impl TextLayer {
    /// Apply a partial update.
    pub fn patched(&self, patch: &TextLayerPatch) -> Self {
        let mut out = self.clone();
        if let Some(v) = &patch.text {
            out.text = v.clone();
        }
        if let Some(v) = &patch.color {
            out.color = v.clone();
        }
        if let Some(v) = &patch.font_family {
            out.font_family = v.clone();
        }
        if let Some(v) = patch.font_weight {
            out.font_weight = v;
        }
        if let Some(v) = patch.font_size {
            out.font_size = v;
        }
        if let Some(v) = patch.align {
            out.align = v;
        }
        if let Some(v) = &patch.stroke {
            out.stroke = v.clone();
        }
        if let Some(v) = &patch.shadow {
            out.shadow = v.clone();
        }
        if let Some(v) = patch.transform {
            out.transform = out.transform.patched(v);
        }
        if let Some(v) = patch.visible {
            out.visible = v;
        }
        if let Some(v) = patch.locked {
            out.locked = Some(v);
        }
        out
    }
}

/// User-uploaded frame + mask pair overriding the library frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFrame {
    /// Frame locator; empty when only a mask was uploaded.
    #[serde(default)]
    pub frame_url: String,
    /// Mask locator; empty when no mask was uploaded.
    #[serde(default)]
    pub mask_url: String,
}

/// The declarative scene: everything needed to compose one token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDoc {
    /// Requested export width.
    pub width: u32,
    /// Requested export height (always equal to `width`).
    pub height: u32,
    /// Optional backdrop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ImageLayer>,
    /// Optional library frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<ImageLayer>,
    /// Optional portrait.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<ImageLayer>,
    /// Decorations; array order is z-order (last is front-most).
    #[serde(default)]
    pub overlays: Vec<ImageLayer>,
    /// Optional title text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextLayer>,
    /// Optional user-uploaded frame/mask pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_frame: Option<CustomFrame>,
}

impl Default for CanvasDoc {
    fn default() -> Self {
        Self::new(TokenSize::S1024)
    }
}

impl CanvasDoc {
    /// An empty document of the given size.
    pub fn new(size: TokenSize) -> Self {
        Self {
            width: size.px(),
            height: size.px(),
            background: None,
            frame: None,
            character: None,
            overlays: Vec::new(),
            text: None,
            custom_frame: None,
        }
    }

    /// Parse a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TokenResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| TokenError::serde(format!("parse canvas document JSON: {e}")))
    }

    /// Parse a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TokenResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TokenError::validation(format!("open canvas document '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> TokenResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TokenError::serde(format!("serialize canvas document: {e}")))
    }

    /// Canonical size of the document.
    pub fn size(&self) -> TokenResult<TokenSize> {
        if self.width != self.height {
            return Err(TokenError::validation(format!(
                "canvas must be square (got {}x{})",
                self.width, self.height
            )));
        }
        TokenSize::try_from(self.width)
    }

    /// Find an overlay by id.
    pub fn overlay(&self, id: &str) -> Option<&ImageLayer> {
        self.overlays.iter().find(|o| o.id == id)
    }

    /// Check structural invariants: square canonical size, slot/kind agreement and unique
    /// overlay ids.
    pub fn validate(&self) -> TokenResult<()> {
        self.size()?;

        let slots = [
            ("background", &self.background, LayerKind::Background),
            ("frame", &self.frame, LayerKind::Frame),
            ("character", &self.character, LayerKind::Character),
        ];
        for (slot, layer, kind) in slots {
            if let Some(l) = layer
                && l.kind != kind
            {
                return Err(TokenError::validation(format!(
                    "{slot} slot holds a layer of type {:?}",
                    l.kind
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for o in &self.overlays {
            if o.kind != LayerKind::Overlay {
                return Err(TokenError::validation(format!(
                    "overlay '{}' has type {:?}",
                    o.id, o.kind
                )));
            }
            if !seen.insert(o.id.as_str()) {
                return Err(TokenError::validation(format!(
                    "duplicate overlay id '{}'",
                    o.id
                )));
            }
        }
        Ok(())
    }
}

/// Typed address of a layer within a [`CanvasDoc`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayerRef {
    /// The background slot.
    Background,
    /// The frame slot.
    Frame,
    /// The character slot.
    Character,
    /// The text slot.
    Text,
    /// The overlay with the given id.
    Overlay(String),
}

/// Id of the background layer.
pub const BACKGROUND_ID: &str = "background";
/// Id of the frame layer.
pub const FRAME_ID: &str = "frame";
/// Id of the character layer.
pub const CHARACTER_ID: &str = "character";
/// Id of the text layer.
pub const TEXT_ID: &str = "text-0";

fn default_visible() -> bool {
    true
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
