//! Pure editor transitions.
//!
//! Every operation borrows the current [`CanvasDoc`] and returns the next one; the input is
//! never mutated. Transitions addressing a missing layer return an unchanged copy.

use crate::assets::manifest::FrameMeta;
use crate::foundation::core::TokenSize;
use crate::scene::model::{
    BACKGROUND_ID, CHARACTER_ID, CanvasDoc, CustomFrame, FRAME_ID, ImageLayer, ImageLayerPatch,
    LayerKind, LayerRef, MAX_SCALE, MIN_SCALE, TEXT_ID, TextAlign, TextLayer, TextLayerPatch,
    TextShadow, Transform, TransformPatch,
};

/// Scale change applied per wheel notch.
pub const SCALE_STEP: f64 = 0.05;
/// Rotation change applied per rotate button press, degrees.
pub const ROTATION_STEP: f64 = 15.0;

/// Natural pixel size of a freshly selected source, if already known.
pub type NaturalSize = Option<(u32, u32)>;

impl CanvasDoc {
    /// Change the canonical export size.
    pub fn with_size(&self, size: TokenSize) -> Self {
        Self {
            width: size.px(),
            height: size.px(),
            ..self.clone()
        }
    }

    /// Select a library frame.
    pub fn set_frame(&self, meta: &FrameMeta) -> Self {
        let mut frame = ImageLayer::new(FRAME_ID, LayerKind::Frame, meta.base_path.clone());
        frame.name = Some(meta.name.clone());
        Self {
            frame: Some(frame),
            ..self.clone()
        }
    }

    /// Deselect the library frame.
    pub fn clear_frame(&self) -> Self {
        Self {
            frame: None,
            ..self.clone()
        }
    }

    /// Replace the portrait, keeping the previous brightness and transform.
    pub fn set_character(&self, src: impl Into<String>, dims: NaturalSize) -> Self {
        let prev = self.character.as_ref();
        let mut layer = ImageLayer::new(CHARACTER_ID, LayerKind::Character, src);
        layer.natural_width = dims.map(|d| d.0);
        layer.natural_height = dims.map(|d| d.1);
        layer.brightness = Some(prev.and_then(|c| c.brightness).unwrap_or(100.0));
        layer.transform = prev.map(|c| c.transform).unwrap_or_default();
        Self {
            character: Some(layer),
            ..self.clone()
        }
    }

    /// Patch the portrait.
    pub fn update_character(&self, patch: &ImageLayerPatch) -> Self {
        Self {
            character: self.character.as_ref().map(|c| c.patched(patch)),
            ..self.clone()
        }
    }

    /// Replace the background image, keeping any previous fill color.
    pub fn add_background(&self, src: impl Into<String>, dims: NaturalSize) -> Self {
        let mut layer = ImageLayer::new(BACKGROUND_ID, LayerKind::Background, src);
        layer.natural_width = dims.map(|d| d.0);
        layer.natural_height = dims.map(|d| d.1);
        layer.opacity = Some(1.0);
        layer.background_color = self
            .background
            .as_ref()
            .and_then(|b| b.background_color.clone());
        Self {
            background: Some(layer),
            ..self.clone()
        }
    }

    /// Use a solid fill as background, creating the layer if needed.
    pub fn set_background_color(&self, color: impl Into<String>) -> Self {
        let mut layer = self
            .background
            .clone()
            .unwrap_or_else(|| ImageLayer::new(BACKGROUND_ID, LayerKind::Background, ""));
        layer.background_color = Some(color.into());
        Self {
            background: Some(layer),
            ..self.clone()
        }
    }

    /// Drop the background.
    pub fn remove_background(&self) -> Self {
        Self {
            background: None,
            ..self.clone()
        }
    }

    /// Patch the background.
    pub fn update_background(&self, patch: &ImageLayerPatch) -> Self {
        Self {
            background: self.background.as_ref().map(|b| b.patched(patch)),
            ..self.clone()
        }
    }

    /// Append an overlay at the front of the z-order. Returns the new document and the id.
    pub fn add_overlay(&self, src: impl Into<String>, dims: NaturalSize) -> (Self, String) {
        let id = self.next_overlay_id();
        let mut layer = ImageLayer::new(id.clone(), LayerKind::Overlay, src);
        layer.name = Some(format!("Overlay {}", self.overlays.len() + 1));
        layer.natural_width = dims.map(|d| d.0);
        layer.natural_height = dims.map(|d| d.1);
        layer.opacity = Some(1.0);

        let mut overlays = self.overlays.clone();
        overlays.push(layer);
        (
            Self {
                overlays,
                ..self.clone()
            },
            id,
        )
    }

    /// Patch one overlay.
    pub fn update_overlay(&self, id: &str, patch: &ImageLayerPatch) -> Self {
        self.map_overlay(id, |o| o.patched(patch))
    }

    /// Remove one overlay.
    pub fn remove_overlay(&self, id: &str) -> Self {
        Self {
            overlays: self
                .overlays
                .iter()
                .filter(|o| o.id != id)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// Swap an overlay with the one in front of it.
    pub fn bring_overlay_forward(&self, id: &str) -> Self {
        let mut out = self.clone();
        if let Some(idx) = self.overlays.iter().position(|o| o.id == id)
            && idx + 1 < self.overlays.len()
        {
            out.overlays.swap(idx, idx + 1);
        }
        out
    }

    /// Swap an overlay with the one behind it.
    pub fn send_overlay_backward(&self, id: &str) -> Self {
        let mut out = self.clone();
        if let Some(idx) = self.overlays.iter().position(|o| o.id == id)
            && idx > 0
        {
            out.overlays.swap(idx, idx - 1);
        }
        out
    }

    /// Create the title text with editor defaults if it does not exist yet.
    pub fn ensure_text(&self) -> Self {
        if self.text.is_some() {
            return self.clone();
        }
        Self {
            text: Some(TextLayer {
                id: TEXT_ID.to_owned(),
                text: "Your Title".to_owned(),
                color: "#FFFFFF".to_owned(),
                font_family: "Cinzel".to_owned(),
                font_weight: 700,
                font_size: 64.0,
                align: TextAlign::Center,
                stroke: None,
                shadow: Some(TextShadow {
                    blur: 4.0,
                    offset_x: 2.0,
                    offset_y: 2.0,
                    color: "rgba(0,0,0,0.5)".to_owned(),
                }),
                transform: Transform::default(),
                visible: true,
                locked: None,
            }),
            ..self.clone()
        }
    }

    /// Patch the title text.
    pub fn update_text(&self, patch: &TextLayerPatch) -> Self {
        Self {
            text: self.text.as_ref().map(|t| t.patched(patch)),
            ..self.clone()
        }
    }

    /// Drop the title text.
    pub fn remove_text(&self) -> Self {
        Self {
            text: None,
            ..self.clone()
        }
    }

    /// Set the editor lock flag. Frames cannot be locked.
    pub fn lock_layer(&self, layer: &LayerRef, locked: bool) -> Self {
        match layer {
            LayerRef::Frame => self.clone(),
            LayerRef::Text => Self {
                text: self.text.as_ref().map(|t| TextLayer {
                    locked: Some(locked),
                    ..t.clone()
                }),
                ..self.clone()
            },
            _ => self.map_image_layer(layer, |l| ImageLayer {
                locked: Some(locked),
                ..l.clone()
            }),
        }
    }

    /// Flip visibility.
    pub fn toggle_visibility(&self, layer: &LayerRef) -> Self {
        match layer {
            LayerRef::Text => Self {
                text: self.text.as_ref().map(|t| TextLayer {
                    visible: !t.visible,
                    ..t.clone()
                }),
                ..self.clone()
            },
            _ => self.map_image_layer(layer, |l| ImageLayer {
                visible: !l.visible,
                ..l.clone()
            }),
        }
    }

    /// Merge a transform update into one layer. Frames are always full-bleed and ignore this.
    pub fn update_layer_transform(&self, layer: &LayerRef, patch: TransformPatch) -> Self {
        match layer {
            LayerRef::Frame => self.clone(),
            LayerRef::Text => Self {
                text: self.text.as_ref().map(|t| TextLayer {
                    transform: t.transform.patched(patch),
                    ..t.clone()
                }),
                ..self.clone()
            },
            _ => self.map_image_layer(layer, |l| ImageLayer {
                transform: l.transform.patched(patch),
                ..l.clone()
            }),
        }
    }

    /// Add `delta` to a layer's scale, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn nudge_scale(&self, layer: &LayerRef, delta: f64) -> Self {
        let Some(current) = self.transform_of(layer) else {
            return self.clone();
        };
        let scale = (current.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
        self.update_layer_transform(
            layer,
            TransformPatch {
                scale: Some(scale),
                ..Default::default()
            },
        )
    }

    /// Add `degrees` to a layer's rotation.
    pub fn rotate_by(&self, layer: &LayerRef, degrees: f64) -> Self {
        let Some(current) = self.transform_of(layer) else {
            return self.clone();
        };
        self.update_layer_transform(
            layer,
            TransformPatch {
                rotation: Some(current.rotation + degrees),
                ..Default::default()
            },
        )
    }

    /// Current transform of a layer, if it exists.
    pub fn transform_of(&self, layer: &LayerRef) -> Option<Transform> {
        match layer {
            LayerRef::Background => self.background.as_ref().map(|l| l.transform),
            LayerRef::Frame => self.frame.as_ref().map(|l| l.transform),
            LayerRef::Character => self.character.as_ref().map(|l| l.transform),
            LayerRef::Text => self.text.as_ref().map(|t| t.transform),
            LayerRef::Overlay(id) => self.overlay(id).map(|l| l.transform),
        }
    }

    /// Install a user-uploaded frame/mask pair. Locators are trimmed; when both are empty the
    /// custom frame is removed.
    pub fn set_custom_frame(&self, custom: &CustomFrame) -> Self {
        let frame_url = custom.frame_url.trim().to_owned();
        let mask_url = custom.mask_url.trim().to_owned();
        let custom_frame = (!frame_url.is_empty() || !mask_url.is_empty())
            .then_some(CustomFrame { frame_url, mask_url });
        Self {
            custom_frame,
            ..self.clone()
        }
    }

    /// Remove the custom frame.
    pub fn clear_custom_frame(&self) -> Self {
        Self {
            custom_frame: None,
            ..self.clone()
        }
    }

    /// Rebuild a document from persisted data, keeping the current size when the stored
    /// payload omits it.
    pub fn hydrate(&self, stored: &serde_json::Value) -> crate::TokenResult<Self> {
        let mut base = serde_json::to_value(Self::new(self.size().unwrap_or_default()))
            .map_err(|e| crate::TokenError::serde(format!("serialize base document: {e}")))?;
        if let (Some(base_obj), Some(stored_obj)) = (base.as_object_mut(), stored.as_object()) {
            for (k, v) in stored_obj {
                base_obj.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base)
            .map_err(|e| crate::TokenError::serde(format!("hydrate canvas document: {e}")))
    }

    /// An empty 1024 document.
    pub fn cleared(&self) -> Self {
        Self::new(TokenSize::S1024)
    }

    fn next_overlay_id(&self) -> String {
        let max = self
            .overlays
            .iter()
            .filter_map(|o| o.id.strip_prefix("overlay-")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("overlay-{}", max + 1)
    }

    fn map_overlay(&self, id: &str, f: impl Fn(&ImageLayer) -> ImageLayer) -> Self {
        Self {
            overlays: self
                .overlays
                .iter()
                .map(|o| if o.id == id { f(o) } else { o.clone() })
                .collect(),
            ..self.clone()
        }
    }

    fn map_image_layer(&self, layer: &LayerRef, f: impl Fn(&ImageLayer) -> ImageLayer) -> Self {
        match layer {
            LayerRef::Background => Self {
                background: self.background.as_ref().map(&f),
                ..self.clone()
            },
            LayerRef::Frame => Self {
                frame: self.frame.as_ref().map(&f),
                ..self.clone()
            },
            LayerRef::Character => Self {
                character: self.character.as_ref().map(&f),
                ..self.clone()
            },
            LayerRef::Overlay(id) => self.map_overlay(id, f),
            LayerRef::Text => self.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/edit.rs"]
mod tests;
