//! Tokensmith composes layered token avatars.
//!
//! A token is a square image built from a declarative [`CanvasDoc`]:
//!
//! - a background (image or solid color) and a character portrait, clipped to a frame mask
//! - the frame artwork on top of the clipped content
//! - free-floating overlays in document order, then an optional text title
//!
//! Documents are edited through pure copy-on-write operations on [`CanvasDoc`], images are
//! resolved by an [`ImageCache`] backed by an [`ImageLoader`], and a [`Compositor`] produces a
//! 1024×1024 [`Surface`] that [`export`] resizes and encodes as PNG or WebP.
#![forbid(unsafe_code)]

mod assets;
mod export;
mod foundation;
mod persist;
mod render;
mod scene;

pub use crate::foundation::core::{
    Affine, DISPLAY_SIZE, MAX_SURFACE_DIMENSION, MAX_UPLOAD_DIMENSION, Point, RENDER_SIZE, Rect,
    Rgba8Premul, TokenSize, Vec2,
};
pub use crate::foundation::error::{TokenError, TokenResult};

pub use crate::scene::color::ColorDef;
pub use crate::scene::edit::{NaturalSize, ROTATION_STEP, SCALE_STEP};
pub use crate::scene::model::{
    BACKGROUND_ID, CHARACTER_ID, CanvasDoc, CustomFrame, FRAME_ID, ImageLayer, ImageLayerPatch,
    LayerKind, LayerRef, MAX_SCALE, MIN_SCALE, TEXT_ID, TextAlign, TextLayer, TextLayerPatch,
    TextShadow, TextStroke, Transform, TransformPatch,
};

pub use crate::assets::cache::{FrameAssets, ImageCache, ResolvedImages, load_frame_assets};
pub use crate::assets::decode::{PreparedImage, decode_image, resize_image_if_needed};
pub use crate::assets::fonts::FontBook;
pub use crate::assets::loader::{FsImageLoader, ImageLoader, decode_data_url};
pub use crate::assets::manifest::{
    AssetRecord, FrameAssetKind, FrameMeta, FrameSources, MainCategory, PortraitMeta, frame_src,
};

pub use crate::render::compose::{ComposeOpts, Compositor};
pub use crate::render::geometry::{
    full_bleed_transform, image_draw_size, image_transform, layer_frame, layer_origin,
    scale_factor, text_transform,
};
pub use crate::render::layer::LayerRenderer;
pub use crate::render::mask::{apply_stencil, to_alpha_stencil};
pub use crate::render::surface::Surface;

pub use crate::export::encode::{ExportFormat, encode};
pub use crate::export::pipeline::{ExportOpts, export, export_file_name};
pub use crate::export::resize::resize;

pub use crate::persist::debounce::{DebounceOpts, DebouncedWriter};
pub use crate::persist::store::{
    FileStore, MemoryStore, PersistenceStore, STORAGE_KEY, STORAGE_VERSION, decode_envelope,
    encode_envelope, load_doc, save_doc,
};
