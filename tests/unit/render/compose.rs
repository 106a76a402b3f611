use super::*;
use crate::scene::model::{CustomFrame, ImageLayer, LayerKind};

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PreparedImage {
    PreparedImage::solid(w, h, rgba).unwrap()
}

fn red_bg_doc() -> CanvasDoc {
    CanvasDoc::default().set_background_color("#FF0000")
}

fn frame_layer() -> ImageLayer {
    ImageLayer::new("frame", LayerKind::Frame, "/frames/x")
}

// Left half white, right half black.
fn half_mask() -> PreparedImage {
    let mut px = Vec::new();
    for _y in 0..4 {
        for x in 0..4 {
            px.extend_from_slice(if x < 2 { &[255, 255, 255, 255] } else { &[0, 0, 0, 255] });
        }
    }
    PreparedImage::from_straight(4, 4, px).unwrap()
}

#[test]
fn compose_defaults_to_render_size() {
    let out = Compositor::default()
        .compose(&CanvasDoc::default(), &ResolvedImages::default(), None, None)
        .unwrap();
    assert_eq!((out.width, out.height), (1024, 1024));
    assert!(out.is_transparent());
}

#[test]
fn background_can_be_excluded() {
    let mut c = Compositor::with_opts(
        FontBook::new(),
        ComposeOpts {
            include_background: false,
        },
    );
    let out = c
        .compose_at(&red_bg_doc(), &ResolvedImages::default(), None, None, 32)
        .unwrap();
    assert!(out.is_transparent());
    assert!(ComposeOpts::default().include_background);
}

#[test]
fn mask_clips_background_and_character() {
    let mut c = Compositor::default();
    let out = c
        .compose_at(
            &red_bg_doc(),
            &ResolvedImages::default(),
            None,
            Some(&half_mask()),
            64,
        )
        .unwrap();
    assert_eq!(out.pixel(4, 32).unwrap().to_array(), [255, 0, 0, 255]);
    assert_eq!(out.pixel(60, 32).unwrap().a, 0);
}

#[test]
fn overlays_are_not_masked() {
    let (doc, id) = red_bg_doc().add_overlay("o.png", None);
    let images = ResolvedImages::default().with(id, solid(64, 64, [0, 0, 255, 255]));
    let out = Compositor::default()
        .compose_at(&doc, &images, None, Some(&half_mask()), 64)
        .unwrap();
    // k = 64 / 512, so the 64px overlay covers 8px around the center.
    assert_eq!(out.pixel(33, 32).unwrap().to_array(), [0, 0, 255, 255]);
    assert_eq!(out.pixel(60, 10).unwrap().a, 0);
}

#[test]
fn character_without_image_is_skipped() {
    let doc = CanvasDoc::default().set_character("hero.png", None);
    let out = Compositor::default()
        .compose_at(&doc, &ResolvedImages::default(), None, None, 32)
        .unwrap();
    assert!(out.is_transparent());
}

#[test]
fn frame_draws_over_masked_layers() {
    let doc = CanvasDoc {
        frame: Some(frame_layer()),
        ..red_bg_doc()
    };
    let frame = solid(4, 4, [0, 255, 0, 255]);
    let out = Compositor::default()
        .compose_at(&doc, &ResolvedImages::default(), Some(&frame), None, 32)
        .unwrap();
    assert_eq!(out.pixel(16, 16).unwrap().to_array(), [0, 255, 0, 255]);
}

#[test]
fn frame_requires_a_visible_slot_or_custom_artwork() {
    let frame = solid(4, 4, [0, 255, 0, 255]);
    let mut c = Compositor::default();

    let no_slot = c
        .compose_at(&red_bg_doc(), &ResolvedImages::default(), Some(&frame), None, 16)
        .unwrap();
    assert_eq!(no_slot.pixel(8, 8).unwrap().to_array(), [255, 0, 0, 255]);

    let mut hidden_layer = frame_layer();
    hidden_layer.visible = false;
    let hidden = CanvasDoc {
        frame: Some(hidden_layer),
        ..red_bg_doc()
    };
    let out = c
        .compose_at(&hidden, &ResolvedImages::default(), Some(&frame), None, 16)
        .unwrap();
    assert_eq!(out.pixel(8, 8).unwrap().to_array(), [255, 0, 0, 255]);

    let custom = red_bg_doc().set_custom_frame(&CustomFrame {
        frame_url: "data:image/png;base64,AAAA".into(),
        mask_url: String::new(),
    });
    let out = c
        .compose_at(&custom, &ResolvedImages::default(), Some(&frame), None, 16)
        .unwrap();
    assert_eq!(out.pixel(8, 8).unwrap().to_array(), [0, 255, 0, 255]);
}
