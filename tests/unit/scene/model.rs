use super::*;
use serde_json::json;

#[test]
fn deserializes_editor_document_shape() {
    let doc: CanvasDoc = serde_json::from_value(json!({
        "width": 512,
        "height": 512,
        "background": {
            "id": "background",
            "type": "background",
            "src": "",
            "backgroundColor": "#FF0000",
            "opacity": 1,
            "transform": {"x": 0, "y": 0, "scale": 1, "rotation": 0},
            "visible": true
        },
        "overlays": [{
            "id": "overlay-1",
            "type": "overlay",
            "src": "overlays/sparkle.png",
            "naturalWidth": 200,
            "naturalHeight": 100,
            "transform": {"x": 10, "y": -4, "scale": 0.5, "rotation": 45},
            "visible": false
        }],
        "text": {
            "id": "text-0",
            "text": "Hi",
            "color": "#FFFFFF",
            "fontFamily": "Cinzel",
            "fontWeight": 700,
            "fontSize": 64,
            "align": "center",
            "shadow": {"blur": 4, "offsetX": 2, "offsetY": 2, "color": "rgba(0,0,0,0.5)"},
            "transform": {"x": 0, "y": 0, "scale": 1, "rotation": 0},
            "visible": true
        },
        "customFrame": {"frameUrl": "f.png", "maskUrl": ""}
    }))
    .unwrap();

    assert_eq!(doc.size().unwrap(), TokenSize::S512);
    let bg = doc.background.as_ref().unwrap();
    assert_eq!(bg.kind, LayerKind::Background);
    assert!(!bg.has_source());
    assert_eq!(bg.background_color.as_deref(), Some("#FF0000"));
    let ov = doc.overlay("overlay-1").unwrap();
    assert!(!ov.visible);
    assert_eq!(ov.natural_width, Some(200));
    assert_eq!(ov.transform.rotation, 45.0);
    assert_eq!(doc.text.as_ref().unwrap().shadow.as_ref().unwrap().offset_x, 2.0);
    assert_eq!(doc.custom_frame.as_ref().unwrap().frame_url, "f.png");
    doc.validate().unwrap();
}

#[test]
fn serializes_camel_case_and_type_tag() {
    let mut layer = ImageLayer::new("character", LayerKind::Character, "me.png");
    layer.brightness = Some(120.0);
    let mut doc = CanvasDoc::default();
    doc.character = Some(layer);

    let v = serde_json::to_value(&doc).unwrap();
    assert_eq!(v["character"]["type"], "character");
    assert_eq!(v["character"]["brightness"], 120.0);
    assert!(v.get("background").is_none());
    assert_eq!(v["overlays"], json!([]));

    let back: CanvasDoc = serde_json::from_value(v).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn validate_rejects_structural_misuse() {
    let mut doc = CanvasDoc::default();
    doc.height = 512;
    assert!(doc.validate().is_err());

    let mut doc = CanvasDoc::default();
    doc.width = 300;
    doc.height = 300;
    assert!(doc.validate().is_err());

    let mut doc = CanvasDoc::default();
    doc.background = Some(ImageLayer::new("background", LayerKind::Character, "x.png"));
    assert!(doc.validate().is_err());

    let mut doc = CanvasDoc::default();
    doc.overlays = vec![
        ImageLayer::new("overlay-1", LayerKind::Overlay, "a.png"),
        ImageLayer::new("overlay-1", LayerKind::Overlay, "b.png"),
    ];
    assert!(doc.validate().is_err());
}

#[test]
fn transform_patch_merges_fields() {
    let t = Transform {
        x: 1.0,
        y: 2.0,
        scale: 1.5,
        rotation: 30.0,
    };
    let p = t.patched(TransformPatch {
        y: Some(-5.0),
        rotation: Some(0.0),
        ..Default::default()
    });
    assert_eq!(
        p,
        Transform {
            x: 1.0,
            y: -5.0,
            scale: 1.5,
            rotation: 0.0
        }
    );
}

#[test]
fn opacity_defaults_to_one_and_clamps() {
    let mut l = ImageLayer::new("o", LayerKind::Overlay, "a.png");
    assert_eq!(l.effective_opacity(), 1.0);
    l.opacity = Some(1.7);
    assert_eq!(l.effective_opacity(), 1.0);
    l.opacity = Some(-0.2);
    assert_eq!(l.effective_opacity(), 0.0);
}
