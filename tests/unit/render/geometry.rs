use super::*;
use crate::foundation::core::Point;

fn close(a: Point, b: (f64, f64)) -> bool {
    (a.x - b.0).abs() < 1e-9 && (a.y - b.1).abs() < 1e-9
}

#[test]
fn scale_factor_tracks_render_size() {
    assert_eq!(scale_factor(1024), 2.0);
    assert_eq!(scale_factor(512), 1.0);
    assert_eq!(scale_factor(256), 0.5);
}

#[test]
fn origin_maps_display_offsets() {
    let t = Transform {
        x: 10.0,
        y: -20.0,
        ..Transform::default()
    };
    assert_eq!(layer_origin(&t, 1024), Vec2::new(532.0, 472.0));
    assert_eq!(layer_origin(&t, 512), Vec2::new(266.0, 236.0));
}

#[test]
fn image_is_centered_and_scaled() {
    let t = Transform {
        scale: 0.5,
        ..Transform::default()
    };
    assert_eq!(image_draw_size(&t, (400, 200), 1024), (400.0, 200.0));

    let a = image_transform(&t, (400, 200), 1024);
    assert!(close(a * Point::new(0.0, 0.0), (312.0, 412.0)));
    assert!(close(a * Point::new(200.0, 100.0), (512.0, 512.0)));
    assert!(close(a * Point::new(400.0, 200.0), (712.0, 612.0)));
}

#[test]
fn rotation_is_independent_of_render_size() {
    let t = Transform {
        rotation: 90.0,
        ..Transform::default()
    };
    let a = image_transform(&t, (100, 100), 512);
    // The top-left corner rotates to the top-right around the center.
    assert!(close(a * Point::new(0.0, 0.0), (306.0, 206.0)));
}

#[test]
fn relative_placement_is_size_invariant() {
    let t = Transform {
        x: 37.0,
        y: -11.0,
        scale: 1.3,
        rotation: 20.0,
    };
    let p = Point::new(13.0, 7.0);
    let big = image_transform(&t, (64, 48), 1024) * p;
    let small = image_transform(&t, (64, 48), 256) * p;
    assert!((big.x / 1024.0 - small.x / 256.0).abs() < 1e-9);
    assert!((big.y / 1024.0 - small.y / 256.0).abs() < 1e-9);
}

#[test]
fn text_scale_is_not_multiplied_by_k() {
    let t = Transform {
        scale: 2.0,
        ..Transform::default()
    };
    let a = text_transform(&t, 1024);
    assert!(close(a * Point::new(10.0, 0.0), (532.0, 512.0)));
}

#[test]
fn full_bleed_stretches() {
    let a = full_bleed_transform((512, 256), 1024, 1024);
    assert!(close(a * Point::new(512.0, 256.0), (1024.0, 1024.0)));
}
