use super::*;

#[test]
fn over_opaque_replaces_and_half_opacity_blends() {
    let mut dst = vec![0, 0, 255, 255];
    over_in_place(&mut dst, &[255, 0, 0, 255], 1.0).unwrap();
    assert_eq!(dst, vec![255, 0, 0, 255]);

    let mut dst = vec![0, 0, 255, 255];
    over_in_place(&mut dst, &[255, 0, 0, 255], 0.5).unwrap();
    // op = 128: src contributes 128, dst keeps 255 * 127 / 255.
    assert_eq!(dst, vec![128, 0, 127, 255]);
}

#[test]
fn over_zero_opacity_is_noop() {
    let mut dst = vec![1, 2, 3, 4];
    over_in_place(&mut dst, &[255, 255, 255, 255], 0.0).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 4]);
}

#[test]
fn over_rejects_mismatched_buffers() {
    let mut dst = vec![0; 8];
    assert!(over_in_place(&mut dst, &[0; 4], 1.0).is_err());
}

#[test]
fn destination_in_scales_by_stencil_alpha() {
    let mut dst = vec![200, 100, 50, 255, 200, 100, 50, 255, 200, 100, 50, 255];
    let stencil = [255, 255, 255, 255, 0, 0, 0, 0, 128, 128, 128, 128];
    destination_in_place(&mut dst, &stencil).unwrap();
    assert_eq!(&dst[0..4], &[200, 100, 50, 255]);
    assert_eq!(&dst[4..8], &[0, 0, 0, 0]);
    assert_eq!(&dst[8..12], &[100, 50, 25, 128]);
}

#[test]
fn brightness_scales_color_not_alpha() {
    let mut buf = vec![100, 50, 20, 255];
    brightness_in_place(&mut buf, 50.0);
    assert_eq!(buf, vec![50, 25, 10, 255]);

    let mut buf = vec![100, 200, 0, 255];
    brightness_in_place(&mut buf, 200.0);
    assert_eq!(buf, vec![200, 255, 0, 255]);

    let mut same = vec![7, 8, 9, 255];
    brightness_in_place(&mut same, 100.0);
    assert_eq!(same, vec![7, 8, 9, 255]);
}

#[test]
fn tint_uses_coverage_alpha() {
    let mut out = vec![0; 8];
    tint_coverage(
        &[255, 255, 255, 255, 0, 0, 0, 0],
        Rgba8Premul::from_straight_rgba(0, 0, 255, 255),
        &mut out,
    )
    .unwrap();
    assert_eq!(out, vec![0, 0, 255, 255, 0, 0, 0, 0]);
}

#[test]
fn dilate_grows_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; 100];
    let c = (2 * 5 + 2) * 4;
    src[c..c + 4].copy_from_slice(&[255, 255, 255, 255]);
    let out = dilate_alpha(&src, w, h, 1.0);
    let alpha = |x: usize, y: usize| out[(y * 5 + x) * 4 + 3];
    assert_eq!(alpha(2, 2), 255);
    assert_eq!(alpha(1, 2), 255);
    assert_eq!(alpha(2, 3), 255);
    assert_eq!(alpha(0, 0), 0);
    assert_eq!(alpha(4, 2), 0);
}

#[test]
fn shift_moves_pixels_and_exposes_transparency() {
    let src = vec![1, 1, 1, 1, 2, 2, 2, 2];
    let out = shift(&src, 2, 1, 1, 0);
    assert_eq!(out, vec![0, 0, 0, 0, 1, 1, 1, 1]);
}

#[test]
fn blur_preserves_uniform_interior_and_spreads_edges() {
    let kernel = gaussian_kernel_q16(3, 1.0).unwrap();
    assert_eq!(kernel.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);

    let (w, h) = (9u32, 1u32);
    let mut src = vec![0u8; 36];
    let c = 4 * 4;
    src[c..c + 4].copy_from_slice(&[255, 255, 255, 255]);
    let out = gaussian_blur(&src, w, h, 1.0).unwrap();
    assert!(out[c + 3] < 255);
    assert!(out[c + 4 + 3] > 0);
    assert_eq!(gaussian_blur(&src, w, h, 0.0).unwrap(), src);
}
