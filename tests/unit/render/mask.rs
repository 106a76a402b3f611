use super::*;

fn surface(px: &[[u8; 4]]) -> Surface {
    Surface::from_premul(px.len() as u32, 1, px.concat()).unwrap()
}

#[test]
fn stencil_alpha_comes_from_red() {
    let s = to_alpha_stencil(&surface(&[
        [255, 255, 255, 255],
        [0, 0, 0, 255],
        [128, 128, 128, 255],
        [255, 0, 0, 255],
        [0, 255, 255, 255],
    ]));
    assert_eq!(s.pixel(0, 0).unwrap().to_array(), [255; 4]);
    assert_eq!(s.pixel(1, 0).unwrap().to_array(), [0; 4]);
    assert_eq!(s.pixel(2, 0).unwrap().to_array(), [128; 4]);
    // Red is authoritative even on colored masks.
    assert_eq!(s.pixel(3, 0).unwrap().a, 255);
    assert_eq!(s.pixel(4, 0).unwrap().a, 0);
}

#[test]
fn stencil_is_idempotent_on_binary_masks() {
    let mask = surface(&[[255, 255, 255, 255], [0, 0, 0, 255], [0, 0, 0, 0]]);
    let once = to_alpha_stencil(&mask);
    let twice = to_alpha_stencil(&once);
    assert_eq!(once, twice);
}

#[test]
fn apply_clips_to_stencil() {
    let mut dst = surface(&[[10, 20, 30, 255], [10, 20, 30, 255]]);
    let stencil = to_alpha_stencil(&surface(&[[255, 255, 255, 255], [0, 0, 0, 255]]));
    apply_stencil(&mut dst, &stencil).unwrap();
    assert_eq!(dst.pixel(0, 0).unwrap().to_array(), [10, 20, 30, 255]);
    assert_eq!(dst.pixel(1, 0).unwrap().to_array(), [0, 0, 0, 0]);
}

#[test]
fn apply_rejects_size_mismatch() {
    let mut dst = Surface::square(2).unwrap();
    let stencil = Surface::square(3).unwrap();
    assert!(apply_stencil(&mut dst, &stencil).is_err());
}
