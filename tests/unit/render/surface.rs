use super::*;

#[test]
fn new_surface_is_transparent() {
    let s = Surface::new(3, 2).unwrap();
    assert_eq!(s.data.len(), 24);
    assert!(s.is_transparent());
    assert_eq!(s.pixel(2, 1), Some(Rgba8Premul::transparent()));
    assert_eq!(s.pixel(3, 0), None);
}

#[test]
fn rejects_zero_and_oversized_dimensions() {
    assert!(Surface::new(0, 4).is_err());
    assert!(Surface::square(0).is_err());
    assert!(Surface::new(9000, 1).is_err());
    assert!(Surface::from_premul(2, 2, vec![0; 8]).is_err());
}

#[test]
fn straight_conversion_unpremultiplies() {
    let s = Surface::from_premul(2, 1, vec![64, 0, 32, 128, 0, 0, 0, 0]).unwrap();
    let straight = s.to_straight_rgba8();
    assert_eq!(&straight[0..4], &[128, 0, 64, 128]);
    assert_eq!(&straight[4..8], &[0, 0, 0, 0]);
}

#[test]
fn fill_and_clear() {
    let mut s = Surface::square(2).unwrap();
    s.fill(Rgba8Premul::from_straight_rgba(255, 0, 0, 255));
    assert_eq!(s.pixel(1, 1).unwrap().to_array(), [255, 0, 0, 255]);
    s.clear();
    assert!(s.is_transparent());
}

#[test]
fn pixmap_conversion_checks_length() {
    assert!(pixmap_from_premul_bytes(&[0; 12], 2, 2).is_err());
    let pm = pixmap_from_premul_bytes(&[9; 16], 2, 2).unwrap();
    assert_eq!(pm.data_as_u8_slice(), &[9; 16]);
}

#[test]
fn from_prepared_image_keeps_pixels() {
    let img = PreparedImage::solid(2, 2, [0, 255, 0, 255]).unwrap();
    let s = Surface::from(img);
    assert_eq!((s.width, s.height), (2, 2));
    assert_eq!(s.pixel(0, 0).unwrap().to_array(), [0, 255, 0, 255]);
}
