use super::*;

const DEJAVU_SANS: &[u8] = include_bytes!("../../data/fonts/DejaVuSans.ttf");

#[test]
fn empty_book_shapes_nothing() {
    let mut book = FontBook::new();
    assert!(book.is_empty());
    assert!(book.families().is_empty());
    assert!(book.shape("hi", "Cinzel", 700, 64.0).unwrap().is_none());
}

#[test]
fn rejects_bad_size_and_bytes() {
    let mut book = FontBook::new();
    assert!(book.shape("hi", "x", 400, 0.0).is_err());
    assert!(book.shape("hi", "x", 400, f32::NAN).is_err());
    assert!(book.register(b"not a font".to_vec()).is_err());
    assert!(book.register_file("/nonexistent/font.ttf").is_err());
}

#[test]
fn shapes_with_registered_font() {
    let mut book = FontBook::new();
    let family = book.register(DEJAVU_SANS.to_vec()).unwrap();
    assert_eq!(family, "DejaVu Sans");
    assert!(book.has_family(&family));
    assert!(book.has_family(&family.to_uppercase()));
    assert_eq!(book.families(), vec![family.as_str()]);

    let shaped = book.shape("Hello", &family, 400, 48.0).unwrap().unwrap();
    assert!(shaped.layout.width() > 0.0);
    assert!(shaped.layout.lines().next().is_some());

    // Unknown families fall back to the first registered one.
    let fallback = book.shape("Hello", "Cinzel", 700, 48.0).unwrap().unwrap();
    assert_eq!(fallback.family, family);
}
