use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn parses_hex_forms() {
    assert_eq!(
        ColorDef::parse("#FF0000").unwrap(),
        ColorDef::rgba(1.0, 0.0, 0.0, 1.0)
    );
    assert_eq!(
        ColorDef::parse("#f00").unwrap(),
        ColorDef::rgba(1.0, 0.0, 0.0, 1.0)
    );
    let c = ColorDef::parse("#0000ff80").unwrap();
    assert!(approx(c.b, 1.0));
    assert!(approx(c.a, 128.0 / 255.0));
    assert!(ColorDef::parse("#12345").is_err());
    assert!(ColorDef::parse("#zzzzzz").is_err());
}

#[test]
fn parses_css_rgba_function() {
    let c = ColorDef::parse("rgba(0,0,0,0.5)").unwrap();
    assert_eq!(c, ColorDef::rgba(0.0, 0.0, 0.0, 0.5));

    let c = ColorDef::parse("rgb(255, 128, 0)").unwrap();
    assert!(approx(c.r, 1.0));
    assert!(approx(c.g, 128.0 / 255.0));
    assert!(approx(c.a, 1.0));

    assert!(ColorDef::parse("rgb(1,2)").is_err());
}

#[test]
fn parses_hsl_function_and_names() {
    let c = ColorDef::parse("hsl(0, 100%, 50%)").unwrap();
    assert!(approx(c.r, 1.0));
    assert!(approx(c.g, 0.0));
    assert!(approx(c.b, 0.0));

    assert_eq!(
        ColorDef::parse("White").unwrap(),
        ColorDef::rgba(1.0, 1.0, 1.0, 1.0)
    );
    assert_eq!(ColorDef::parse("transparent").unwrap().a, 0.0);
    assert!(ColorDef::parse("chartreuse-ish").is_err());
}

#[test]
fn premultiplied_conversion_scales_by_alpha() {
    let p = ColorDef::parse("rgba(255,255,255,0.5)")
        .unwrap()
        .to_rgba8_premul();
    assert_eq!(p.to_array(), [128, 128, 128, 128]);
    let p = ColorDef::parse("#FF0000").unwrap().to_rgba8_premul();
    assert_eq!(p.to_array(), [255, 0, 0, 255]);
}
