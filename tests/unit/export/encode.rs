use super::*;

fn sample() -> Surface {
    // Opaque red, half-transparent green.
    Surface::from_premul(2, 1, vec![255, 0, 0, 255, 0, 128, 0, 128]).unwrap()
}

#[test]
fn png_round_trips_straight_pixels() {
    let bytes = encode(&sample(), ExportFormat::Png).unwrap();
    assert_eq!(
        image::guess_format(&bytes).unwrap(),
        image::ImageFormat::Png
    );
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 255, 0, 128]);
}

#[test]
fn webp_is_lossless() {
    let bytes = encode(&sample(), ExportFormat::WebP).unwrap();
    assert_eq!(
        image::guess_format(&bytes).unwrap(),
        image::ImageFormat::WebP
    );
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
}

#[test]
fn malformed_surface_is_an_encode_error() {
    let empty = Surface {
        width: 0,
        height: 0,
        data: Vec::new(),
    };
    assert!(matches!(
        encode(&empty, ExportFormat::Png),
        Err(TokenError::Encode(_))
    ));

    let short = Surface {
        width: 2,
        height: 2,
        data: vec![0; 4],
    };
    assert!(matches!(
        encode(&short, ExportFormat::WebP),
        Err(TokenError::Encode(_))
    ));
}

#[test]
fn format_metadata_and_parsing() {
    assert_eq!(ExportFormat::Png.extension(), "png");
    assert_eq!(ExportFormat::WebP.mime(), "image/webp");
    assert_eq!("WEBP".parse::<ExportFormat>().unwrap(), ExportFormat::WebP);
    assert!("jpeg".parse::<ExportFormat>().is_err());
    assert_eq!(ExportFormat::default(), ExportFormat::Png);
}
