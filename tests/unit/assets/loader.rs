use std::io::Cursor;

use super::*;

fn png_bytes(px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(2, 1, px.repeat(2)).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "tokensmith_loader_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn loads_relative_and_root_relative_paths() {
    let dir = temp_dir("fs");
    std::fs::create_dir_all(dir.join("frames")).unwrap();
    std::fs::write(dir.join("frames/f.png"), png_bytes([0, 255, 0, 255])).unwrap();

    let loader = FsImageLoader::new(&dir);
    assert_eq!(loader.load("frames/f.png").unwrap().dimensions(), (2, 1));
    assert_eq!(loader.load("/frames/f.png").unwrap().dimensions(), (2, 1));
    assert!(loader.load("frames/missing.png").is_err());
    assert!(loader.load("../escape.png").is_err());
    assert!(loader.load("https://cdn.example/f.png").is_err());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn loads_base64_data_urls() {
    let url = format!(
        "data:image/png;base64,{}",
        BASE64_STANDARD.encode(png_bytes([255, 0, 0, 255]))
    );
    let img = FsImageLoader::new(".").load(&url).unwrap();
    assert_eq!(&img.rgba8_premul[0..4], &[255, 0, 0, 255]);

    assert!(decode_data_url("data:text/plain,hello").is_err());
    assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    assert_eq!(decode_data_url("frames/a.png").unwrap(), None);
}
