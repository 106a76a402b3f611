use std::path::PathBuf;

use super::*;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "tokensmith_store_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_doc() -> CanvasDoc {
    CanvasDoc::default().set_background_color("#ff0000")
}

#[test]
fn envelope_carries_version_and_data() {
    let payload = encode_envelope(&sample_doc()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(v["version"], 1);
    assert_eq!(v["data"]["width"], 1024);
    assert_eq!(decode_envelope(&payload), Some(sample_doc()));
}

#[test]
fn foreign_version_loads_as_none() {
    let payload = r#"{"version":2,"data":{"width":1024,"height":1024}}"#;
    assert_eq!(decode_envelope(payload), None);
}

#[test]
fn corrupt_payload_loads_as_none() {
    assert_eq!(decode_envelope("not json"), None);
    assert_eq!(decode_envelope(r#"{"data":{}}"#), None);
    assert_eq!(
        decode_envelope(r#"{"version":1,"data":{"width":"wide"}}"#),
        None
    );
}

#[test]
fn partial_data_is_hydrated_over_an_empty_document() {
    let doc = decode_envelope(r#"{"version":1,"data":{"overlays":[]}}"#).unwrap();
    assert_eq!(doc, CanvasDoc::default());
}

#[test]
fn memory_store_clones_share_one_slot() {
    let mut a = MemoryStore::new();
    let b = a.clone();
    assert_eq!(load_doc(&b), None);
    save_doc(&mut a, &sample_doc()).unwrap();
    assert_eq!(load_doc(&b), Some(sample_doc()));
    a.clear().unwrap();
    assert!(b.contents().is_none());
}

#[test]
fn file_store_round_trips_and_clears() {
    let dir = temp_dir("file");
    let mut store = FileStore::in_dir(dir.join("nested"));
    assert!(store.path().ends_with("tokengen_canvas_v1.json"));
    assert_eq!(store.load().unwrap(), None);

    save_doc(&mut store, &sample_doc()).unwrap();
    assert_eq!(load_doc(&store), Some(sample_doc()));

    store.clear().unwrap();
    assert_eq!(load_doc(&store), None);
    // Clearing twice is fine.
    store.clear().unwrap();
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn unreadable_file_loads_as_none() {
    let dir = temp_dir("garbage");
    let store = FileStore::new(dir.join("canvas.json"));
    std::fs::write(store.path(), b"{\"version\":1,").unwrap();
    assert_eq!(load_doc(&store), None);
    std::fs::remove_dir_all(dir).ok();
}
