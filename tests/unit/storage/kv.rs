use super::*;

#[test]
fn memory_store_get_set_remove() {
    let store = MemoryStore::new();
    assert!(store.is_empty());
    store.set("a", "1").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    store.set("a", "2").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
    store.remove("a").unwrap();
    store.remove("missing").unwrap();
    assert_eq!(store.get("a").unwrap(), None);
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("booth.json");

    {
        let store = FileStore::open(&path).unwrap();
        store.set("photoStrips", "[]").unwrap();
        store.set("count", "3").unwrap();
        store.remove("count").unwrap();
    }

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("photoStrips").unwrap().as_deref(), Some("[]"));
    assert_eq!(reopened.get("count").unwrap(), None);
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn file_store_rejects_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("booth.json");
    std::fs::write(&path, b"{not json").unwrap();
    assert!(matches!(FileStore::open(&path), Err(BoothError::Serde(_))));
}
