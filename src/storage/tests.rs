use super::Storage;

pub fn run_all_storage_tests(storage: &dyn Storage) {
    test_set_get(storage);
    test_overwrite(storage);
    test_delete(storage);
}

fn test_set_get(storage: &dyn Storage) {
    assert!(storage.get("access_token").unwrap().is_none());

    storage.set("access_token", "header.payload.sig").unwrap();
    storage.set("refresh_token", "opaque-uuid").unwrap();

    assert_eq!(
        storage.get("access_token").unwrap().as_deref(),
        Some("header.payload.sig")
    );
    assert_eq!(
        storage.get("refresh_token").unwrap().as_deref(),
        Some("opaque-uuid")
    );
}

fn test_overwrite(storage: &dyn Storage) {
    storage.set("token_expiry", "1700000000000").unwrap();
    storage.set("token_expiry", "1").unwrap();
    assert_eq!(storage.get("token_expiry").unwrap().as_deref(), Some("1"));
}

fn test_delete(storage: &dyn Storage) {
    storage.delete("access_token").unwrap();
    assert!(storage.get("access_token").unwrap().is_none());

    // Deleting a missing key is fine
    storage.delete("access_token").unwrap();
    storage.delete("never_written").unwrap();

    assert!(storage.get("refresh_token").unwrap().is_some());
}
