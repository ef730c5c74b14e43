use web_sys::window;

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Read a raw value from localStorage. Unavailable storage reads as absent.
pub fn load(key: &str) -> Option<String> {
    get_local_storage()?.get_item(key).ok()?
}

/// Write a raw value to localStorage; failures are logged and ignored.
pub fn save(key: &str, value: &str) {
    match get_local_storage() {
        Some(storage) => {
            if storage.set_item(key, value).is_err() {
                log::warn!("Could not save '{}' to localStorage", key);
            }
        }
        None => log::warn!("localStorage unavailable, '{}' not saved", key),
    }
}

/// Remove a key from localStorage
pub fn remove(key: &str) {
    if let Some(storage) = get_local_storage() {
        if storage.remove_item(key).is_err() {
            log::warn!("Could not clear '{}' from localStorage", key);
        }
    }
}
