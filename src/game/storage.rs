//! High-score persistence: one integer under a fixed localStorage key.
//! Absent or unparsable values read as zero; storage being unavailable
//! (private browsing, disabled) silently disables persistence.

use web_sys::window;

const HIGHSCORE_KEY: &str = "jumper_highscore";

fn local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok().flatten()
}

pub fn load_best() -> u32 {
    local_storage()
        .and_then(|s| s.get_item(HIGHSCORE_KEY).ok().flatten())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

pub fn save_best(best: u32) {
    if let Some(store) = local_storage() {
        let _ = store.set_item(HIGHSCORE_KEY, &best.to_string());
    }
}
