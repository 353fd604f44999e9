//! Browser-side tests for the DOM-touching pieces (run with `wasm-pack test`).
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use dolphin_jumper::game::assets::AssetStore;
use dolphin_jumper::game::storage;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn failed_image_is_replaced_by_a_placeholder() {
    let mut store = AssetStore::new(1);
    store.fail_image("bg1.png");
    assert!(store.is_complete());
    let ph = store.image("bg1.png").expect("placeholder installed");
    assert!(ph.src().starts_with("data:"));
}

#[wasm_bindgen_test]
fn best_score_round_trips_through_local_storage() {
    storage::save_best(42);
    assert_eq!(storage::load_best(), 42);
    storage::save_best(0);
    assert_eq!(storage::load_best(), 0);
}
