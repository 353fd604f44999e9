//! One-shot / looping sound playback over HTML5 audio elements. Everything is
//! a silent no-op until the first user interaction unlocks playback, and a
//! missing handle skips the sound rather than erroring.

use wasm_bindgen::JsCast;
use web_sys::HtmlAudioElement;

use super::assets::AssetStore;
use super::sim::SoundCue;

pub fn play(store: &AssetStore, unlocked: bool, cue: SoundCue) {
    if !unlocked {
        return;
    }
    let Some(aud) = store.audio(cue.key()) else {
        return;
    };
    if cue.looped() {
        // Background music is idempotent: replaying while audible is a no-op.
        if aud.paused() {
            aud.set_loop(true);
            aud.set_volume(cue.volume());
            let _ = aud.play();
        }
    } else {
        // Clone the node so rapid one-shots overlap instead of cutting off.
        if let Ok(clone) = aud.clone_node() {
            if let Ok(clone) = clone.dyn_into::<HtmlAudioElement>() {
                clone.set_volume(cue.volume());
                let _ = clone.play();
            }
        }
    }
}
