//! Asset manifest and store. Loading is best effort: every asset is attempted
//! exactly once and failures degrade (placeholder image / silent audio)
//! instead of blocking the load screen. Completion is a count comparison so
//! the Loading→Cover transition fires exactly once.

use std::collections::HashMap;

use web_sys::{HtmlAudioElement, HtmlImageElement};

use super::sim::SpriteMetrics;

pub const ASSETS_PATH: &str = "./assets/";
/// Audio loads that stay silent this long are accepted as loaded anyway.
pub const AUDIO_GRACE_MS: i32 = 2000;

pub const IMG_BACKGROUND: &str = "bg1.png";
pub const IMG_COVER: &str = "cover.png";
pub const IMG_SHIELD: &str = "shield.png";

pub const SEQ_SWIM: [&str; 4] = ["swim1.png", "swim2.png", "swim3.png", "swim4.png"];
pub const SEQ_JUMP: [&str; 6] =
    ["jump1.png", "jump2.png", "jump3.png", "jump4.png", "jump5.png", "jump6.png"];
pub const SEQ_WATER: [&str; 4] = ["water1.png", "water2.png", "water3.png", "water4.png"];
pub const SEQ_ICE: [&str; 6] =
    ["ice1.png", "ice2.png", "ice3.png", "ice4.png", "ice5.png", "ice6.png"];
pub const SEQ_CLOUD: [&str; 6] =
    ["cloud1.png", "cloud2.png", "cloud3.png", "cloud4.png", "cloud5.png", "cloud6.png"];

/// Audio manifest: (logical key, filename, required). Optional entries are
/// tolerated missing without so much as a degraded gameplay path.
pub const AUDIO_MANIFEST: [(&str, &str, bool); 6] = [
    ("bgmusic", "bgmusic.mp3", true),
    ("jump", "jumpw.mp3", true),
    ("splash", "splash1.mp3", true),
    ("gameover", "gameover.mp3", true),
    ("shield", "shield.wav", false),
    ("hit", "hit.wav", false),
];

/// Every image filename the game requests, in load order.
pub fn image_manifest() -> Vec<&'static str> {
    let mut list = vec![IMG_BACKGROUND, IMG_COVER, IMG_SHIELD];
    list.extend(SEQ_SWIM);
    list.extend(SEQ_JUMP);
    list.extend(SEQ_WATER);
    list.extend(SEQ_ICE);
    list.extend(SEQ_CLOUD);
    list
}

pub fn total_assets() -> usize {
    image_manifest().len() + AUDIO_MANIFEST.len()
}

/// Loaded handles keyed by filename (images) or logical key (audio). Audio
/// entries hold `None` when the file failed to load, which downgrades that
/// one sound to a no-op.
pub struct AssetStore {
    images: HashMap<String, HtmlImageElement>,
    audio: HashMap<String, Option<HtmlAudioElement>>,
    loaded: usize,
    total: usize,
}

impl AssetStore {
    pub fn new(total: usize) -> Self {
        Self { images: HashMap::new(), audio: HashMap::new(), loaded: 0, total }
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.loaded, self.total)
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }

    pub fn image(&self, name: &str) -> Option<&HtmlImageElement> {
        self.images.get(name)
    }

    pub fn audio(&self, key: &str) -> Option<&HtmlAudioElement> {
        self.audio.get(key).and_then(|a| a.as_ref())
    }

    pub fn insert_image(&mut self, name: &str, img: HtmlImageElement) {
        if self.images.contains_key(name) {
            return;
        }
        self.images.insert(name.to_string(), img);
        self.loaded += 1;
    }

    /// Record an image that failed to load, substituting a generated
    /// placeholder so rendering degrades instead of erroring.
    pub fn fail_image(&mut self, name: &str) {
        if self.images.contains_key(name) {
            return;
        }
        warn(&format!("missing image: {name}"));
        #[cfg(target_arch = "wasm32")]
        if let Some(ph) = make_placeholder(name) {
            self.images.insert(name.to_string(), ph);
        }
        self.loaded += 1;
    }

    /// Record a ready audio handle. Returns false (and counts nothing) when
    /// the key already settled; `canplaythrough` and the grace timeout can
    /// both fire for the same element.
    pub fn insert_audio(&mut self, key: &str, aud: HtmlAudioElement) -> bool {
        if self.audio.contains_key(key) {
            return false;
        }
        self.audio.insert(key.to_string(), Some(aud));
        self.loaded += 1;
        true
    }

    /// Record an audio load failure as a null sentinel.
    pub fn fail_audio(&mut self, key: &str) {
        if self.audio.contains_key(key) {
            return;
        }
        warn(&format!("missing audio: {key}"));
        self.audio.insert(key.to_string(), None);
        self.loaded += 1;
    }

    /// Sprite dimensions the simulation needs, read from the loaded images.
    /// Placeholders and still-decoding images fall back to 64x64.
    pub fn sprite_metrics(&self) -> SpriteMetrics {
        let size = |name: &str| -> (f64, f64) {
            match self.image(name) {
                Some(img) if img.natural_width() > 0 => {
                    (img.natural_width() as f64, img.natural_height() as f64)
                }
                _ => (64.0, 64.0),
            }
        };
        let mut ice = [(0.0, 0.0); 6];
        for (i, name) in SEQ_ICE.iter().enumerate() {
            ice[i] = size(name);
        }
        let mut cloud = [(0.0, 0.0); 6];
        for (i, name) in SEQ_CLOUD.iter().enumerate() {
            cloud[i] = size(name);
        }
        SpriteMetrics {
            swim: size(SEQ_SWIM[0]),
            jump_apex: size(SEQ_JUMP[5]),
            ice,
            cloud,
            shield_available: self.image(IMG_SHIELD).is_some(),
        }
    }
}

/// Load failures go to the browser console; on the native test host they
/// fall through to stderr.
fn warn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{msg}");
}

/// 64x64 red square carrying the missing filename, rendered through a scratch
/// canvas and handed back as a regular image element.
#[cfg(target_arch = "wasm32")]
fn make_placeholder(name: &str) -> Option<HtmlImageElement> {
    use wasm_bindgen::JsCast;

    let doc = web_sys::window()?.document()?;
    let canvas: web_sys::HtmlCanvasElement =
        doc.create_element("canvas").ok()?.dyn_into().ok()?;
    canvas.set_width(64);
    canvas.set_height(64);
    let ctx: web_sys::CanvasRenderingContext2d =
        canvas.get_context("2d").ok()??.dyn_into().ok()?;
    ctx.set_fill_style_str("red");
    ctx.fill_rect(0.0, 0.0, 64.0, 64.0);
    ctx.set_fill_style_str("white");
    ctx.set_font("10px Arial");
    ctx.fill_text_with_max_width(name, 5.0, 30.0, 50.0).ok();

    let url = canvas.to_data_url().ok()?;
    let img = HtmlImageElement::new().ok()?;
    img.set_src(&url);
    Some(img)
}
