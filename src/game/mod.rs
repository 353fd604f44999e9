//! Game runtime: the shared context struct, asset-load wiring and the
//! requestAnimationFrame loop. All mutation funnels through the thread-local
//! context cell; listeners and the frame callback borrow it one at a time, so
//! simulation state is only ever touched inside a single frame's tick.

pub mod assets;
pub mod audio;
pub mod input;
pub mod render;
pub mod sim;
pub mod storage;

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, HtmlAudioElement, HtmlCanvasElement, HtmlImageElement, window,
};

use self::assets::{
    ASSETS_PATH, AUDIO_GRACE_MS, AUDIO_MANIFEST, AssetStore, image_manifest, total_assets,
};
use self::sim::{Mode, Rng, SimState, SpriteMetrics};

/// Everything the frame tick needs, owned by one thread-local cell.
pub struct Game {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub assets: AssetStore,
    pub sim: SimState,
    /// Built once from the asset store when loading completes.
    pub metrics: Option<SpriteMetrics>,
    /// Live pointer position in canvas coordinates (button hover + clicks).
    pub mouse: (f64, f64),
    /// Renderer-owned stream for the screen-shake jitter.
    jitter: Rng,
}

thread_local! {
    static GAME: RefCell<Option<Game>> = RefCell::new(None);
}

pub(crate) fn with_game<F: FnOnce(&mut Game)>(f: F) {
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            f(game);
        }
    });
}

pub fn start() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;

    // Reuse the page's canvas if present, otherwise create one.
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("gameCanvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("gameCanvas");
        doc.body().ok_or_else(|| JsValue::from_str("no body"))?.append_child(&c)?;
        c
    };
    // Fixed internal resolution; display scaling is CSS's problem.
    canvas.set_width(sim::CANVAS_W as u32);
    canvas.set_height(sim::CANVAS_H as u32);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let game = Game {
        canvas: canvas.clone(),
        ctx,
        assets: AssetStore::new(total_assets()),
        sim: SimState::new(storage::load_best(), Rng::from_entropy()),
        metrics: None,
        mouse: (0.0, 0.0),
        jitter: Rng::from_entropy(),
    };
    GAME.with(|cell| cell.replace(Some(game)));

    input::wire(&canvas)?;
    begin_load()?;
    start_loop();
    Ok(())
}

/// One display-refresh tick: finish loading once, step, play queued sounds,
/// persist an improved best, paint.
fn tick(game: &mut Game) {
    if game.sim.mode == Mode::Loading && game.assets.is_complete() {
        game.metrics = Some(game.assets.sprite_metrics());
        game.sim.set_mode(Mode::Cover);
    }

    let metrics = game.metrics.clone().unwrap_or_default();
    game.sim.step(&metrics);

    for cue in game.sim.take_sounds() {
        audio::play(&game.assets, game.sim.audio_unlocked, cue);
    }
    if game.sim.best_dirty {
        storage::save_best(game.sim.best);
        game.sim.best_dirty = false;
    }

    render::draw(&game.ctx, &game.assets, &game.sim, game.mouse, &mut game.jitter);
}

type FrameCallback = std::rc::Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_loop() {
    let f: FrameCallback = std::rc::Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        with_game(tick);
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

/// Kick off every asset load. Each asset settles exactly once into the store;
/// audio additionally races a grace timeout so a codec that never reports
/// `canplaythrough` cannot hang the load screen.
fn begin_load() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;

    for name in image_manifest() {
        let img = HtmlImageElement::new()?;
        img.set_src(&format!("{ASSETS_PATH}{name}"));

        let img_ok = img.clone();
        let ok = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let handle = img_ok.clone();
            with_game(move |g| g.assets.insert_image(name, handle));
        }) as Box<dyn FnMut(web_sys::Event)>);
        img.add_event_listener_with_callback("load", ok.as_ref().unchecked_ref())?;
        ok.forget();

        let err = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            with_game(|g| g.assets.fail_image(name));
        }) as Box<dyn FnMut(web_sys::Event)>);
        img.add_event_listener_with_callback("error", err.as_ref().unchecked_ref())?;
        err.forget();
    }

    for (key, file, _required) in AUDIO_MANIFEST {
        let aud = HtmlAudioElement::new()?;
        aud.set_src(&format!("{ASSETS_PATH}{file}"));

        let aud_ok = aud.clone();
        let ok = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let handle = aud_ok.clone();
            with_game(move |g| {
                let _ = g.assets.insert_audio(key, handle);
            });
        }) as Box<dyn FnMut(web_sys::Event)>);
        aud.add_event_listener_with_callback("canplaythrough", ok.as_ref().unchecked_ref())?;
        ok.forget();

        let err = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            with_game(|g| g.assets.fail_audio(key));
        }) as Box<dyn FnMut(web_sys::Event)>);
        aud.add_event_listener_with_callback("error", err.as_ref().unchecked_ref())?;
        err.forget();

        // Grace fallback: accept the element as loaded after the timeout if
        // neither event settled it (insert_audio is double-count safe).
        let aud_late = aud.clone();
        let late = Closure::wrap(Box::new(move || {
            let handle = aud_late.clone();
            with_game(move |g| {
                let _ = g.assets.insert_audio(key, handle);
            });
        }) as Box<dyn FnMut()>);
        win.set_timeout_with_callback_and_timeout_and_arguments_0(
            late.as_ref().unchecked_ref(),
            AUDIO_GRACE_MS,
        )?;
        late.forget();
    }

    Ok(())
}
