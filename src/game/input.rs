//! Input router: window-level pointer / touch / key listeners mapped onto
//! mode-dependent actions. The first interaction of any kind unlocks audio
//! playback (host autoplay policy).

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, window};

use super::sim::{CANVAS_H, CANVAS_W, Mode, RESTART_BUTTON, START_BUTTON};
use super::{Game, with_game};

/// Client coordinates → 900x600 canvas space, accounting for CSS scaling.
fn canvas_pos(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 { CANVAS_W / rect.width() } else { 1.0 };
    let sy = if rect.height() > 0.0 { CANVAS_H / rect.height() } else { 1.0 };
    ((client_x - rect.left()) * sx, (client_y - rect.top()) * sy)
}

fn press_at(game: &mut Game, pos: (f64, f64)) {
    game.sim.audio_unlocked = true;
    game.mouse = pos;
    match game.sim.mode {
        Mode::Cover if START_BUTTON.rect.contains(pos.0, pos.1) => restart(game),
        Mode::Over if RESTART_BUTTON.rect.contains(pos.0, pos.1) => restart(game),
        Mode::Play => game.sim.trigger_jump(),
        _ => {}
    }
}

fn restart(game: &mut Game) {
    // Metrics exist from the moment loading finished, which is also the
    // earliest a round can start.
    if let Some(metrics) = game.metrics.clone() {
        game.sim.reset_round(&metrics);
    }
}

pub fn wire(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;

    // Pointer move: hover position only.
    {
        let canvas = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let pos = canvas_pos(&canvas, evt.client_x() as f64, evt.client_y() as f64);
            with_game(|g| g.mouse = pos);
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let canvas = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            if let Some(touch) = evt.touches().get(0) {
                let pos = canvas_pos(&canvas, touch.client_x() as f64, touch.client_y() as f64);
                with_game(|g| g.mouse = pos);
            }
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Pointer down: start / restart / jump depending on mode.
    {
        let canvas = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let pos = canvas_pos(&canvas, evt.client_x() as f64, evt.client_y() as f64);
            with_game(|g| press_at(g, pos));
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let canvas = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            if let Some(touch) = evt.touches().get(0) {
                let pos = canvas_pos(&canvas, touch.client_x() as f64, touch.client_y() as f64);
                with_game(|g| press_at(g, pos));
            }
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyboard: Space jumps, R restarts from the game-over screen.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            with_game(|g| {
                g.sim.audio_unlocked = true;
                match evt.code().as_str() {
                    "Space" => g.sim.trigger_jump(),
                    "KeyR" => {
                        if g.sim.mode == Mode::Over {
                            restart(g);
                        }
                    }
                    _ => {}
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}
