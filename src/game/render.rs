//! Canvas renderer: paints the current frame from simulation state and the
//! asset store. Scene layers render inside a shake-scoped translate; HUD text
//! and buttons render outside it so the UI never jitters.

use web_sys::CanvasRenderingContext2d;

use super::assets::{
    AssetStore, IMG_BACKGROUND, IMG_COVER, IMG_SHIELD, SEQ_CLOUD, SEQ_ICE, SEQ_JUMP, SEQ_SWIM,
    SEQ_WATER,
};
use super::sim::{
    Button, CANVAS_H, CANVAS_W, GROUND_Y, Mode, RESTART_BUTTON, Rng, START_BUTTON, SimState,
    jump_frame, scroll_frame,
};

const SKY_FALLBACK: &str = "#050a1e";

pub fn draw(
    ctx: &CanvasRenderingContext2d,
    assets: &AssetStore,
    sim: &SimState,
    mouse: (f64, f64),
    jitter: &mut Rng,
) {
    ctx.clear_rect(0.0, 0.0, CANVAS_W, CANVAS_H);

    ctx.save();
    if sim.shake > 0 {
        // Fresh random offset every frame; stronger early in the shake.
        let amp = if sim.shake > 10 { 6.0 } else { 3.0 };
        let ox = jitter.range(-amp, amp);
        let oy = jitter.range(-amp, amp);
        ctx.translate(ox, oy).ok();
    }
    draw_scene(ctx, assets, sim);
    ctx.restore();

    draw_ui(ctx, assets, sim, mouse);
}

fn draw_scene(ctx: &CanvasRenderingContext2d, assets: &AssetStore, sim: &SimState) {
    let in_round = matches!(sim.mode, Mode::Play | Mode::Over);

    // Background, or a flat night sky when the image is missing.
    if let Some(bg) = assets.image(IMG_BACKGROUND) {
        ctx.draw_image_with_html_image_element(bg, 0.0, 0.0).ok();
    } else {
        ctx.set_fill_style_str(SKY_FALLBACK);
        ctx.fill_rect(0.0, 0.0, CANVAS_W, CANVAS_H);
    }

    if in_round {
        for c in &sim.clouds {
            if let Some(img) = assets.image(SEQ_CLOUD[c.sprite]) {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(img, c.x, c.y, c.w, c.h)
                    .ok();
            }
        }
    }

    // Water band cycles with the shared scroll clock.
    if let Some(img) = assets.image(SEQ_WATER[scroll_frame(sim.frames)]) {
        ctx.draw_image_with_html_image_element(img, 0.0, 400.0).ok();
    }

    if in_round {
        if sim.ice.active {
            if let Some(img) = assets.image(SEQ_ICE[sim.ice.sprite]) {
                ctx.draw_image_with_html_image_element(img, sim.ice.x, sim.ice.y).ok();
            }
        }

        if sim.mode == Mode::Play && sim.powerup.active {
            if let Some(img) = assets.image(IMG_SHIELD) {
                ctx.draw_image_with_html_image_element(img, sim.powerup.x, sim.powerup.y).ok();
            }
        }

        let name = if sim.mode == Mode::Play && sim.dolphin.is_jumping {
            SEQ_JUMP[jump_frame(sim.dolphin.vy, GROUND_Y - sim.dolphin.y)]
        } else {
            SEQ_SWIM[scroll_frame(sim.frames)]
        };
        if let Some(img) = assets.image(name) {
            ctx.draw_image_with_html_image_element(img, sim.dolphin.x, sim.dolphin.y).ok();
        }
    }
}

fn draw_ui(ctx: &CanvasRenderingContext2d, assets: &AssetStore, sim: &SimState, mouse: (f64, f64)) {
    match sim.mode {
        Mode::Loading => draw_loading(ctx, assets),
        Mode::Cover => {
            if let Some(img) = assets.image(IMG_COVER) {
                ctx.draw_image_with_html_image_element(img, 0.0, 0.0).ok();
            } else {
                ctx.set_fill_style_str(SKY_FALLBACK);
                ctx.fill_rect(0.0, 0.0, CANVAS_W, CANVAS_H);
            }
            text_centered(ctx, "Jump over ice, keep swimming.", 440.0, "bold 26px Arial", "gold");
            draw_button(ctx, &START_BUTTON, mouse);
            ctx.set_fill_style_str("white");
            ctx.set_font("bold 18px Arial");
            ctx.fill_text(&format!("Best: {}", sim.best), 20.0, 30.0).ok();
        }
        Mode::Play | Mode::Over => {
            ctx.set_fill_style_str("gold");
            ctx.set_font("bold 26px Arial");
            ctx.fill_text(&format!("Score: {}", sim.score), 20.0, 30.0).ok();
            ctx.set_fill_style_str("white");
            ctx.fill_text(&format!("Best: {}", sim.best), 20.0, 60.0).ok();

            if sim.mode == Mode::Play && sim.powerup.shield_on {
                ctx.set_fill_style_str("#78dcff");
                ctx.set_font("bold 18px Arial");
                ctx.fill_text("SHIELD", CANVAS_W - 90.0, 40.0).ok();
            }

            if sim.mode == Mode::Over {
                ctx.set_fill_style_str("rgba(0, 0, 0, 0.55)");
                ctx.fill_rect(0.0, 0.0, CANVAS_W, CANVAS_H);
                text_centered(ctx, "GAME OVER", 220.0, "bold 56px Arial", "gold");
                draw_button(ctx, &RESTART_BUTTON, mouse);
                text_centered(ctx, "Click RESTART or press R", 450.0, "bold 18px Arial", "white");
            }
        }
    }
}

fn draw_loading(ctx: &CanvasRenderingContext2d, assets: &AssetStore) {
    ctx.set_fill_style_str(SKY_FALLBACK);
    ctx.fill_rect(0.0, 0.0, CANVAS_W, CANVAS_H);

    let (loaded, total) = assets.progress();
    let frac = if total == 0 { 0.0 } else { loaded as f64 / total as f64 };

    let bar_w = 400.0;
    let bar_h = 20.0;
    let bx = (CANVAS_W - bar_w) / 2.0;
    let by = 300.0;

    ctx.set_stroke_style_str("white");
    ctx.set_line_width(2.0);
    ctx.stroke_rect(bx, by, bar_w, bar_h);
    ctx.set_fill_style_str("#1478dc");
    ctx.fill_rect(bx + 2.0, by + 2.0, (bar_w - 4.0) * frac, bar_h - 4.0);

    text_centered(
        ctx,
        &format!("Loading {loaded}/{total}"),
        by - 16.0,
        "bold 18px Arial",
        "white",
    );
}

fn draw_button(ctx: &CanvasRenderingContext2d, btn: &Button, mouse: (f64, f64)) {
    let hover = btn.rect.contains(mouse.0, mouse.1);

    ctx.set_fill_style_str(if hover { "#1eaaff" } else { "#1478dc" });
    rounded_rect_path(ctx, btn, 14.0);
    ctx.fill();
    ctx.set_line_width(3.0);
    ctx.set_stroke_style_str("white");
    ctx.stroke();

    ctx.set_fill_style_str("white");
    ctx.set_font("bold 26px Arial");
    let tw = ctx.measure_text(btn.label).map(|m| m.width()).unwrap_or(0.0);
    ctx.fill_text(btn.label, btn.rect.x + (btn.rect.w - tw) / 2.0, btn.rect.y + 45.0).ok();
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, btn: &Button, r: f64) {
    let (x, y, w, h) = (btn.rect.x, btn.rect.y, btn.rect.w, btn.rect.h);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.arc_to(x + w, y, x + w, y + h, r).ok();
    ctx.arc_to(x + w, y + h, x, y + h, r).ok();
    ctx.arc_to(x, y + h, x, y, r).ok();
    ctx.arc_to(x, y, x + w, y, r).ok();
    ctx.close_path();
}

fn text_centered(ctx: &CanvasRenderingContext2d, text: &str, y: f64, font: &str, color: &str) {
    ctx.set_fill_style_str(color);
    ctx.set_font(font);
    let w = ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0);
    ctx.fill_text(text, (CANVAS_W - w) / 2.0, y).ok();
}
