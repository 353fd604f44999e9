// Native integration tests for the simulation step. These avoid browser APIs
// entirely: rounds are driven with fixed sprite metrics and a seeded RNG so
// whole flights and collisions are reproducible under `cargo test`.

use dolphin_jumper::game::sim::{
    CANVAS_W, GROUND_Y, JUMP_STRENGTH, Mode, RESTART_BUTTON, Rect, Rng, START_BUTTON, SimState,
    SoundCue, SpriteMetrics, jump_frame, scroll_frame,
};

fn play_state() -> (SimState, SpriteMetrics) {
    let metrics = SpriteMetrics::default();
    let mut sim = SimState::new(0, Rng::seeded(42));
    assert!(sim.set_mode(Mode::Cover));
    sim.reset_round(&metrics);
    sim.take_sounds();
    (sim, metrics)
}

/// Park the obstacle where it cannot collide or score for a while.
fn park_ice(sim: &mut SimState) {
    sim.ice.x = 100_000.0;
    sim.ice.y = 100_000.0;
}

// --- Mode machine ------------------------------------------------------------

#[test]
fn mode_transitions_follow_the_table() {
    assert!(Mode::Loading.allows(Mode::Cover));
    assert!(Mode::Cover.allows(Mode::Play));
    assert!(Mode::Play.allows(Mode::Over));
    assert!(Mode::Over.allows(Mode::Play));

    assert!(!Mode::Loading.allows(Mode::Play));
    assert!(!Mode::Cover.allows(Mode::Over));
    assert!(!Mode::Play.allows(Mode::Cover));
    assert!(!Mode::Over.allows(Mode::Cover));
    assert!(!Mode::Play.allows(Mode::Play));
}

#[test]
fn set_mode_rejects_undefined_transitions() {
    let mut sim = SimState::new(0, Rng::seeded(1));
    assert!(!sim.set_mode(Mode::Play));
    assert_eq!(sim.mode, Mode::Loading);
    assert!(!sim.set_mode(Mode::Over));
    assert!(sim.set_mode(Mode::Cover));
    assert_eq!(sim.mode, Mode::Cover);
}

#[test]
fn reset_round_is_a_noop_before_loading_finishes() {
    let metrics = SpriteMetrics::default();
    let mut sim = SimState::new(0, Rng::seeded(1));
    sim.reset_round(&metrics);
    assert_eq!(sim.mode, Mode::Loading);
    assert!(sim.clouds.is_empty());
    assert!(sim.take_sounds().is_empty());
}

// --- Difficulty curve --------------------------------------------------------

#[test]
fn obstacle_speed_is_a_capped_step_function_of_score() {
    let (mut sim, _) = play_state();
    for (score, expected) in [(0, 10.0), (3, 10.0), (4, 11.0), (16, 14.0), (40, 18.0), (100, 18.0)]
    {
        sim.score = score;
        assert_eq!(sim.obstacle_speed(), expected, "score {score}");
    }

    let mut prev = 0.0;
    for score in 0..200 {
        sim.score = score;
        let v = sim.obstacle_speed();
        assert!(v >= prev, "speed dipped at score {score}");
        assert!(v <= 18.0);
        prev = v;
    }
}

// --- Jumping -----------------------------------------------------------------

#[test]
fn jump_trigger_is_reentrant_safe_while_airborne() {
    let (mut sim, metrics) = play_state();
    park_ice(&mut sim);

    sim.trigger_jump();
    assert!(sim.dolphin.is_jumping);
    assert_eq!(sim.dolphin.vy, JUMP_STRENGTH);
    assert_eq!(sim.take_sounds(), vec![SoundCue::Jump]);

    for _ in 0..3 {
        sim.step(&metrics);
    }
    let (vy, y, hold) = (sim.dolphin.vy, sim.dolphin.y, sim.dolphin.landing_hold);

    sim.trigger_jump();
    assert_eq!(sim.dolphin.vy, vy);
    assert_eq!(sim.dolphin.y, y);
    assert_eq!(sim.dolphin.landing_hold, hold);
    assert!(sim.take_sounds().is_empty());
}

#[test]
fn jump_trigger_outside_play_is_a_noop() {
    let mut sim = SimState::new(0, Rng::seeded(9));
    sim.trigger_jump();
    assert!(!sim.dolphin.is_jumping);
    sim.set_mode(Mode::Cover);
    sim.trigger_jump();
    assert!(!sim.dolphin.is_jumping);
    assert!(sim.take_sounds().is_empty());
}

#[test]
fn jump_arc_reaches_apex_at_frame_25_and_holds_landing_for_8_frames() {
    let (mut sim, metrics) = play_state();
    park_ice(&mut sim);

    sim.trigger_jump();
    sim.take_sounds();

    // Apex: vy integrates +0.6/frame from -15, so it crosses zero at frame 25.
    for _ in 0..25 {
        sim.step(&metrics);
    }
    assert!(sim.dolphin.vy.abs() < 1e-9, "vy at apex was {}", sim.dolphin.vy);
    assert!(sim.dolphin.y < GROUND_Y);

    // Fly until the first ground contact.
    let mut flight = 25;
    while sim.dolphin.y < GROUND_Y {
        sim.step(&metrics);
        flight += 1;
        assert!(flight < 200, "never landed");
    }
    assert_eq!(sim.dolphin.y, GROUND_Y);
    assert_eq!(sim.dolphin.vy, 0.0);
    assert_eq!(sim.shake, 8, "landing starts an 8-frame shake");
    assert_eq!(sim.take_sounds(), vec![SoundCue::Splash]);

    // Ground pose holds for 8 further frames before the jump flag clears.
    for i in 0..7 {
        sim.step(&metrics);
        assert!(sim.dolphin.is_jumping, "cleared early at hold frame {i}");
    }
    sim.step(&metrics);
    assert!(!sim.dolphin.is_jumping);
    assert_eq!(sim.dolphin.landing_hold, 0);
    // No second splash while grounded through the hold.
    assert!(sim.take_sounds().is_empty());
}

// --- Scoring -----------------------------------------------------------------

#[test]
fn score_increments_exactly_once_per_obstacle_pass() {
    let (mut sim, metrics) = play_state();
    // Keep the obstacle clear of the hitbox; scoring only looks at x.
    sim.ice.y = 100_000.0;
    sim.ice.x = 150.0;
    sim.ice.passed = false;

    let mut steps = 0;
    while sim.score == 0 {
        sim.step(&metrics);
        steps += 1;
        assert!(steps < 100, "pass never scored");
    }
    assert_eq!(sim.score, 1);
    assert!(sim.ice.passed);

    // No further increment from the same cycle while it drifts off-screen.
    while sim.ice.x <= -100.0 || sim.ice.passed {
        sim.step(&metrics);
        sim.ice.y = 100_000.0;
        steps += 1;
        if steps > 500 {
            break;
        }
        if sim.ice.x > 0.0 && !sim.ice.passed {
            break; // relocated to a fresh cycle
        }
        assert_eq!(sim.score, 1);
    }
    assert_eq!(sim.score, 1);
    assert!(sim.ice.x >= 800.0, "respawn window is floor-clamped at 800");
    assert!(sim.ice.x <= 1400.0);
}

#[test]
fn score_stays_monotonic_and_best_never_trails_it() {
    let (mut sim, metrics) = play_state();
    sim.ice.y = 100_000.0;

    let mut last_score = 0;
    for _ in 0..5_000 {
        sim.step(&metrics);
        sim.ice.y = 100_000.0;
        assert!(sim.score >= last_score);
        assert!(sim.best >= sim.score);
        last_score = sim.score;
    }
    assert!(sim.score > 0, "seeded round should have scored by now");
}

// --- Clouds ------------------------------------------------------------------

#[test]
fn cloud_cover_is_maintained_at_exactly_twelve() {
    let (mut sim, metrics) = play_state();
    park_ice(&mut sim);
    assert_eq!(sim.clouds.len(), 12);

    for _ in 0..2_000 {
        sim.step(&metrics);
        park_ice(&mut sim);
        assert_eq!(sim.clouds.len(), 12);
        for c in &sim.clouds {
            assert!(c.x > -c.w - 100.0, "off-screen cloud kept");
            assert!((10.0..210.0).contains(&c.y));
            assert!((0.8..2.2).contains(&c.speed));
        }
    }
}

// --- Powerup / shield --------------------------------------------------------

#[test]
fn powerup_pickup_engages_shield() {
    let (mut sim, metrics) = play_state();
    park_ice(&mut sim);

    sim.powerup.active = true;
    sim.powerup.shield_on = false;
    sim.powerup.x = 122.0;
    sim.powerup.y = 500.0;
    sim.powerup.speed = 2.0;

    sim.take_sounds();
    sim.step(&metrics);

    assert!(sim.powerup.shield_on);
    assert!(!sim.powerup.active);
    assert_eq!(sim.take_sounds(), vec![SoundCue::Shield]);
}

#[test]
fn powerup_despawns_past_the_left_edge() {
    let (mut sim, metrics) = play_state();
    park_ice(&mut sim);

    sim.powerup.active = true;
    sim.powerup.x = -198.5;
    sim.powerup.y = 0.0;
    sim.powerup.speed = 2.0;

    sim.step(&metrics);
    assert!(!sim.powerup.active);
    assert!(!sim.powerup.shield_on);
}

#[test]
fn shield_absorbs_exactly_one_collision() {
    let (mut sim, metrics) = play_state();
    sim.powerup.shield_on = true;
    sim.ice.x = 150.0;
    sim.take_sounds();

    sim.step(&metrics);

    // Obstacle advanced to 140, collided, got pushed back 180.
    assert!(!sim.powerup.shield_on, "shield consumed");
    assert_eq!(sim.ice.x, 320.0);
    assert_eq!(sim.mode, Mode::Play);
    assert_eq!(sim.shake, 18);
    assert!(sim.take_sounds().contains(&SoundCue::Hit));

    // Second hit without the shield is fatal.
    sim.ice.x = 150.0;
    sim.step(&metrics);
    assert_eq!(sim.mode, Mode::Over);
    assert_eq!(sim.shake, 24);
    assert!(sim.take_sounds().contains(&SoundCue::GameOver));
}

// --- Game over / best score --------------------------------------------------

#[test]
fn game_over_raises_and_flags_the_best_score() {
    let (mut sim, metrics) = play_state();
    sim.score = 7;
    sim.take_sounds();

    sim.game_over();
    assert_eq!(sim.mode, Mode::Over);
    assert_eq!(sim.best, 7);
    assert!(sim.best_dirty);
    assert_eq!(sim.take_sounds(), vec![SoundCue::GameOver]);

    // Next round: score resets, best survives and does not regress.
    sim.best_dirty = false;
    sim.reset_round(&metrics);
    assert_eq!(sim.mode, Mode::Play);
    assert_eq!(sim.score, 0);
    assert_eq!(sim.best, 7);
    sim.score = 3;
    sim.game_over();
    assert_eq!(sim.best, 7);
    assert!(!sim.best_dirty);
}

#[test]
fn game_over_from_a_non_play_mode_is_rejected() {
    let mut sim = SimState::new(5, Rng::seeded(3));
    sim.game_over();
    assert_eq!(sim.mode, Mode::Loading);
    assert_eq!(sim.shake, 0);
    assert!(sim.take_sounds().is_empty());
}

#[test]
fn shake_decays_every_mode_including_over() {
    let (mut sim, metrics) = play_state();
    sim.game_over();
    assert_eq!(sim.shake, 24);
    for expected in (0..24).rev() {
        sim.step(&metrics);
        assert_eq!(sim.shake, expected);
    }
    sim.step(&metrics);
    assert_eq!(sim.shake, 0);
}

// --- Round reset -------------------------------------------------------------

#[test]
fn reset_round_rebuilds_entities_and_cues_music() {
    let (mut sim, metrics) = play_state();
    sim.score = 4;
    sim.game_over();
    sim.take_sounds();

    sim.reset_round(&metrics);
    assert_eq!(sim.mode, Mode::Play);
    assert_eq!(sim.score, 0);
    assert_eq!(sim.shake, 0);
    assert_eq!(sim.dolphin.y, GROUND_Y);
    assert!(!sim.dolphin.is_jumping);
    assert_eq!(sim.ice.x, 1100.0);
    assert!(sim.ice.active);
    assert!(!sim.ice.passed);
    assert!(sim.ice.sprite < 6);
    assert!(!sim.powerup.active);
    assert!(!sim.powerup.shield_on);
    assert_eq!(sim.clouds.len(), 12);
    assert_eq!(sim.take_sounds(), vec![SoundCue::Music]);
}

// --- Sprite selection --------------------------------------------------------

#[test]
fn jump_frame_decision_table() {
    // Ascending: takeoff, low, high.
    assert_eq!(jump_frame(-15.0, 0.0), 0);
    assert_eq!(jump_frame(-10.0, 30.0), 1);
    assert_eq!(jump_frame(-10.0, 100.0), 2);
    // Descending: high, low, touchdown.
    assert_eq!(jump_frame(10.0, 100.0), 3);
    assert_eq!(jump_frame(10.0, 30.0), 4);
    assert_eq!(jump_frame(10.0, 1.0), 5);
    assert_eq!(jump_frame(0.0, 0.0), 5);
}

#[test]
fn scroll_frame_cycles_four_images_every_forty_frames() {
    assert_eq!(scroll_frame(0), 0);
    assert_eq!(scroll_frame(9), 0);
    assert_eq!(scroll_frame(10), 1);
    assert_eq!(scroll_frame(39), 3);
    assert_eq!(scroll_frame(40), 0);
}

// --- Geometry / RNG ----------------------------------------------------------

#[test]
fn rect_intersection_and_containment() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    assert!(a.intersects(&Rect::new(10.0, 10.0, 5.0, 5.0)), "touching counts");
    assert!(!a.intersects(&Rect::new(11.0, 0.0, 5.0, 5.0)));
    assert!(!a.intersects(&Rect::new(0.0, 11.0, 5.0, 5.0)));
    assert!(a.contains(0.0, 0.0));
    assert!(a.contains(10.0, 10.0));
    assert!(!a.contains(10.1, 5.0));
}

#[test]
fn buttons_are_centered_on_the_canvas() {
    for btn in [START_BUTTON, RESTART_BUTTON] {
        assert_eq!(btn.rect.x, (CANVAS_W - btn.rect.w) / 2.0);
        assert!(btn.rect.contains(CANVAS_W / 2.0, btn.rect.y + 1.0));
        assert!(!btn.rect.contains(0.0, btn.rect.y + 1.0));
    }
    assert_eq!(START_BUTTON.label, "START");
    assert_eq!(RESTART_BUTTON.label, "RESTART");
}

#[test]
fn rng_is_deterministic_per_seed_and_stays_in_bounds() {
    let mut a = Rng::seeded(7);
    let mut b = Rng::seeded(7);
    for _ in 0..100 {
        assert_eq!(a.next_f64(), b.next_f64());
    }

    let mut r = Rng::seeded(1234);
    for _ in 0..10_000 {
        let v = r.next_f64();
        assert!((0.0..1.0).contains(&v));
        let w = r.range(-3.0, 5.0);
        assert!((-3.0..5.0).contains(&w));
        assert!(r.index(6) < 6);
    }
    assert_eq!(r.index(0), 0);
    assert!(!r.chance(0.0));
    assert!(r.chance(1.0));
}
