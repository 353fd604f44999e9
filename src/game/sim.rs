//! Per-frame simulation: entity records, the mode state machine and the
//! update step. Everything here is plain data and arithmetic so the host-side
//! test suite can drive whole rounds without a browser. The web layer feeds
//! in sprite dimensions via [`SpriteMetrics`] and drains queued [`SoundCue`]s
//! after each step.

// --- Playfield constants -----------------------------------------------------

pub const CANVAS_W: f64 = 900.0;
pub const CANVAS_H: f64 = 600.0;
pub const GROUND_Y: f64 = 500.0;
pub const GRAVITY: f64 = 0.6;
pub const JUMP_STRENGTH: f64 = -15.0;

pub const DOLPHIN_X: f64 = 100.0;
pub const ICE_Y: f64 = 450.0;
pub const CLOUD_TARGET: usize = 12;
/// Scrolling entities are recycled once fully past this x.
pub const OFFSCREEN_X: f64 = -200.0;

pub const LANDING_HOLD_FRAMES: u8 = 8;
pub const SHAKE_LANDING: u32 = 8;
pub const SHAKE_SHIELD_HIT: u32 = 18;
pub const SHAKE_GAME_OVER: u32 = 24;

pub const POWERUP_CHANCE: f64 = 0.18;
pub const SHIELD_PUSHBACK: f64 = 180.0;

// --- RNG ---------------------------------------------------------------------

/// Small xorshift64* stream for gameplay randomness. Seeded from `getrandom`
/// at startup; tests pass a fixed seed for reproducible rounds.
#[derive(Clone, Debug)]
pub struct Rng(u64);

impl Rng {
    pub fn seeded(seed: u64) -> Self {
        // Zero is a fixed point of xorshift; nudge it off.
        Self(seed | 1)
    }

    pub fn from_entropy() -> Self {
        let mut buf = [0u8; 8];
        let _ = getrandom::getrandom(&mut buf);
        Self::seeded(u64::from_le_bytes(buf))
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform draw in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform draw in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 { 0 } else { (self.next_u64() % len as u64) as usize }
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

// --- Geometry ----------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.x > self.x + self.w
            || other.x + other.w < self.x
            || other.y > self.y + self.h
            || other.y + other.h < self.y)
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// Clickable UI button (cover / game-over screens). Geometry lives here so the
/// input router and the renderer hit-test the same rectangles.
#[derive(Clone, Copy, Debug)]
pub struct Button {
    pub rect: Rect,
    pub label: &'static str,
}

const BTN_W: f64 = 220.0;
const BTN_H: f64 = 70.0;

pub const START_BUTTON: Button = Button {
    rect: Rect { x: (CANVAS_W - BTN_W) / 2.0, y: 480.0, w: BTN_W, h: BTN_H },
    label: "START",
};

pub const RESTART_BUTTON: Button = Button {
    rect: Rect { x: (CANVAS_W - BTN_W) / 2.0, y: 360.0, w: BTN_W, h: BTN_H },
    label: "RESTART",
};

// --- Mode state machine ------------------------------------------------------

/// Game mode. Transitions go through [`SimState::set_mode`], which rejects
/// anything outside Loading→Cover→Play→Over→Play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Loading,
    Cover,
    Play,
    Over,
}

impl Mode {
    pub fn allows(self, next: Mode) -> bool {
        matches!(
            (self, next),
            (Mode::Loading, Mode::Cover)
                | (Mode::Cover, Mode::Play)
                | (Mode::Play, Mode::Over)
                | (Mode::Over, Mode::Play)
        )
    }
}

// --- Sound cues --------------------------------------------------------------

/// Sounds the step wants played. The audio player resolves each cue to a
/// loaded handle (or silently skips it when the asset is missing).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Music,
    Jump,
    Splash,
    GameOver,
    Shield,
    Hit,
}

impl SoundCue {
    pub fn key(self) -> &'static str {
        match self {
            SoundCue::Music => "bgmusic",
            SoundCue::Jump => "jump",
            SoundCue::Splash => "splash",
            SoundCue::GameOver => "gameover",
            SoundCue::Shield => "shield",
            SoundCue::Hit => "hit",
        }
    }

    pub fn looped(self) -> bool {
        matches!(self, SoundCue::Music)
    }

    pub fn volume(self) -> f64 {
        match self {
            SoundCue::Music => 0.35,
            SoundCue::Splash | SoundCue::Hit => 0.8,
            _ => 0.9,
        }
    }
}

// --- Sprite metrics ----------------------------------------------------------

/// Pixel sizes of the sprites the simulation consults for scoring and
/// hitboxes. The web layer fills this from loaded images once the asset store
/// completes; `Default` provides stable sizes for host-side tests.
#[derive(Clone, Debug)]
pub struct SpriteMetrics {
    /// First swim-cycle frame, used as the grounded body box.
    pub swim: (f64, f64),
    /// Jump-apex frame, used as the airborne body box.
    pub jump_apex: (f64, f64),
    pub ice: [(f64, f64); 6],
    pub cloud: [(f64, f64); 6],
    pub shield_available: bool,
}

impl Default for SpriteMetrics {
    fn default() -> Self {
        Self {
            swim: (140.0, 70.0),
            jump_apex: (140.0, 90.0),
            ice: [(120.0, 80.0); 6],
            cloud: [(180.0, 100.0); 6],
            shield_available: true,
        }
    }
}

// --- Entities ----------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Dolphin {
    pub x: f64,
    pub y: f64,
    pub vy: f64,
    pub is_jumping: bool,
    pub landing_hold: u8,
}

impl Dolphin {
    fn grounded() -> Self {
        Self { x: DOLPHIN_X, y: GROUND_Y, vy: 0.0, is_jumping: false, landing_hold: 0 }
    }
}

#[derive(Clone, Debug)]
pub struct IceObstacle {
    pub x: f64,
    pub y: f64,
    pub active: bool,
    pub passed: bool,
    pub sprite: usize,
}

#[derive(Clone, Debug)]
pub struct Powerup {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub active: bool,
    pub shield_on: bool,
}

#[derive(Clone, Debug)]
pub struct Cloud {
    pub sprite: usize,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub speed: f64,
}

// --- Simulation state --------------------------------------------------------

pub struct SimState {
    pub mode: Mode,
    pub score: u32,
    pub best: u32,
    pub frames: u64,
    pub shake: u32,
    pub audio_unlocked: bool,
    pub dolphin: Dolphin,
    pub ice: IceObstacle,
    pub powerup: Powerup,
    pub clouds: Vec<Cloud>,
    pub rng: Rng,
    pub pending_sounds: Vec<SoundCue>,
    /// Set when `best` improves; the web layer persists and clears it.
    pub best_dirty: bool,
}

impl SimState {
    pub fn new(best: u32, rng: Rng) -> Self {
        Self {
            mode: Mode::Loading,
            score: 0,
            best,
            frames: 0,
            shake: 0,
            audio_unlocked: false,
            dolphin: Dolphin::grounded(),
            ice: IceObstacle { x: 1100.0, y: ICE_Y, active: false, passed: false, sprite: 0 },
            powerup: Powerup { x: 0.0, y: 0.0, speed: 0.0, active: false, shield_on: false },
            clouds: Vec::new(),
            rng,
            pending_sounds: Vec::new(),
            best_dirty: false,
        }
    }

    /// Attempt a mode transition; undefined edges are rejected.
    pub fn set_mode(&mut self, next: Mode) -> bool {
        if self.mode.allows(next) {
            self.mode = next;
            true
        } else {
            false
        }
    }

    /// Difficulty curve: step function of score, capped.
    pub fn obstacle_speed(&self) -> f64 {
        (10 + self.score / 4).min(18) as f64
    }

    /// (Re)start a round. Valid from Cover and Over; the mode transition is
    /// the only place the score resets.
    pub fn reset_round(&mut self, metrics: &SpriteMetrics) {
        if !self.set_mode(Mode::Play) {
            return;
        }
        self.score = 0;
        self.shake = 0;

        self.dolphin = Dolphin::grounded();

        self.ice.x = 1100.0;
        self.ice.y = ICE_Y;
        self.ice.active = true;
        self.ice.passed = false;
        self.ice.sprite = self.rng.index(metrics.ice.len());

        self.powerup.active = false;
        self.powerup.shield_on = false;
        self.powerup.x = CANVAS_W + 600.0;
        self.powerup.y = 390.0;

        self.clouds.clear();
        for _ in 0..CLOUD_TARGET {
            self.spawn_cloud(metrics, false);
        }

        self.pending_sounds.push(SoundCue::Music);
    }

    fn spawn_cloud(&mut self, metrics: &SpriteMetrics, off_screen: bool) {
        let sprite = self.rng.index(metrics.cloud.len());
        let (base_w, base_h) = metrics.cloud[sprite];
        let scale = self.rng.range(0.45, 1.0);
        let x = if off_screen {
            CANVAS_W + self.rng.range(0.0, 700.0)
        } else {
            self.rng.range(0.0, CANVAS_W + 700.0)
        };
        self.clouds.push(Cloud {
            sprite,
            x,
            y: self.rng.range(10.0, 210.0),
            w: base_w * scale,
            h: base_h * scale,
            speed: self.rng.range(0.8, 2.2),
        });
    }

    /// Start a jump. Only effective mid-round while grounded; airborne calls
    /// are no-ops so there is no double jump.
    pub fn trigger_jump(&mut self) {
        if self.mode != Mode::Play {
            return;
        }
        if !self.dolphin.is_jumping {
            self.dolphin.is_jumping = true;
            self.dolphin.vy = JUMP_STRENGTH;
            self.dolphin.landing_hold = 0;
            self.pending_sounds.push(SoundCue::Jump);
        }
    }

    /// Body box for powerup pickup (looser than the fatal hitbox).
    fn pickup_box(&self, metrics: &SpriteMetrics) -> Rect {
        let (w, h) = if self.dolphin.is_jumping { metrics.jump_apex } else { metrics.swim };
        Rect::new(self.dolphin.x + 10.0, self.dolphin.y + 5.0, w - 20.0, h - 10.0)
    }

    /// Body box for ice collision.
    fn body_box(&self, metrics: &SpriteMetrics) -> Rect {
        let (w, h) = if self.dolphin.is_jumping { metrics.jump_apex } else { metrics.swim };
        Rect::new(self.dolphin.x + 20.0, self.dolphin.y + 10.0, w - 40.0, h - 20.0)
    }

    /// Advance one frame. Gameplay entities only move in Play mode; the frame
    /// counter and the shake decay run in every mode so the jitter settles
    /// into the game-over screen.
    pub fn step(&mut self, metrics: &SpriteMetrics) {
        self.frames += 1;
        if self.shake > 0 {
            self.shake -= 1;
        }
        if self.mode != Mode::Play {
            return;
        }

        let ice_speed = self.obstacle_speed();

        // Clouds drift left; recycle the ones fully off-screen.
        for c in &mut self.clouds {
            c.x -= c.speed;
        }
        self.clouds.retain(|c| c.x > -c.w - 100.0);
        while self.clouds.len() < CLOUD_TARGET {
            self.spawn_cloud(metrics, true);
        }

        // Ice obstacle scroll + relocation.
        self.ice.x -= ice_speed;
        if self.ice.x <= OFFSCREEN_X {
            // Score-scaled respawn window, floor-clamped. The bounds are
            // tunable constants, not exact contracts.
            let hi = (1400.0 - self.score as f64 * 10.0).max(950.0);
            let lo = (1100.0 - self.score as f64 * 10.0).max(800.0);
            self.ice.x = self.rng.range(lo, hi);
            self.ice.passed = false;
            self.ice.sprite = self.rng.index(metrics.ice.len());

            // Each relocation may also launch the shield powerup.
            if !self.powerup.active && metrics.shield_available && self.rng.chance(POWERUP_CHANCE)
            {
                self.powerup.active = true;
                self.powerup.x = CANVAS_W + 200.0 + self.rng.range(0.0, 700.0);
                self.powerup.y = self.rng.range(350.0, 490.0);
                self.powerup.speed = self.rng.range(1.6, 2.6);
            }
        }

        // Score the pass once, the frame the ice clears the dolphin's x.
        let (ice_w, ice_h) = metrics.ice[self.ice.sprite];
        if !self.ice.passed && self.ice.x + ice_w < self.dolphin.x {
            self.score += 1;
            self.ice.passed = true;
            // Track the best live so it never trails the current score.
            if self.score > self.best {
                self.best = self.score;
                self.best_dirty = true;
            }
        }

        // Powerup drift, pickup and despawn.
        if self.powerup.active {
            self.powerup.x -= self.powerup.speed;

            let p_box = Rect::new(self.powerup.x + 10.0, self.powerup.y + 10.0, 40.0, 40.0);
            if p_box.intersects(&self.pickup_box(metrics)) {
                self.powerup.shield_on = true;
                self.powerup.active = false;
                self.pending_sounds.push(SoundCue::Shield);
            }
            if self.powerup.x < OFFSCREEN_X {
                self.powerup.active = false;
            }
        }

        // Dolphin kinematics.
        if self.dolphin.is_jumping {
            self.dolphin.vy += GRAVITY;
            self.dolphin.y += self.dolphin.vy;

            if self.dolphin.y >= GROUND_Y {
                self.dolphin.y = GROUND_Y;
                self.dolphin.vy = 0.0;

                if self.dolphin.landing_hold == 0 {
                    self.pending_sounds.push(SoundCue::Splash);
                    self.shake = SHAKE_LANDING;
                }

                // Hold the ground pose briefly before re-arming the jump.
                if self.dolphin.landing_hold < LANDING_HOLD_FRAMES {
                    self.dolphin.landing_hold += 1;
                } else {
                    self.dolphin.landing_hold = 0;
                    self.dolphin.is_jumping = false;
                }
            }
        } else {
            self.dolphin.y = GROUND_Y;
        }

        // Fatal (or shield-absorbed) ice collision.
        let ice_box = Rect::new(self.ice.x + 10.0, self.ice.y + 10.0, ice_w - 20.0, ice_h - 10.0);
        if self.body_box(metrics).intersects(&ice_box) {
            if self.powerup.shield_on {
                self.powerup.shield_on = false;
                self.shake = SHAKE_SHIELD_HIT;
                self.pending_sounds.push(SoundCue::Hit);
                self.ice.x += SHIELD_PUSHBACK;
            } else {
                self.game_over();
            }
        }
    }

    pub fn game_over(&mut self) {
        if !self.set_mode(Mode::Over) {
            return;
        }
        self.shake = SHAKE_GAME_OVER;
        if self.score > self.best {
            self.best = self.score;
            self.best_dirty = true;
        }
        self.pending_sounds.push(SoundCue::GameOver);
    }

    /// Drain queued sound cues for the audio player.
    pub fn take_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.pending_sounds)
    }
}

// --- Sprite selection helpers ------------------------------------------------

/// Index into the 6-frame jump sequence for an airborne dolphin, keyed on the
/// velocity sign and height above the ground line.
pub fn jump_frame(vy: f64, height_above_ground: f64) -> usize {
    if vy < 0.0 && height_above_ground <= 2.0 {
        0
    } else if vy < 0.0 {
        if height_above_ground < 60.0 { 1 } else { 2 }
    } else if height_above_ground <= 2.0 {
        5
    } else if height_above_ground > 60.0 {
        3
    } else {
        4
    }
}

/// Shared 4-frame scroll loop (water band and swim cycle), 10 frames per image.
pub fn scroll_frame(frames: u64) -> usize {
    ((frames % 40) / 10) as usize
}
