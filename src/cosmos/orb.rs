//! Twinkling orb: a small glowing dot on a straight heading that wraps
//! around the viewport edges.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::{Tint, Viewport};
use crate::random::Rng;

/// How far past an edge an orb may travel before it reappears opposite.
pub const WRAP_MARGIN: f64 = 5.0;
const TWINKLE_RATE: f64 = 0.002;
const GLOW_BLUR: f64 = 10.0;

/// Toroidal wrap on one axis.
pub fn wrap_axis(v: f64, extent: f64) -> f64 {
    if v < -WRAP_MARGIN {
        extent + WRAP_MARGIN
    } else if v > extent + WRAP_MARGIN {
        -WRAP_MARGIN
    } else {
        v
    }
}

#[derive(Clone, Debug)]
pub struct Orb {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub tint: Tint,
    speed: f64,
    heading: f64,
    base_alpha: f64,
    twinkle: f64,
    alpha: f64,
}

impl Orb {
    pub fn new(viewport: &Viewport, rng: &mut dyn Rng) -> Self {
        let x = rng.next_f64() * viewport.width;
        let y = rng.next_f64() * viewport.height;
        let radius = rng.range(1.2, 3.4);
        let speed = rng.range(0.08, 0.26);
        let heading = rng.next_f64() * TAU;
        let tint = if rng.chance(0.6) { Tint::Purple } else { Tint::Cyan };
        let base_alpha = rng.range(0.65, 0.9);
        let twinkle = rng.next_f64() * 1000.0;
        Self { x, y, radius, tint, speed, heading, base_alpha, twinkle, alpha: base_alpha }
    }

    /// Orb with explicit motion and a steady base alpha of 1.
    pub fn with_motion(x: f64, y: f64, speed: f64, heading: f64) -> Self {
        Self {
            x,
            y,
            radius: 2.0,
            tint: Tint::Cyan,
            speed,
            heading,
            base_alpha: 1.0,
            twinkle: 0.0,
            alpha: 1.0,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Twinkle follows elapsed time; travel is a fixed step per frame.
    pub fn update(&mut self, dt: f64, viewport: &Viewport) {
        self.twinkle += dt * TWINKLE_RATE;
        self.alpha = self.base_alpha * (0.85 + self.twinkle.sin() * 0.15);

        self.x += self.heading.cos() * self.speed;
        self.y += self.heading.sin() * self.speed;
        self.x = wrap_axis(self.x, viewport.width);
        self.y = wrap_axis(self.y, viewport.height);
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        ctx.save();
        ctx.set_shadow_blur(GLOW_BLUR);
        ctx.set_shadow_color(&self.tint.solid());
        ctx.set_fill_style_str(&self.tint.rgba(self.alpha));
        ctx.begin_path();
        let drawn = ctx.arc(self.x, self.y, self.radius, 0.0, TAU);
        if drawn.is_ok() {
            ctx.fill();
        }
        ctx.restore();
        drawn
    }
}
