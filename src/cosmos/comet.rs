//! Comet: a rare streak along a cubic Bézier arc from the top-left region to
//! the bottom-right region, with a short fading trail.

use std::collections::VecDeque;
use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::{Tint, Viewport};
use crate::random::Rng;

/// Trail samples kept behind the head.
pub const TRAIL_LEN: usize = 10;
/// Share of the flight spent accelerating.
const EASE_SPLIT: f64 = 0.7;
const TRAIL_WIDTH: f64 = 2.0;
const HEAD_BLUR: f64 = 18.0;

pub type Point = (f64, f64);

pub fn cubic_bezier(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    (
        a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
        a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
    )
}

/// Cubic ease-in over the first 70% of the flight, quadratic ease-out over
/// the rest. Continuous at the split, exactly 1 at `t >= 1`.
pub fn ease(t: f64) -> f64 {
    if t >= 1.0 {
        return 1.0;
    }
    if t < EASE_SPLIT {
        (t / EASE_SPLIT).powi(3) * EASE_SPLIT
    } else {
        let rest = 1.0 - EASE_SPLIT;
        EASE_SPLIT + (1.0 - (1.0 - (t - EASE_SPLIT) / rest).powi(2)) * rest
    }
}

#[derive(Clone, Debug)]
pub struct Comet {
    start: Point,
    control1: Point,
    control2: Point,
    end: Point,
    /// Linear time progress in `[0, 1]`.
    progress: f64,
    /// Eased position along the curve.
    eased: f64,
    duration_ms: f64,
    pub size: f64,
    pub tint: Tint,
    trail: VecDeque<Point>,
}

impl Comet {
    pub fn new(viewport: &Viewport, rng: &mut dyn Rng) -> Self {
        let (w, h) = (viewport.width, viewport.height);
        let start = (rng.range(-40.0, 40.0), rng.range(-40.0, -40.0 + h * 0.25));
        let end = (rng.range(w - 60.0, w + 60.0), rng.range(h - 60.0, h + 60.0));

        // controls pull toward a random midpoint for a subtle, unique arc
        let mid = (w * rng.range(0.25, 0.5), h * rng.range(0.25, 0.5));
        let control1 = ((start.0 + mid.0) / 2.0, (start.1 + mid.1) / 2.0 - 60.0 * rng.next_f64());
        let control2 = ((end.0 + mid.0) / 2.0, (end.1 + mid.1) / 2.0 + 60.0 * rng.next_f64());

        let duration_ms = rng.range(2200.0, 3600.0);
        let size = rng.range(1.5, 3.0);
        let tint = if rng.chance(0.5) { Tint::Purple } else { Tint::Cyan };
        Self::from_path(start, control1, control2, end, duration_ms, size, tint)
    }

    pub fn from_path(
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
        duration_ms: f64,
        size: f64,
        tint: Tint,
    ) -> Self {
        Self {
            start,
            control1,
            control2,
            end,
            progress: 0.0,
            eased: 0.0,
            duration_ms: duration_ms.max(1.0),
            size,
            tint,
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn is_done(&self) -> bool {
        self.eased >= 1.0
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn position(&self) -> Point {
        cubic_bezier(self.start, self.control1, self.control2, self.end, self.eased)
    }

    pub fn trail(&self) -> impl ExactSizeIterator<Item = &Point> {
        self.trail.iter()
    }

    /// Advances along the curve and records the new head position.
    pub fn update(&mut self, dt: f64) {
        if self.is_done() {
            return;
        }
        self.progress = (self.progress + dt.max(0.0) / self.duration_ms).min(1.0);
        self.eased = ease(self.progress);
        let head = self.position();
        self.trail.push_back(head);
        while self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let n = self.trail.len();
        ctx.set_line_width(TRAIL_WIDTH);
        // newer segments are brighter
        for i in (1..n).rev() {
            let (p0, p1) = (self.trail[i - 1], self.trail[i]);
            let alpha = i as f64 / n as f64 * 0.9;
            ctx.set_stroke_style_str(&self.tint.rgba(alpha));
            ctx.begin_path();
            ctx.move_to(p0.0, p0.1);
            ctx.line_to(p1.0, p1.1);
            ctx.stroke();
        }

        let (x, y) = self.position();
        let color = self.tint.solid();
        ctx.save();
        ctx.set_shadow_blur(HEAD_BLUR);
        ctx.set_shadow_color(&color);
        ctx.set_fill_style_str(&color);
        ctx.begin_path();
        let drawn = ctx.arc(x, y, self.size, 0.0, TAU);
        if drawn.is_ok() {
            ctx.fill();
        }
        ctx.restore();
        drawn
    }
}
