//! Nebula blob: a soft radial glow that wanders slowly forever.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::Tint;
use crate::random::Rng;

/// Centre opacity; fades to transparent at the rim.
pub const BLOB_OPACITY: f64 = 0.12;
const DRIFT_PX: f64 = 0.15;
const BASE_SPEED: f64 = 0.15;

#[derive(Clone, Debug)]
pub struct Blob {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub tint: Tint,
    phase: f64,
    speed: f64,
}

impl Blob {
    pub fn new(x: f64, y: f64, radius: f64, tint: Tint, rng: &mut dyn Rng) -> Self {
        Self {
            x,
            y,
            radius,
            tint,
            phase: rng.next_f64() * 1000.0,
            speed: BASE_SPEED * rng.range(0.7, 1.3),
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.phase += dt * self.speed;
        self.x += (self.phase * 0.0004).sin() * DRIFT_PX;
        self.y += (self.phase * 0.00035).cos() * DRIFT_PX;
    }

    /// Drawn with the "screen" blend so overlapping blobs brighten.
    pub fn draw(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let grd = ctx.create_radial_gradient(self.x, self.y, 0.0, self.x, self.y, self.radius)?;
        grd.add_color_stop(0.0, &self.tint.rgba(BLOB_OPACITY))?;
        grd.add_color_stop(1.0, "rgba(0,0,0,0)")?;
        ctx.set_global_composite_operation("screen")?;
        ctx.set_fill_style_canvas_gradient(&grd);
        ctx.begin_path();
        ctx.arc(self.x, self.y, self.radius, 0.0, TAU)?;
        ctx.fill();
        ctx.set_global_composite_operation("source-over")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::Sequence;

    #[test]
    fn drift_is_bounded_per_frame() {
        let mut rng = Sequence::constant(0.5);
        let mut b = Blob::new(100.0, 100.0, 40.0, Tint::Gold, &mut rng);
        for _ in 0..1000 {
            let (x, y) = (b.x, b.y);
            b.update(16.0);
            assert!((b.x - x).abs() <= DRIFT_PX + 1e-12);
            assert!((b.y - y).abs() <= DRIFT_PX + 1e-12);
        }
        assert_eq!(b.radius, 40.0);
    }

    #[test]
    fn speed_is_jittered_around_base() {
        let mut lo = Sequence::new([0.0, 0.0]);
        let mut hi = Sequence::new([0.0, 0.999_999]);
        let a = Blob::new(0.0, 0.0, 1.0, Tint::Cyan, &mut lo);
        let b = Blob::new(0.0, 0.0, 1.0, Tint::Cyan, &mut hi);
        assert!((a.speed - 0.105).abs() < 1e-9);
        assert!(b.speed < 0.195 && b.speed > 0.19);
    }
}
