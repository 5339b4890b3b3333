//! The decorative scene: blobs, orbs and comets in logical (CSS) pixels.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::{Blob, Comet, Orb};
use crate::config::CosmosConfig;
use crate::random::Rng;
use crate::schedule::RepeatingTask;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Purple,
    Cyan,
    Gold,
}

impl Tint {
    fn rgb(self) -> (u8, u8, u8) {
        match self {
            Tint::Purple => (179, 117, 241),
            Tint::Cyan => (0, 191, 255),
            Tint::Gold => (255, 215, 0),
        }
    }

    pub fn rgba(self, alpha: f64) -> String {
        let (r, g, b) = self.rgb();
        format!("rgba({r},{g},{b},{alpha})")
    }

    pub fn solid(self) -> String {
        self.rgba(1.0)
    }
}

/// Logical viewport plus the device pixel ratio used for the backing buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        Self { width: width.max(0.0), height: height.max(0.0), dpr: dpr.max(1.0) }
    }

    /// Canvas buffer size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).floor() as u32,
            (self.height * self.dpr).floor() as u32,
        )
    }

    pub fn longest_side(&self) -> f64 {
        self.width.max(self.height)
    }
}

pub struct Scene {
    viewport: Viewport,
    reduced_motion: bool,
    blobs: Vec<Blob>,
    orbs: Vec<Orb>,
    comets: Vec<Comet>,
}

impl Scene {
    /// Three nebula blobs and a fixed orb pool; reduced motion drops the
    /// blobs and uses the smaller pool.
    pub fn new(viewport: Viewport, config: &CosmosConfig, reduced_motion: bool, rng: &mut dyn Rng) -> Self {
        let (w, h, m) = (viewport.width, viewport.height, viewport.longest_side());
        let blobs = if reduced_motion {
            Vec::new()
        } else {
            vec![
                Blob::new(w * 0.18, h * 0.25, m * 0.35, Tint::Purple, rng),
                Blob::new(w * 0.82, h * 0.35, m * 0.30, Tint::Cyan, rng),
                Blob::new(w * 0.50, h * 0.85, m * 0.40, Tint::Gold, rng),
            ]
        };
        let count = if reduced_motion { config.reduced_orb_count } else { config.orb_count };
        let orbs = (0..count).map(|_| Orb::new(&viewport, rng)).collect();
        Self { viewport, reduced_motion, blobs, orbs, comets: Vec::new() }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    pub fn comets(&self) -> &[Comet] {
        &self.comets
    }

    pub fn push_comet(&mut self, comet: Comet) {
        self.comets.push(comet);
    }

    pub fn spawn_comet(&mut self, rng: &mut dyn Rng) {
        let comet = Comet::new(&self.viewport, rng);
        self.comets.push(comet);
    }

    /// Steps every object by `dt` ms: blobs, then orbs, then comets.
    pub fn advance(&mut self, dt: f64) {
        let vp = self.viewport;
        for b in &mut self.blobs {
            b.update(dt);
        }
        for o in &mut self.orbs {
            o.update(dt, &vp);
        }
        for c in &mut self.comets {
            c.update(dt);
        }
    }

    /// Same order as `advance`; comets last so they sit on top.
    pub fn draw(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        ctx.clear_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
        for b in &self.blobs {
            b.draw(ctx)?;
        }
        for o in &self.orbs {
            o.draw(ctx)?;
        }
        for c in &self.comets {
            c.draw(ctx)?;
        }
        Ok(())
    }

    /// Drops finished comets; returns how many went.
    pub fn prune(&mut self) -> usize {
        let before = self.comets.len();
        self.comets.retain(|c| !c.is_done());
        before - self.comets.len()
    }
}

/// Comet schedule: one comet per step (sometimes two), then a random pause.
/// Under reduced motion it keeps ticking but never spawns.
pub struct CometSpawner<R: Rng> {
    scene: Rc<RefCell<Scene>>,
    rng: R,
    interval_ms: (f64, f64),
    double_chance: f64,
}

impl<R: Rng> CometSpawner<R> {
    pub fn new(scene: Rc<RefCell<Scene>>, rng: R, config: &CosmosConfig) -> Self {
        Self {
            scene,
            rng,
            interval_ms: (config.comet_interval_min_ms, config.comet_interval_max_ms),
            double_chance: config.double_comet_chance,
        }
    }
}

impl<R: Rng> RepeatingTask for CometSpawner<R> {
    fn step(&mut self) -> f64 {
        let mut scene = self.scene.borrow_mut();
        if !scene.reduced_motion() {
            scene.spawn_comet(&mut self.rng);
            if self.rng.chance(self.double_chance) {
                scene.spawn_comet(&mut self.rng);
            }
        }
        self.rng.range(self.interval_ms.0, self.interval_ms.1)
    }
}
