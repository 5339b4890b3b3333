//! Animated cosmic background on a full-viewport canvas.
//!
//! Scene state is updated with explicit frame deltas in [`scene`]; this module
//! owns the canvas, the `requestAnimationFrame` loop, DPI-aware resizing and
//! the comet timer.

mod blob;
mod comet;
mod orb;
mod scene;

pub use blob::{BLOB_OPACITY, Blob};
pub use comet::{Comet, Point, TRAIL_LEN, cubic_bezier, ease};
pub use orb::{Orb, WRAP_MARGIN, wrap_axis};
pub use scene::{CometSpawner, Scene, Tint, Viewport};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use crate::config::CosmosConfig;
use crate::dom::{self, Listener};
use crate::random::XorShift;
use crate::schedule::Timer;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A running `requestAnimationFrame` chain; cancelled on drop.
pub struct FrameLoop {
    callback: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start<F: FnMut(f64) + 'static>(mut on_frame: F) -> Result<Self, JsValue> {
        let window = dom::window()?;
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));
        let weak = Rc::downgrade(&callback);
        let next = Rc::clone(&handle);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            on_frame(ts);
            let (Some(cb), Some(w)) = (weak.upgrade(), web_sys::window()) else { return };
            if let Some(f) = cb.borrow().as_ref() {
                next.set(w.request_animation_frame(f.as_ref().unchecked_ref()).ok());
            }
        }) as Box<dyn FnMut(f64)>));
        if let Some(f) = callback.borrow().as_ref() {
            handle.set(Some(window.request_animation_frame(f.as_ref().unchecked_ref())?));
        }
        Ok(Self { callback, handle })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(w)) = (self.handle.take(), web_sys::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .is_some_and(|q| q.matches())
}

fn measure(window: &Window) -> Viewport {
    let px = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(px(window.inner_width()), px(window.inner_height()), window.device_pixel_ratio())
}

/// Sizes the backing buffer in device pixels, keeps the element at logical
/// size, and rescales so drawing stays in logical pixels.
fn fit_canvas(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, vp: &Viewport) -> Result<(), JsValue> {
    let style = canvas.style();
    style.set_property("width", &format!("{}px", vp.width))?;
    style.set_property("height", &format!("{}px", vp.height))?;
    let (bw, bh) = vp.backing_size();
    canvas.set_width(bw);
    canvas.set_height(bh);
    ctx.set_transform(vp.dpr, 0.0, 0.0, vp.dpr, 0.0, 0.0)
}

pub struct CosmosAnimation {
    scene: Rc<RefCell<Scene>>,
    _frames: FrameLoop,
    _comets: Timer,
    _resize: Listener,
}

impl CosmosAnimation {
    /// Inert when the canvas or its 2D context is unavailable.
    pub fn attach(document: &Document, config: &CosmosConfig) -> Result<Option<Self>, JsValue> {
        let Some(canvas) = dom::by_id::<HtmlCanvasElement>(document, &config.canvas_id) else {
            return Ok(None);
        };
        let Some(ctx) = canvas.get_context("2d")? else {
            return Ok(None);
        };
        let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
        let window = dom::window()?;

        let reduced = prefers_reduced_motion(&window);
        let viewport = measure(&window);
        fit_canvas(&canvas, &ctx, &viewport)?;

        let mut rng = XorShift::from_entropy();
        let scene = Rc::new(RefCell::new(Scene::new(viewport, config, reduced, &mut rng)));

        let resize = {
            let (scene, canvas, ctx, win) = (Rc::clone(&scene), canvas.clone(), ctx.clone(), window.clone());
            Listener::new(&window, "resize", move |_| {
                let vp = measure(&win);
                scene.borrow_mut().resize(vp);
                if let Err(err) = fit_canvas(&canvas, &ctx, &vp) {
                    dom::report("cosmos resize:", &err);
                }
            })?
        };

        let frames = {
            let scene = Rc::clone(&scene);
            let mut last = dom::now_ms();
            let mut reported = false;
            FrameLoop::start(move |now: f64| {
                let dt = (now - last).max(0.0);
                last = now;
                let mut scene = scene.borrow_mut();
                scene.advance(dt);
                if let Err(err) = scene.draw(&ctx) {
                    if !reported {
                        dom::report("cosmos draw:", &err);
                        reported = true;
                    }
                }
                scene.prune();
            })?
        };

        let spawner = CometSpawner::new(Rc::clone(&scene), rng, config);
        let comets = Timer::start(spawner, config.first_comet_delay_ms);

        Ok(Some(Self { scene, _frames: frames, _comets: comets, _resize: resize }))
    }

    pub fn live_comets(&self) -> usize {
        self.scene.borrow().comets().len()
    }

    pub fn viewport(&self) -> Viewport {
        self.scene.borrow().viewport()
    }
}
