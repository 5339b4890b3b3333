//! Typewriter banner: reveals each phrase character by character, pauses,
//! erases it at double speed and moves on to the next phrase, forever.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::config::TypingConfig;
use crate::schedule::{RepeatingTask, Timer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Typing,
    Deleting,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypingTiming {
    pub type_delay_ms: f64,
    pub delete_delay_ms: f64,
    pub pause_ms: f64,
}

impl From<&TypingConfig> for TypingTiming {
    fn from(cfg: &TypingConfig) -> Self {
        Self {
            type_delay_ms: cfg.type_delay_ms,
            delete_delay_ms: cfg.delete_delay_ms,
            pause_ms: cfg.pause_ms,
        }
    }
}

/// Phrase cycle state. `shown` never exceeds the current phrase's length in chars.
#[derive(Clone, Debug)]
pub struct TypingCycle {
    phrases: Vec<String>,
    timing: TypingTiming,
    index: usize,
    shown: usize,
    mode: Mode,
}

impl TypingCycle {
    /// `None` when there is nothing to type.
    pub fn new(phrases: Vec<String>, timing: TypingTiming) -> Option<Self> {
        if phrases.is_empty() {
            return None;
        }
        Some(Self { phrases, timing, index: 0, shown: 0, mode: Mode::Typing })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phrase(&self) -> &str {
        &self.phrases[self.index]
    }

    fn phrase_len(&self) -> usize {
        self.phrase().chars().count()
    }

    /// Currently displayed prefix of the active phrase.
    pub fn text(&self) -> String {
        self.phrase().chars().take(self.shown).collect()
    }

    /// Advances one character and returns the delay before the next tick.
    ///
    /// Reaching the full phrase flips to `Deleting` and asks for the pause;
    /// reaching zero flips back to `Typing` on the next phrase.
    pub fn tick(&mut self) -> f64 {
        match self.mode {
            Mode::Typing => {
                let len = self.phrase_len();
                self.shown = (self.shown + 1).min(len);
                if self.shown == len {
                    self.mode = Mode::Deleting;
                    return self.timing.pause_ms;
                }
                self.timing.type_delay_ms
            }
            Mode::Deleting => {
                self.shown = self.shown.saturating_sub(1);
                if self.shown == 0 {
                    self.mode = Mode::Typing;
                    self.index = (self.index + 1) % self.phrases.len();
                }
                self.timing.delete_delay_ms
            }
        }
    }
}

impl RepeatingTask for TypingCycle {
    fn step(&mut self) -> f64 {
        self.tick()
    }
}

/// Mirrors a [`TypingCycle`] into an element's text after every tick.
struct TypingTask {
    cycle: TypingCycle,
    target: Element,
}

impl RepeatingTask for TypingTask {
    fn step(&mut self) -> f64 {
        let delay = self.cycle.tick();
        self.target.set_text_content(Some(&self.cycle.text()));
        delay
    }
}

pub struct TypingAnimator {
    _timer: Timer,
}

impl TypingAnimator {
    /// Starts typing into the configured element. Inert when the element is
    /// missing or there are no phrases.
    pub fn attach(document: &Document, config: &TypingConfig) -> Result<Option<Self>, JsValue> {
        let Some(target) = document.get_element_by_id(&config.element_id) else {
            return Ok(None);
        };
        let Some(cycle) = TypingCycle::new(config.phrases.clone(), config.into()) else {
            return Ok(None);
        };
        let timer = Timer::start(TypingTask { cycle, target }, 0.0);
        Ok(Some(Self { _timer: timer }))
    }
}
