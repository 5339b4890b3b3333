//! Self-rescheduling tasks.
//!
//! A [`RepeatingTask`] runs one step at a time and says how long to wait
//! before the next one. The same task can be driven by [`Timer`] (a
//! `setTimeout` chain in the browser) or by [`VirtualClock`], which advances
//! time by hand so tests never sleep.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub trait RepeatingTask {
    /// Runs one step; returns the delay in ms before the next step.
    fn step(&mut self) -> f64;
}

impl<T: RepeatingTask + ?Sized> RepeatingTask for Rc<RefCell<T>> {
    fn step(&mut self) -> f64 {
        self.borrow_mut().step()
    }
}

impl<T: RepeatingTask + ?Sized> RepeatingTask for Box<T> {
    fn step(&mut self) -> f64 {
        (**self).step()
    }
}

// --- Virtual time -----------------------------------------------------------

struct Scheduled {
    due: f64,
    seq: usize,
    task: Box<dyn RepeatingTask>,
}

/// Deterministic driver: tasks only run inside [`VirtualClock::advance`].
///
/// Delays under 1 ms are stretched to 1 ms so a zero-delay task cannot spin.
#[derive(Default)]
pub struct VirtualClock {
    now: f64,
    next_seq: usize,
    tasks: Vec<Scheduled>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn spawn<T: RepeatingTask + 'static>(&mut self, task: T, initial_delay_ms: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(Scheduled {
            due: self.now + initial_delay_ms.max(0.0),
            seq,
            task: Box::new(task),
        });
    }

    /// Moves time forward by `ms`, running every step that falls due, in due
    /// order (ties broken by spawn order). Returns how many steps ran.
    pub fn advance(&mut self, ms: f64) -> usize {
        let target = self.now + ms.max(0.0);
        let mut ran = 0;
        loop {
            let next = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= target)
                .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
                .map(|(i, _)| i);
            let Some(idx) = next else { break };
            let entry = &mut self.tasks[idx];
            self.now = self.now.max(entry.due);
            let delay = entry.task.step().max(1.0);
            entry.due = self.now + delay;
            ran += 1;
        }
        self.now = target;
        ran
    }

    /// Time until the earliest pending step, if any task is scheduled.
    pub fn next_due_in(&self) -> Option<f64> {
        self.tasks
            .iter()
            .map(|t| t.due - self.now)
            .min_by(f64::total_cmp)
    }
}

// --- Browser time -----------------------------------------------------------

struct TimerSlot {
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl TimerSlot {
    fn arm(&self, delay_ms: f64) {
        let Some(win) = web_sys::window() else { return };
        if let Some(cb) = self.callback.borrow().as_ref() {
            let id = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                delay_ms.max(0.0).round() as i32,
            );
            self.handle.set(id.ok());
        }
    }
}

/// A running `setTimeout` chain. Dropping the timer cancels the pending step.
pub struct Timer {
    slot: Rc<TimerSlot>,
}

impl Timer {
    pub fn start<T: RepeatingTask + 'static>(mut task: T, initial_delay_ms: f64) -> Self {
        let slot = Rc::new(TimerSlot { handle: Cell::new(None), callback: RefCell::new(None) });
        let weak = Rc::downgrade(&slot);
        let callback = Closure::wrap(Box::new(move || {
            let delay = task.step();
            if let Some(slot) = weak.upgrade() {
                slot.arm(delay);
            }
        }) as Box<dyn FnMut()>);
        *slot.callback.borrow_mut() = Some(callback);
        slot.arm(initial_delay_ms);
        Self { slot }
    }

    pub fn is_pending(&self) -> bool {
        self.slot.handle.get().is_some()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let (Some(id), Some(win)) = (self.slot.handle.take(), web_sys::window()) {
            win.clear_timeout_with_handle(id);
        }
        self.slot.callback.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Every {
        delay: f64,
        runs: Vec<f64>,
        clock: Rc<Cell<f64>>,
    }

    impl RepeatingTask for Every {
        fn step(&mut self) -> f64 {
            self.runs.push(self.clock.get());
            self.delay
        }
    }

    #[test]
    fn runs_due_steps_only() {
        let mut clock = VirtualClock::new();
        let task = Rc::new(RefCell::new(Every { delay: 100.0, runs: vec![], clock: Rc::new(Cell::new(0.0)) }));
        clock.spawn(Rc::clone(&task), 0.0);
        assert_eq!(clock.advance(0.0), 1);
        assert_eq!(clock.advance(99.0), 0);
        assert_eq!(clock.advance(1.0), 1);
        assert_eq!(clock.advance(350.0), 3);
        assert_eq!(task.borrow().runs.len(), 5);
        assert_eq!(clock.now(), 450.0);
        assert_eq!(clock.next_due_in(), Some(50.0));
    }

    #[test]
    fn interleaves_by_due_time() {
        let order = Rc::new(RefCell::new(Vec::new()));
        struct Tag(&'static str, f64, Rc<RefCell<Vec<&'static str>>>);
        impl RepeatingTask for Tag {
            fn step(&mut self) -> f64 {
                self.2.borrow_mut().push(self.0);
                self.1
            }
        }
        let mut clock = VirtualClock::new();
        clock.spawn(Tag("slow", 30.0, Rc::clone(&order)), 10.0);
        clock.spawn(Tag("fast", 10.0, Rc::clone(&order)), 10.0);
        clock.advance(40.0);
        assert_eq!(
            *order.borrow(),
            vec!["slow", "fast", "fast", "fast", "slow", "fast"]
        );
    }

    #[test]
    fn zero_delay_does_not_spin() {
        struct Zero(usize);
        impl RepeatingTask for Zero {
            fn step(&mut self) -> f64 {
                self.0 += 1;
                0.0
            }
        }
        let task = Rc::new(RefCell::new(Zero(0)));
        let mut clock = VirtualClock::new();
        clock.spawn(Rc::clone(&task), 0.0);
        clock.advance(10.0);
        assert_eq!(task.borrow().0, 11);
    }
}
