//! Timer task scheduling.
//!
//! The store never talks to browser timers directly. It asks a `Scheduler` for a task and
//! keeps the returned handle; dropping the handle cancels the task. When a task fires, the
//! scheduler reports the `TimerEvent` it was created with back to whoever owns the store.

use gloo_timers::callback::{Interval, Timeout};
use log::debug;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second of countdown elapsed.
    Tick,
    /// The deferred auto-start requested by a browser-source URL is due.
    DelayedStart,
}

pub trait Scheduler {
    /// Cancels its task when dropped.
    type Handle;

    fn every(&mut self, period_ms: u32, event: TimerEvent) -> Self::Handle;
    fn after(&mut self, delay_ms: u32, event: TimerEvent) -> Self::Handle;
}

/// Schedules tasks on the browser event loop with `gloo-timers`.
pub struct BrowserScheduler {
    dispatch: Rc<dyn Fn(TimerEvent)>,
}

impl BrowserScheduler {
    pub fn new(dispatch: impl Fn(TimerEvent) + 'static) -> Self {
        Self {
            dispatch: Rc::new(dispatch),
        }
    }
}

impl Scheduler for BrowserScheduler {
    type Handle = BrowserTask;

    fn every(&mut self, period_ms: u32, event: TimerEvent) -> BrowserTask {
        let dispatch = self.dispatch.clone();
        let interval = Interval::new(period_ms, move || dispatch(event));
        BrowserTask::Interval(Some(interval))
    }

    fn after(&mut self, delay_ms: u32, event: TimerEvent) -> BrowserTask {
        let dispatch = self.dispatch.clone();
        let timeout = Timeout::new(delay_ms, move || dispatch(event));
        BrowserTask::Timeout(Some(timeout))
    }
}

/// A live browser timer.
///
/// Handles are often dropped from inside their own callback (a tick that finishes the
/// countdown cancels its interval). The timer is cleared immediately, but the JS closure
/// is released on a later microtask so it is never freed while it is still executing.
pub enum BrowserTask {
    Interval(Option<Interval>),
    Timeout(Option<Timeout>),
}

impl Drop for BrowserTask {
    fn drop(&mut self) {
        let closure = match self {
            BrowserTask::Interval(interval) => interval.take().map(Interval::cancel),
            BrowserTask::Timeout(timeout) => timeout.take().map(Timeout::cancel),
        };
        if let Some(closure) = closure {
            debug!("Cancelled browser timer");
            wasm_bindgen_futures::spawn_local(async move {
                drop(closure);
            });
        }
    }
}
