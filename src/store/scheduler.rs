//! Deferred-callback scheduling capability
//!
//! The debounce mechanism is injected rather than tied to a host timer
//! API: a [`Scheduler`] schedules a one-shot callback after a delay and
//! hands back a [`TimerHandle`] that cancels it. The model is
//! single-threaded and cooperative; callbacks run inline from whoever
//! drives the scheduler, never from a background thread.
//!
//! [`ManualScheduler`] is the provided implementation: it queues callbacks
//! against a virtual clock and fires them when [`advance`] moves time past
//! their due point. Hosts with a real event loop implement [`Scheduler`]
//! over their own timer facility.
//!
//! [`advance`]: ManualScheduler::advance

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// One-shot deferred callback scheduling.
pub trait Scheduler {
    /// Schedules `callback` to run once after `delay`.
    fn schedule_once(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;
}

/// Cancellation handle for a scheduled callback.
///
/// Dropping the handle without calling [`cancel`](TimerHandle::cancel)
/// detaches it; the callback still fires.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerHandle {
    /// Wraps a scheduler-specific cancellation action.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancels the scheduled callback. Cancelling one that already fired
    /// is a no-op.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

struct Scheduled {
    id: u64,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualSchedulerInner {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled>,
}

/// A virtual-clock [`Scheduler`] driven explicitly by the caller.
///
/// Cloning is cheap and shares the clock, so a test can keep one handle
/// for `advance` while the store owns another.
#[derive(Default, Clone)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualSchedulerInner>>,
}

impl ManualScheduler {
    /// Create a scheduler with its clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of scheduled, not-yet-fired callbacks.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Advances the virtual clock by `delta`, firing every due callback in
    /// due order (scheduling order for equal due times).
    pub fn advance(&self, delta: Duration) {
        let target = self.inner.borrow().now + delta;
        loop {
            // Pull out the next due callback before invoking it, so a
            // callback that schedules or cancels does not re-enter the
            // borrow.
            let next = {
                let mut inner = self.inner.borrow_mut();
                let idx = inner
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.due <= target)
                    .min_by_key(|(_, entry)| (entry.due, entry.id))
                    .map(|(idx, _)| idx);
                match idx {
                    Some(idx) => {
                        let entry = inner.pending.remove(idx);
                        inner.now = entry.due;
                        Some(entry.callback)
                    }
                    None => {
                        inner.now = target;
                        None
                    }
                }
            };
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            let due = inner.now + delay;
            inner.pending.push(Scheduled { id, due, callback });
            id
        };
        let weak = Rc::downgrade(&self.inner);
        TimerHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().pending.retain(|entry| entry.id != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_callback_fires_after_delay() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));

        let fired_clone = fired.clone();
        scheduler.schedule_once(
            Duration::from_millis(100),
            Box::new(move || fired_clone.set(true)),
        );

        scheduler.advance(Duration::from_millis(99));
        assert!(!fired.get());
        scheduler.advance(Duration::from_millis(1));
        assert!(fired.get());
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));

        let fired_clone = fired.clone();
        let handle = scheduler.schedule_once(
            Duration::from_millis(50),
            Box::new(move || fired_clone.set(true)),
        );
        handle.cancel();

        scheduler.advance(Duration::from_millis(100));
        assert!(!fired.get());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_fires_in_due_order() {
        let scheduler = ManualScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (label, delay_ms) in [("late", 200u64), ("early", 50), ("mid", 100)] {
            let order = order.clone();
            scheduler.schedule_once(
                Duration::from_millis(delay_ms),
                Box::new(move || order.borrow_mut().push(label)),
            );
        }

        scheduler.advance(Duration::from_millis(500));
        assert_eq!(*order.borrow(), vec!["early", "mid", "late"]);
    }

    #[test]
    fn test_clock_stops_at_target_when_nothing_due() {
        let scheduler = ManualScheduler::new();
        scheduler.advance(Duration::from_millis(250));
        assert_eq!(scheduler.now(), Duration::from_millis(250));
    }

    #[test]
    fn test_callback_may_reschedule() {
        let scheduler = ManualScheduler::new();
        let count = Rc::new(Cell::new(0u32));

        let reschedule = scheduler.clone();
        let count_clone = count.clone();
        scheduler.schedule_once(
            Duration::from_millis(10),
            Box::new(move || {
                count_clone.set(count_clone.get() + 1);
                let count_again = count_clone.clone();
                reschedule.schedule_once(
                    Duration::from_millis(10),
                    Box::new(move || count_again.set(count_again.get() + 1)),
                );
            }),
        );

        scheduler.advance(Duration::from_millis(30));
        assert_eq!(count.get(), 2);
    }
}
