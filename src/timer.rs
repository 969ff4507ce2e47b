//! Fire-once timers with owned, cancellable handles.
//!
//! A component that schedules work keeps the returned [`Timeout`]. Dropping
//! the handle cancels the timer, so tearing a component down also cancels
//! everything it still has pending.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// Work to run once when a timer fires
pub type Task = Box<dyn FnOnce()>;

/// Handle to a pending timer. Cancels on drop.
#[must_use = "dropping a Timeout cancels it"]
pub struct Timeout {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Timeout {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancel explicitly. Cancelling a timer that already fired is a no-op.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Timeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeout")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Source of fire-once timers (`setTimeout` in the browser)
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Timeout;
}

/// Deterministic scheduler driven by [`ManualScheduler::advance`].
///
/// Used off-browser, where there is no event loop to drive `setTimeout`.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

#[derive(Default)]
struct ManualInner {
    now: u64,
    next_id: u64,
    // Keyed by (due, id) so equal deadlines fire in scheduling order
    pending: BTreeMap<(u64, u64), Task>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds elapsed since creation
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Move the clock forward, firing every timer that falls due in order.
    /// Timers scheduled by a firing task run too if they fall inside the
    /// window.
    pub fn advance(&self, by: Duration) {
        let target = self.inner.borrow().now + by.as_millis() as u64;
        loop {
            // Release the borrow before running the task: tasks may schedule
            let next = {
                let mut inner = self.inner.borrow_mut();
                match inner.pending.keys().next().copied() {
                    Some(key) if key.0 <= target => {
                        inner.now = key.0;
                        inner.pending.remove(&key)
                    }
                    _ => None,
                }
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.inner.borrow_mut().now = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Timeout {
        let key = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            let key = (inner.now + delay.as_millis() as u64, id);
            inner.pending.insert(key, task);
            key
        };

        let weak = Rc::downgrade(&self.inner);
        Timeout::new(move || {
            if let Some(inner) = weak.upgrade() {
                // try_borrow_mut: a handle may be dropped from inside a firing task
                if let Ok(mut inner) = inner.try_borrow_mut() {
                    inner.pending.remove(&key);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_fires_at_deadline() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let _t = scheduler.schedule(Duration::from_millis(100), Box::new(move || f.set(true)));

        scheduler.advance(Duration::from_millis(99));
        assert!(!fired.get());
        scheduler.advance(Duration::from_millis(1));
        assert!(fired.get());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_drop_cancels() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let t = scheduler.schedule(Duration::from_millis(10), Box::new(move || f.set(true)));
        drop(t);

        scheduler.advance(Duration::from_millis(50));
        assert!(!fired.get());
    }

    #[test]
    fn test_nested_schedule_within_window() {
        let scheduler = ManualScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let keep = Rc::new(RefCell::new(Vec::new()));

        let (s, o, k) = (scheduler.clone(), order.clone(), keep.clone());
        let _outer = scheduler.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                o.borrow_mut().push(("outer", s.now_ms()));
                let o2 = o.clone();
                let s2 = s.clone();
                let inner = s.schedule(
                    Duration::from_millis(5),
                    Box::new(move || o2.borrow_mut().push(("inner", s2.now_ms()))),
                );
                k.borrow_mut().push(inner);
            }),
        );

        scheduler.advance(Duration::from_millis(20));
        assert_eq!(*order.borrow(), vec![("outer", 10), ("inner", 15)]);
        assert_eq!(scheduler.now_ms(), 20);
    }
}
