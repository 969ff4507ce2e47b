//! Auto-dismissal of flash message banners.
//!
//! Each alert present at load fades out after the configured delay and is
//! removed from the document once the fade has had time to play.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::AlertConfig;
use crate::timer::{Scheduler, Timeout};

/// An alert banner as seen by the dismisser
pub trait Dismissible {
    /// Start the visual fade (opacity 0)
    fn fade_out(&self);
    /// Remove from the document. Must be a no-op on a detached element.
    fn detach(&self);
}

impl<T: Dismissible + ?Sized> Dismissible for Rc<T> {
    fn fade_out(&self) {
        (**self).fade_out()
    }

    fn detach(&self) {
        (**self).detach()
    }
}

/// Owns the fade/remove timers for every alert on the page.
///
/// Dropping it cancels whatever has not fired yet.
pub struct AlertDismisser {
    timers: Rc<RefCell<Vec<Timeout>>>,
}

impl AlertDismisser {
    pub fn start<A>(alerts: Vec<A>, scheduler: Rc<dyn Scheduler>, config: &AlertConfig) -> Self
    where
        A: Dismissible + 'static,
    {
        let timers = Rc::new(RefCell::new(Vec::with_capacity(alerts.len() * 2)));
        let remove_delay = config.remove_delay();

        if !alerts.is_empty() {
            tracing::debug!(
                "Scheduling dismissal of {} alert(s) in {:?}",
                alerts.len(),
                config.fade_delay()
            );
        }

        for alert in alerts {
            let alert = Rc::new(alert);
            let sched = scheduler.clone();
            let weak_timers = Rc::downgrade(&timers);

            let fade = scheduler.schedule(
                config.fade_delay(),
                Box::new(move || {
                    alert.fade_out();
                    let remove = sched.schedule(remove_delay, Box::new(move || alert.detach()));
                    // Dismisser already torn down: dropping `remove` cancels it
                    if let Some(timers) = weak_timers.upgrade() {
                        timers.borrow_mut().push(remove);
                    }
                }),
            );
            timers.borrow_mut().push(fade);
        }

        Self { timers }
    }

    /// Timer handles held, fired or not
    pub fn handles(&self) -> usize {
        self.timers.borrow().len()
    }
}
