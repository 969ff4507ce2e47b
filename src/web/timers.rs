//! `setTimeout`-backed scheduler.

use std::time::Duration;

use crate::timer::{Scheduler, Task, Timeout};

#[derive(Debug, Default, Clone, Copy)]
pub struct WindowScheduler;

impl Scheduler for WindowScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Timeout {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timer = gloo_timers::callback::Timeout::new(millis, task);
        // gloo clears the browser timer when its handle drops
        Timeout::new(move || drop(timer))
    }
}
