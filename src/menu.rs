//! Collapsible navigation menu for narrow viewports.
//!
//! Open/closed is mirrored as the `active` class on both the toggle button
//! and the menu panel; the two are always written together.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::MenuConfig;
use crate::timer::{Scheduler, Timeout};

/// An element whose open state is a CSS class
pub trait ActiveClass {
    fn is_active(&self) -> bool;
    fn set_active(&self, active: bool);
}

pub trait Viewport {
    /// Inner width in CSS pixels
    fn width(&self) -> f64;
}

pub struct MenuController {
    toggle: Rc<dyn ActiveClass>,
    panel: Rc<dyn ActiveClass>,
    scheduler: Rc<dyn Scheduler>,
    config: MenuConfig,
    link_close: RefCell<Vec<Timeout>>,
    resize_check: RefCell<Option<Timeout>>,
}

impl MenuController {
    /// Both elements are required; a page missing either gets no menu
    /// behaviour at all.
    pub fn new(
        toggle: Option<Rc<dyn ActiveClass>>,
        panel: Option<Rc<dyn ActiveClass>>,
        scheduler: Rc<dyn Scheduler>,
        config: MenuConfig,
    ) -> Option<Rc<Self>> {
        let (toggle, panel) = match (toggle, panel) {
            (Some(t), Some(p)) => (t, p),
            _ => {
                tracing::debug!(
                    "Mobile menu disabled: #{} or #{} missing",
                    config.toggle_id,
                    config.panel_id
                );
                return None;
            }
        };

        Some(Rc::new(Self {
            toggle,
            panel,
            scheduler,
            config,
            link_close: RefCell::new(Vec::new()),
            resize_check: RefCell::new(None),
        }))
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_active()
    }

    fn set_open(&self, open: bool) {
        self.toggle.set_active(open);
        self.panel.set_active(open);
    }

    pub fn close(&self) {
        self.set_open(false);
    }

    /// The caller stops the click from reaching the document handler.
    pub fn on_toggle_click(&self) {
        self.set_open(!self.is_open());
    }

    /// Any click on the page while open; closes unless it landed inside the
    /// panel or the toggle.
    pub fn on_document_click(&self, inside_panel: bool, inside_toggle: bool) {
        if self.is_open() && !inside_panel && !inside_toggle {
            self.close();
        }
    }

    /// Close shortly after a nav link is followed so the navigation starts
    /// before the panel collapses. Every click gets its own timer; a later
    /// click never postpones an earlier close.
    pub fn on_link_click(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let timeout = self.scheduler.schedule(
            self.config.link_close_delay(),
            Box::new(move || {
                if let Some(menu) = weak.upgrade() {
                    menu.close();
                }
            }),
        );
        self.link_close.borrow_mut().push(timeout);
    }

    /// Debounced: each resize replaces (and so cancels) the pending check.
    pub fn on_resize(self: &Rc<Self>, viewport: Rc<dyn Viewport>) {
        let weak = Rc::downgrade(self);
        let timeout = self.scheduler.schedule(
            self.config.resize_debounce(),
            Box::new(move || {
                if let Some(menu) = weak.upgrade() {
                    if viewport.width() >= menu.config.desktop_min_width {
                        menu.close();
                    }
                }
            }),
        );
        // Bind first: dropping the old handle cancels through the scheduler
        let previous = self.resize_check.replace(Some(timeout));
        drop(previous);
    }
}
