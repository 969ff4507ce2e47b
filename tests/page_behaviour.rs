//! Page-level scenarios
//!
//! Drives the public controllers the way the browser bindings do, with
//! in-memory stand-ins for elements, dialogs, storage and the network.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use page_glue::alerts::{AlertDismisser, Dismissible};
use page_glue::config::{load_config, Config};
use page_glue::confirm::{is_delete_control, Activation, DeleteGuard, Prompt};
use page_glue::keyboard::KeyChord;
use page_glue::menu::{ActiveClass, MenuController, Viewport};
use page_glue::sync::{sync_preference, PreferenceClient, SaveThemeRequest, SaveThemeResponse, SyncOutcome};
use page_glue::theme::{MemoryThemeStore, Theme, ThemeController, ThemeStore, ThemeSurface};
use page_glue::timer::ManualScheduler;
use page_glue::validation::{FormValidator, RequiredField, Submission};
use page_glue::GlueError;

// =============================================================================
// Stand-ins
// =============================================================================

#[derive(Default)]
struct Page {
    body_theme: RefCell<Option<String>>,
    hint: Option<String>,
    icon: Option<RefCell<String>>,
}

impl ThemeSurface for Page {
    fn applied(&self) -> Option<Theme> {
        self.body_theme.borrow().as_deref().and_then(Theme::parse)
    }

    fn set_applied(&self, theme: Theme) {
        *self.body_theme.borrow_mut() = Some(theme.as_str().into());
    }

    fn server_hint(&self) -> Option<String> {
        self.hint.clone()
    }

    fn set_indicator(&self, glyph: &str) -> bool {
        match &self.icon {
            Some(icon) => {
                *icon.borrow_mut() = glyph.into();
                true
            }
            None => false,
        }
    }
}

struct Dialogs {
    answer: bool,
    confirms: Cell<u32>,
    alerts: Cell<u32>,
}

impl Dialogs {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            confirms: Cell::new(0),
            alerts: Cell::new(0),
        }
    }
}

impl Prompt for Dialogs {
    fn confirm(&self, _message: &str) -> bool {
        self.confirms.set(self.confirms.get() + 1);
        self.answer
    }

    fn alert(&self, _message: &str) {
        self.alerts.set(self.alerts.get() + 1);
    }
}

struct Input(&'static str);

impl RequiredField for Input {
    fn value(&self) -> String {
        self.0.to_string()
    }

    fn set_border_color(&self, _color: &str) {}
}

#[derive(Default)]
struct Banner {
    opacity_zero: Cell<bool>,
    in_document: Cell<bool>,
}

impl Dismissible for Banner {
    fn fade_out(&self) {
        self.opacity_zero.set(true);
    }

    fn detach(&self) {
        self.in_document.set(false);
    }
}

#[derive(Default)]
struct Classy(Cell<bool>);

impl ActiveClass for Classy {
    fn is_active(&self) -> bool {
        self.0.get()
    }

    fn set_active(&self, active: bool) {
        self.0.set(active);
    }
}

struct FixedWidth(f64);

impl Viewport for FixedWidth {
    fn width(&self) -> f64 {
        self.0
    }
}

/// Server that accepts everything, recording each body it receives
#[derive(Default)]
struct Server {
    received: RefCell<Vec<SaveThemeRequest>>,
    down: bool,
}

#[async_trait(?Send)]
impl PreferenceClient for Server {
    async fn save_theme(&self, request: &SaveThemeRequest) -> Result<SaveThemeResponse, GlueError> {
        if self.down {
            return Err(GlueError::Js("TypeError: Failed to fetch".into()));
        }
        self.received.borrow_mut().push(request.clone());
        Ok(SaveThemeResponse {
            success: true,
            message: Some("Theme preference saved".into()),
            error: None,
        })
    }
}

// =============================================================================
// Theme
// =============================================================================

#[test]
fn first_visit_with_dark_profile_starts_dark() {
    let page = Rc::new(Page {
        hint: Some("true".into()),
        icon: Some(RefCell::new(String::new())),
        ..Default::default()
    });
    let store = MemoryThemeStore::new();
    let controller = ThemeController::new(store.clone(), page.clone());

    controller.initialize();

    assert_eq!(page.body_theme.borrow().as_deref(), Some("dark"));
    assert_eq!(store.get().as_deref(), Some("dark"));
    assert_eq!(page.icon.as_ref().unwrap().borrow().as_str(), "\u{1F319}");
}

#[test]
fn hint_false_or_missing_starts_light() {
    for hint in [Some("false".to_string()), None] {
        let page = Rc::new(Page {
            hint,
            ..Default::default()
        });
        let controller = ThemeController::new(MemoryThemeStore::new(), page.clone());
        assert_eq!(controller.initialize(), Theme::Light);
        assert_eq!(page.body_theme.borrow().as_deref(), Some("light"));
    }
}

#[test]
fn stored_choice_survives_reload_despite_profile() {
    let store = MemoryThemeStore::new();

    let first = Rc::new(Page {
        hint: Some("false".into()),
        ..Default::default()
    });
    let controller = ThemeController::new(store.clone(), first);
    controller.initialize();
    controller.toggle();
    drop(controller);

    // Next page load: profile still says light, storage says dark
    let second = Rc::new(Page {
        hint: Some("false".into()),
        ..Default::default()
    });
    let controller = ThemeController::new(store, second.clone());
    assert_eq!(controller.initialize(), Theme::Dark);
}

#[test]
fn toggle_then_sync_sends_final_theme() {
    let page = Rc::new(Page::default());
    let controller = ThemeController::new(MemoryThemeStore::new(), page.clone());
    let server = Server::default();
    controller.initialize();

    let shortcut = KeyChord::new("D").ctrl().shift();
    assert!(shortcut.is_theme_shortcut());

    let theme = controller.toggle();
    assert_eq!(tokio_test::block_on(sync_preference(&server, theme)), SyncOutcome::Saved);
    let theme = controller.toggle();
    assert_eq!(tokio_test::block_on(sync_preference(&server, theme)), SyncOutcome::Saved);

    assert_eq!(
        *server.received.borrow(),
        vec![SaveThemeRequest { dark_mode: true }, SaveThemeRequest { dark_mode: false }]
    );
    assert_eq!(page.body_theme.borrow().as_deref(), Some("light"));
}

#[test]
fn failed_sync_leaves_local_theme_alone() {
    let page = Rc::new(Page::default());
    let store = MemoryThemeStore::new();
    let controller = ThemeController::new(store.clone(), page.clone());
    controller.initialize();

    let theme = controller.toggle();
    let server = Server {
        down: true,
        ..Default::default()
    };
    let outcome = tokio_test::block_on(sync_preference(&server, theme));

    assert!(matches!(outcome, SyncOutcome::Failed(_)));
    assert_eq!(page.body_theme.borrow().as_deref(), Some("dark"));
    assert_eq!(store.get().as_deref(), Some("dark"));
}

// =============================================================================
// Alerts / confirmation / forms / menu
// =============================================================================

#[test]
fn alert_fades_then_disappears() {
    let config = Config::default();
    let scheduler = ManualScheduler::new();
    let banner = Rc::new(Banner::default());
    banner.in_document.set(true);

    let _dismisser = AlertDismisser::start(vec![banner.clone()], Rc::new(scheduler.clone()), &config.alerts);

    scheduler.advance(Duration::from_millis(5000));
    assert!(banner.opacity_zero.get());
    assert!(banner.in_document.get());

    scheduler.advance(Duration::from_millis(300));
    assert!(!banner.in_document.get());
}

#[test]
fn delete_link_outside_form_asks_first() {
    let config = Config::default();
    let href = "/admin/meals/4/delete/";
    assert!(is_delete_control(Some(href), &config.confirm.href_marker));

    let guard = DeleteGuard::new(config.confirm.message.clone());

    let no = Dialogs::answering(false);
    assert_eq!(guard.on_activate(false, &no), Activation::Cancel);

    let yes = Dialogs::answering(true);
    assert_eq!(guard.on_activate(false, &yes), Activation::Allow);

    let never_asked = Dialogs::answering(false);
    assert_eq!(guard.on_activate(true, &never_asked), Activation::Allow);
    assert_eq!(never_asked.confirms.get(), 0);
}

#[test]
fn required_fields_gate_submission() {
    let validator = FormValidator::new(Config::default().forms);

    let dialogs = Dialogs::answering(true);
    let blocked = [Input("Ravi"), Input("   ")];
    assert_eq!(validator.on_submit(&blocked, &dialogs), Submission::Cancel);
    assert_eq!(dialogs.alerts.get(), 1);

    let dialogs = Dialogs::answering(true);
    let filled = [Input("Ravi"), Input(" B-12 ")];
    assert_eq!(validator.on_submit(&filled, &dialogs), Submission::Proceed);
    assert_eq!(dialogs.alerts.get(), 0);
}

#[test]
fn menu_closes_on_outside_click_and_desktop_resize() {
    let config = load_config(None).unwrap();
    let scheduler = ManualScheduler::new();
    let toggle = Rc::new(Classy::default());
    let panel = Rc::new(Classy::default());
    let menu = MenuController::new(
        Some(toggle.clone() as Rc<dyn ActiveClass>),
        Some(panel.clone() as Rc<dyn ActiveClass>),
        Rc::new(scheduler.clone()),
        config.menu.clone(),
    )
    .unwrap();

    menu.on_toggle_click();
    assert!(panel.is_active() && toggle.is_active());
    menu.on_document_click(false, false);
    assert!(!panel.is_active() && !toggle.is_active());

    menu.on_toggle_click();
    menu.on_resize(Rc::new(FixedWidth(1440.0)));
    scheduler.advance(config.menu.resize_debounce());
    assert!(!panel.is_active());

    // Resizing on a closed menu keeps it closed
    menu.on_resize(Rc::new(FixedWidth(1440.0)));
    scheduler.advance(config.menu.resize_debounce());
    assert!(!panel.is_active() && !toggle.is_active());
}
