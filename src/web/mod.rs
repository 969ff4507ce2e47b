//! Browser entry point.
//!
//! Binds the core controllers to the live DOM. Everything installed for a
//! page (listeners, timers, subscriptions) is owned by one [`PageGlue`]
//! value; [`teardown`] drops it and with it every handler.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, KeyboardEvent, Node, ScrollBehavior, ScrollIntoViewOptions, Window};

use crate::alerts::AlertDismisser;
use crate::config::{self, Config, CONFIG_ELEMENT_ID};
use crate::confirm::{is_delete_control, Activation, DeleteGuard};
use crate::error::{GlueError, Result};
use crate::keyboard::KeyChord;
use crate::logging;
use crate::menu::{ActiveClass, MenuController};
use crate::scroll::scroll_to_anchor;
use crate::sync::sync_preference;
use crate::theme::ThemeController;
use crate::timer::Scheduler;
use crate::validation::{FormValidator, Submission};

pub mod dom;
pub mod listener;
pub mod theme;
pub mod timers;

use dom::{query_all, query_document, AlertBanner, ClassToggle, FormControl, WindowPrompt, WindowViewport};
use listener::EventListener;
use theme::{DocumentThemeSurface, FetchPreferenceClient, LocalThemeStore};
use timers::WindowScheduler;

type PageTheme = ThemeController<LocalThemeStore, DocumentThemeSurface>;

/// Everything installed on the current page
pub struct PageGlue {
    _listeners: Vec<EventListener>,
    _alerts: AlertDismisser,
    _menu: Option<Rc<MenuController>>,
    _theme: Rc<PageTheme>,
}

thread_local! {
    static PAGE: RefCell<Option<PageGlue>> = const { RefCell::new(None) };
    static BOOT: RefCell<Option<EventListener>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let raw = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    let (config, config_error) = match config::load_config(raw.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    logging::init(&config.logging.filter);
    if let Some(e) = config_error {
        tracing::warn!("Using default configuration: {:#}", e);
    }
    tracing::info!("page-glue v{} starting", env!("CARGO_PKG_VERSION"));

    if document.ready_state() == "loading" {
        let boot = EventListener::new(document.as_ref(), "DOMContentLoaded", move |_| {
            mount(&config);
        });
        match boot {
            // Kept until teardown: dropping it here would free the running closure
            Ok(boot) => BOOT.with(|b| *b.borrow_mut() = Some(boot)),
            Err(e) => tracing::error!("Could not wait for DOMContentLoaded: {}", e),
        }
    } else {
        mount(&config);
    }
}

/// Remove every listener and cancel every pending timer
#[wasm_bindgen]
pub fn teardown() {
    PAGE.with(|p| p.borrow_mut().take());
    BOOT.with(|b| b.borrow_mut().take());
    tracing::debug!("page-glue torn down");
}

fn mount(config: &Config) {
    PAGE.with(|page| {
        if page.borrow().is_some() {
            return;
        }
        match PageGlue::install(config) {
            Ok(glue) => *page.borrow_mut() = Some(glue),
            Err(e) => tracing::error!("page-glue not installed: {}", e),
        }
    });
}

impl PageGlue {
    pub fn install(config: &Config) -> Result<Self> {
        let window = web_sys::window().ok_or(GlueError::NoWindow)?;
        let document = window.document().ok_or(GlueError::NoDocument)?;
        let scheduler: Rc<dyn Scheduler> = Rc::new(WindowScheduler);

        let mut listeners = Vec::new();

        let alerts = install_alerts(&document, scheduler.clone(), config);
        listeners.extend(install_delete_confirmation(&window, &document, config)?);
        listeners.extend(install_form_validation(&window, &document, config)?);
        let (menu, menu_listeners) = install_menu(&window, &document, scheduler, config)?;
        listeners.extend(menu_listeners);
        listeners.extend(install_smooth_scroll(&document, config)?);
        let (theme, theme_listeners) = install_theme(&window, &document, config)?;
        listeners.extend(theme_listeners);

        tracing::debug!("Installed {} event listener(s)", listeners.len());

        Ok(Self {
            _listeners: listeners,
            _alerts: alerts,
            _menu: menu,
            _theme: theme,
        })
    }
}

fn install_alerts(document: &Document, scheduler: Rc<dyn Scheduler>, config: &Config) -> AlertDismisser {
    let banners = query_document(document, &config.alerts.selector)
        .into_iter()
        .filter_map(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .map(AlertBanner)
        .collect();
    AlertDismisser::start(banners, scheduler, &config.alerts)
}

fn install_delete_confirmation(window: &Window, document: &Document, config: &Config) -> Result<Vec<EventListener>> {
    let guard = Rc::new(DeleteGuard::new(config.confirm.message.clone()));
    let prompt = Rc::new(WindowPrompt(window.clone()));

    query_document(document, &config.confirm.selector)
        .into_iter()
        .filter(|el| is_delete_control(el.get_attribute("href").as_deref(), &config.confirm.href_marker))
        .map(|control| {
            let guard = guard.clone();
            let prompt = prompt.clone();
            let target = control.clone();
            EventListener::new(control.as_ref(), "click", move |event: Event| {
                let inside_form = target.closest("form").ok().flatten().is_some();
                if guard.on_activate(inside_form, prompt.as_ref()) == Activation::Cancel {
                    event.prevent_default();
                }
            })
        })
        .collect()
}

fn install_form_validation(window: &Window, document: &Document, config: &Config) -> Result<Vec<EventListener>> {
    let validator = Rc::new(FormValidator::new(config.forms.clone()));
    let prompt = Rc::new(WindowPrompt(window.clone()));
    let required = config.forms.required_selector.clone();

    query_document(document, "form")
        .into_iter()
        .map(|form| {
            let validator = validator.clone();
            let prompt = prompt.clone();
            let required = required.clone();
            let target = form.clone();
            EventListener::new(form.as_ref(), "submit", move |event: Event| {
                // Fields are looked up per submit: forms may change after load
                let fields: Vec<FormControl> = query_all(&target, &required)
                    .into_iter()
                    .map(FormControl)
                    .collect();
                if validator.on_submit(&fields, prompt.as_ref()) == Submission::Cancel {
                    event.prevent_default();
                }
            })
        })
        .collect()
}

fn install_menu(
    window: &Window,
    document: &Document,
    scheduler: Rc<dyn Scheduler>,
    config: &Config,
) -> Result<(Option<Rc<MenuController>>, Vec<EventListener>)> {
    let cfg = &config.menu;
    let toggle_el = document.get_element_by_id(&cfg.toggle_id);
    let panel_el = document.get_element_by_id(&cfg.panel_id);

    let as_toggle = |el: &Option<Element>| -> Option<Rc<dyn ActiveClass>> {
        el.clone().map(|element| {
            Rc::new(ClassToggle {
                element,
                class: cfg.active_class.clone(),
            }) as Rc<dyn ActiveClass>
        })
    };

    let Some(menu) = MenuController::new(as_toggle(&toggle_el), as_toggle(&panel_el), scheduler, cfg.clone())
    else {
        return Ok((None, Vec::new()));
    };
    let (Some(toggle_el), Some(panel_el)) = (toggle_el, panel_el) else {
        return Ok((None, Vec::new()));
    };

    let mut listeners = Vec::new();

    let m = menu.clone();
    listeners.push(EventListener::new(toggle_el.as_ref(), "click", move |event: Event| {
        event.stop_propagation();
        m.on_toggle_click();
    })?);

    let m = menu.clone();
    let (panel, toggle) = (panel_el.clone(), toggle_el.clone());
    listeners.push(EventListener::new(document.as_ref(), "click", move |event: Event| {
        let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
        let inside_panel = panel.contains(target.as_ref());
        let inside_toggle = toggle.contains(target.as_ref());
        m.on_document_click(inside_panel, inside_toggle);
    })?);

    for link in query_all(&panel_el, &cfg.link_selector) {
        let m = menu.clone();
        listeners.push(EventListener::new(link.as_ref(), "click", move |_| {
            m.on_link_click();
        })?);
    }

    let m = menu.clone();
    let viewport = Rc::new(WindowViewport(window.clone()));
    listeners.push(EventListener::new(window.as_ref(), "resize", move |_| {
        m.on_resize(viewport.clone());
    })?);

    Ok((Some(menu), listeners))
}

fn install_smooth_scroll(document: &Document, config: &Config) -> Result<Vec<EventListener>> {
    query_document(document, &config.scroll.anchor_selector)
        .into_iter()
        .map(|anchor| {
            let document = document.clone();
            let target = anchor.clone();
            EventListener::new(anchor.as_ref(), "click", move |event: Event| {
                event.prevent_default();
                let href = target.get_attribute("href").unwrap_or_default();
                scroll_to_anchor(
                    &href,
                    |id| document.get_element_by_id(id),
                    |el| {
                        let opts = ScrollIntoViewOptions::new();
                        opts.set_behavior(ScrollBehavior::Smooth);
                        el.scroll_into_view_with_scroll_into_view_options(&opts);
                    },
                );
            })
        })
        .collect()
}

fn install_theme(window: &Window, document: &Document, config: &Config) -> Result<(Rc<PageTheme>, Vec<EventListener>)> {
    let controller = Rc::new(ThemeController::new(
        LocalThemeStore::new(window.clone(), &config.theme.storage_key),
        DocumentThemeSurface::new(document.clone(), config.theme.clone()),
    ));
    controller.initialize();
    controller.follow_store();

    let client = Rc::new(FetchPreferenceClient::new(window.clone(), document.clone(), &config.theme));
    let c = controller.clone();
    let switch: Rc<dyn Fn()> = Rc::new(move || {
        let theme = c.toggle();
        let client = client.clone();
        // Local state already applied; the save result is only logged
        wasm_bindgen_futures::spawn_local(async move {
            sync_preference(client.as_ref(), theme).await;
        });
    });

    let mut listeners = Vec::new();
    for button in query_document(document, &config.theme.toggle_selector) {
        let switch = switch.clone();
        listeners.push(EventListener::new(button.as_ref(), "click", move |event: Event| {
            event.prevent_default();
            switch();
        })?);
    }

    listeners.push(EventListener::new(document.as_ref(), "keydown", move |event: Event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let chord = KeyChord {
            key: key.key(),
            ctrl: key.ctrl_key(),
            meta: key.meta_key(),
            shift: key.shift_key(),
        };
        if chord.is_theme_shortcut() {
            event.prevent_default();
            switch();
        }
    })?);

    Ok((controller, listeners))
}
