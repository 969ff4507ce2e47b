//! Theme management with localStorage persistence.
//!
//! The persisted entry is the source of truth across reloads; the server's
//! per-user hint on `<body>` only seeds it when nothing is stored yet.

use std::cell::RefCell;
use std::rc::Rc;

/// Theme options
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Strict parse; anything but `light`/`dark` is `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Indicator glyph: moon for dark, sun for light
    pub fn glyph(&self) -> &'static str {
        match self {
            Theme::Light => "\u{2600}\u{FE0F}",
            Theme::Dark => "\u{1F319}",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// Server hint: dark only for the exact string `"true"`
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint {
            Some("true") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Theme that a toggle moves to from whatever is currently applied.
    /// Only an applied `dark` goes to light; anything else goes to dark.
    pub fn toggled_from(applied: Option<Theme>) -> Self {
        match applied {
            Some(Theme::Dark) => Theme::Light,
            _ => Theme::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Theme resolved on load from the stored entry and the server hint.
///
/// An empty stored value counts as absent. Any other unrecognised value
/// counts as present and resolves to light.
pub fn resolve(stored: Option<&str>, hint: Option<&str>) -> Theme {
    match stored.filter(|value| !value.is_empty()) {
        Some(value) => Theme::parse(value).unwrap_or(Theme::Light),
        None => Theme::from_hint(hint),
    }
}

/// Dropping the subscription unregisters the listener
#[must_use = "dropping a Subscription unsubscribes"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

pub type ThemeListener = Rc<dyn Fn(Theme)>;

/// Persistent theme entry
pub trait ThemeStore {
    /// Raw stored value, if any
    fn get(&self) -> Option<String>;
    fn set(&self, theme: Theme);
    /// Called with every theme written to the store, including writes from
    /// other tabs where the backend supports it.
    fn subscribe(&self, listener: ThemeListener) -> Subscription;
}

/// Listener registry shared by store implementations
#[derive(Clone, Default)]
pub struct Listeners {
    inner: Rc<RefCell<Vec<(u64, ThemeListener)>>>,
    next_id: Rc<RefCell<u64>>,
}

impl Listeners {
    pub fn add(&self, listener: ThemeListener) -> Subscription {
        let id = {
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            *next
        };
        self.inner.borrow_mut().push((id, listener));

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                if let Ok(mut inner) = inner.try_borrow_mut() {
                    inner.retain(|(i, _)| *i != id);
                }
            }
        })
    }

    pub fn notify(&self, theme: Theme) {
        // Snapshot so a listener may subscribe or unsubscribe while notified
        let snapshot: Vec<ThemeListener> =
            self.inner.borrow().iter().map(|(_, l)| l.clone()).collect();
        for listener in snapshot {
            listener(theme);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store for hosts without Web Storage
#[derive(Clone, Default)]
pub struct MemoryThemeStore {
    value: Rc<RefCell<Option<String>>>,
    listeners: Listeners,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        let store = Self::default();
        *store.value.borrow_mut() = Some(value.to_string());
        store
    }

    pub fn subscribers(&self) -> usize {
        self.listeners.len()
    }
}

impl ThemeStore for MemoryThemeStore {
    fn get(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    fn set(&self, theme: Theme) {
        *self.value.borrow_mut() = Some(theme.as_str().to_string());
        self.listeners.notify(theme);
    }

    fn subscribe(&self, listener: ThemeListener) -> Subscription {
        self.listeners.add(listener)
    }
}

/// The page elements the theme is reflected on
pub trait ThemeSurface {
    /// Currently applied theme attribute; `None` if unset or unrecognised
    fn applied(&self) -> Option<Theme>;
    fn set_applied(&self, theme: Theme);
    /// Raw server hint attribute
    fn server_hint(&self) -> Option<String>;
    /// Update the indicator glyph. Returns false when the page has no
    /// indicator element.
    fn set_indicator(&self, glyph: &str) -> bool;
}

impl<T: ThemeSurface + ?Sized> ThemeSurface for Rc<T> {
    fn applied(&self) -> Option<Theme> {
        (**self).applied()
    }

    fn set_applied(&self, theme: Theme) {
        (**self).set_applied(theme)
    }

    fn server_hint(&self) -> Option<String> {
        (**self).server_hint()
    }

    fn set_indicator(&self, glyph: &str) -> bool {
        (**self).set_indicator(glyph)
    }
}

pub struct ThemeController<S: ThemeStore, V: ThemeSurface> {
    store: S,
    surface: Rc<V>,
    following: RefCell<Option<Subscription>>,
}

impl<S: ThemeStore, V: ThemeSurface + 'static> ThemeController<S, V> {
    pub fn new(store: S, surface: V) -> Self {
        Self {
            store,
            surface: Rc::new(surface),
            following: RefCell::new(None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    /// Resolve the theme for this page load and apply it
    pub fn initialize(&self) -> Theme {
        let stored = self.store.get().filter(|value| !value.is_empty());
        let hint = if stored.is_none() {
            self.surface.server_hint()
        } else {
            None
        };
        let theme = resolve(stored.as_deref(), hint.as_deref());
        tracing::debug!(
            "Initial theme {} (stored: {:?}, hint: {:?})",
            theme,
            stored,
            hint
        );
        self.apply(theme);
        theme
    }

    /// Reflect the theme on the page and persist it
    pub fn apply(&self, theme: Theme) {
        reflect(self.surface.as_ref(), theme);
        self.store.set(theme);
    }

    /// Flip the applied theme. Returns the new theme for the caller to sync
    /// to the server.
    pub fn toggle(&self) -> Theme {
        let theme = Theme::toggled_from(self.surface.applied());
        self.apply(theme);
        tracing::info!("Theme switched to {}", theme);
        theme
    }

    /// Keep the page in step with writes to the store made elsewhere
    /// (another tab). Only the page is updated; the store already holds the
    /// value.
    pub fn follow_store(&self) {
        let surface = Rc::clone(&self.surface);
        let subscription = self.store.subscribe(Rc::new(move |theme: Theme| {
            if surface.applied() != Some(theme) {
                tracing::debug!("Theme changed elsewhere: {}", theme);
                reflect(surface.as_ref(), theme);
            }
        }));
        *self.following.borrow_mut() = Some(subscription);
    }
}

fn reflect<V: ThemeSurface + ?Sized>(surface: &V, theme: Theme) {
    surface.set_applied(theme);
    if !surface.set_indicator(theme.glyph()) {
        tracing::trace!("No theme indicator on page");
    }
}
