//! Theme persistence and reflection on the live page.

use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Headers, HtmlDocument, Request, RequestInit, Response, StorageEvent, Window};

use crate::config::{ThemeConfig, ThemeTarget};
use crate::csrf::cookie_value;
use crate::error::{GlueError, Result};
use crate::sync::{PreferenceClient, SaveThemeRequest, SaveThemeResponse};
use crate::theme::{Listeners, Subscription, Theme, ThemeListener, ThemeStore, ThemeSurface};

use super::listener::EventListener;

/// `localStorage`-backed store. Writes from other tabs arrive as `storage`
/// events and are passed to subscribers.
pub struct LocalThemeStore {
    window: Window,
    key: String,
    listeners: Listeners,
    _storage_events: Option<EventListener>,
}

impl LocalThemeStore {
    pub fn new(window: Window, key: &str) -> Self {
        let listeners = Listeners::default();

        let notify = listeners.clone();
        let watched_key = key.to_string();
        let storage_events = EventListener::new(window.as_ref(), "storage", move |event| {
            let Some(event) = event.dyn_ref::<StorageEvent>() else {
                return;
            };
            if event.key().as_deref() != Some(watched_key.as_str()) {
                return;
            }
            if let Some(theme) = event.new_value().as_deref().and_then(Theme::parse) {
                notify.notify(theme);
            }
        })
        .map_err(|e| tracing::debug!("No cross-tab theme sync: {}", e))
        .ok();

        Self {
            window,
            key: key.to_string(),
            listeners,
            _storage_events: storage_events,
        }
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        // Throws in some private-browsing modes
        self.window.local_storage().ok().flatten()
    }
}

impl ThemeStore for LocalThemeStore {
    fn get(&self) -> Option<String> {
        self.storage()?.get_item(&self.key).ok().flatten()
    }

    fn set(&self, theme: Theme) {
        if let Some(storage) = self.storage() {
            if let Err(e) = storage.set_item(&self.key, theme.as_str()) {
                tracing::debug!("Could not persist theme: {:?}", e);
            }
        }
        self.listeners.notify(theme);
    }

    fn subscribe(&self, listener: ThemeListener) -> Subscription {
        self.listeners.add(listener)
    }
}

pub struct DocumentThemeSurface {
    document: Document,
    config: ThemeConfig,
}

impl DocumentThemeSurface {
    pub fn new(document: Document, config: ThemeConfig) -> Self {
        Self { document, config }
    }

    fn target(&self) -> Option<Element> {
        match self.config.target {
            ThemeTarget::Body => self.document.body().map(Into::into),
            ThemeTarget::Root => self.document.document_element(),
        }
    }
}

impl ThemeSurface for DocumentThemeSurface {
    fn applied(&self) -> Option<Theme> {
        self.target()?
            .get_attribute(&self.config.attribute)
            .as_deref()
            .and_then(Theme::parse)
    }

    fn set_applied(&self, theme: Theme) {
        if let Some(target) = self.target() {
            let _ = target.set_attribute(&self.config.attribute, theme.as_str());
        }
    }

    fn server_hint(&self) -> Option<String> {
        self.document
            .body()?
            .get_attribute(&self.config.hint_attribute)
    }

    fn set_indicator(&self, glyph: &str) -> bool {
        match self.document.get_element_by_id(&self.config.icon_id) {
            Some(icon) => {
                icon.set_text_content(Some(glyph));
                true
            }
            None => false,
        }
    }
}

/// Saves the preference through `fetch`
pub struct FetchPreferenceClient {
    window: Window,
    document: Document,
    endpoint: String,
    csrf_cookie: String,
    csrf_header: String,
}

impl FetchPreferenceClient {
    pub fn new(window: Window, document: Document, config: &ThemeConfig) -> Self {
        Self {
            window,
            document,
            endpoint: config.endpoint.clone(),
            csrf_cookie: config.csrf_cookie.clone(),
            csrf_header: config.csrf_header.clone(),
        }
    }

    fn csrf_token(&self) -> Option<String> {
        let cookies = self.document.dyn_ref::<HtmlDocument>()?.cookie().ok()?;
        cookie_value(&cookies, &self.csrf_cookie)
    }
}

#[async_trait(?Send)]
impl PreferenceClient for FetchPreferenceClient {
    async fn save_theme(&self, request: &SaveThemeRequest) -> Result<SaveThemeResponse> {
        let headers = Headers::new()?;
        headers.set("Content-Type", "application/json")?;
        // Absent cookie: send "null" and leave the verdict to the server
        let token = self.csrf_token();
        if token.is_none() {
            tracing::debug!("No {} cookie; sending null CSRF token", self.csrf_cookie);
        }
        headers.set(&self.csrf_header, token.as_deref().unwrap_or("null"))?;

        let body = serde_json::to_string(request)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_headers(&headers);
        opts.set_body(&wasm_bindgen::JsValue::from_str(&body));

        let req = Request::new_with_str_and_init(&self.endpoint, &opts)?;
        let resp_value = JsFuture::from(self.window.fetch_with_request(&req)).await?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| GlueError::Js("fetch did not return a Response".into()))?;

        // The view answers 400 with a JSON body; read it before judging the status
        let json = JsFuture::from(resp.json()?).await;
        match json {
            Ok(value) => serde_wasm_bindgen::from_value(value).map_err(|e| GlueError::Js(e.to_string())),
            Err(_) if !resp.ok() => Err(GlueError::Http {
                status: resp.status(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
