//! Configuration management
//!
//! Every selector, attribute name, delay and endpoint the page scripts depend
//! on. Pages may override any subset by embedding a JSON document in
//! `<script type="application/json" id="page-glue-config">`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::error::GlueError;

/// Element id of the optional inline configuration blob
pub const CONFIG_ELEMENT_ID: &str = "page-glue-config";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub alerts: AlertConfig,
    pub confirm: ConfirmConfig,
    pub forms: FormConfig,
    pub menu: MenuConfig,
    pub scroll: ScrollConfig,
    pub theme: ThemeConfig,
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertConfig {
    pub selector: String,
    pub fade_delay_ms: u32,
    pub remove_delay_ms: u32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            selector: ".alert".to_string(),
            fade_delay_ms: 5000,
            remove_delay_ms: 300,
        }
    }
}

impl AlertConfig {
    pub fn fade_delay(&self) -> Duration {
        Duration::from_millis(self.fade_delay_ms.into())
    }

    pub fn remove_delay(&self) -> Duration {
        Duration::from_millis(self.remove_delay_ms.into())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfirmConfig {
    /// Danger-styled controls; narrowed further by `href_marker`
    pub selector: String,
    pub href_marker: String,
    pub message: String,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            selector: ".btn-danger".to_string(),
            href_marker: "delete".to_string(),
            message: "Are you sure you want to proceed with this action?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormConfig {
    pub required_selector: String,
    pub invalid_border: String,
    pub valid_border: String,
    pub message: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            required_selector: "[required]".to_string(),
            invalid_border: "var(--danger)".to_string(),
            valid_border: "var(--border)".to_string(),
            message: "Please fill in all required fields".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MenuConfig {
    pub toggle_id: String,
    pub panel_id: String,
    pub link_selector: String,
    pub active_class: String,
    pub link_close_delay_ms: u32,
    pub resize_debounce_ms: u32,
    /// Viewport width (CSS px) at which the desktop layout takes over
    pub desktop_min_width: f64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            toggle_id: "mobileMenuToggle".to_string(),
            panel_id: "navMenu".to_string(),
            link_selector: ".nav-link".to_string(),
            active_class: "active".to_string(),
            link_close_delay_ms: 100,
            resize_debounce_ms: 250,
            desktop_min_width: 1024.0,
        }
    }
}

impl MenuConfig {
    pub fn link_close_delay(&self) -> Duration {
        Duration::from_millis(self.link_close_delay_ms.into())
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms.into())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
    pub anchor_selector: String,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            anchor_selector: "a[href^=\"#\"]".to_string(),
        }
    }
}

/// Which element carries the applied theme attribute
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeTarget {
    /// `<body>`, where the portal stylesheet looks for `data-theme`
    #[default]
    Body,
    /// `<html>`
    Root,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub attribute: String,
    pub target: ThemeTarget,
    /// Body attribute carrying the signed-in user's saved preference
    pub hint_attribute: String,
    pub toggle_selector: String,
    pub icon_id: String,
    pub endpoint: String,
    pub csrf_cookie: String,
    pub csrf_header: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
            attribute: "data-theme".to_string(),
            target: ThemeTarget::Body,
            hint_attribute: "data-user-dark-mode".to_string(),
            toggle_selector: ".theme-toggle".to_string(),
            icon_id: "theme-icon".to_string(),
            endpoint: "/user/save-theme-preference/".to_string(),
            csrf_cookie: "csrftoken".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "page_glue=info".to_string(),
        }
    }
}

/// Build the configuration from the optional inline JSON blob.
///
/// A missing or blank blob yields the defaults. A partial document only
/// overrides the fields it names.
pub fn load_config(raw: Option<&str>) -> Result<Config> {
    let config = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Config::default(),
        Some(json) => serde_json::from_str::<Config>(json)
            .with_context(|| format!("failed to parse #{} JSON", CONFIG_ELEMENT_ID))?,
    };

    config.validate().context("configuration rejected")?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), GlueError> {
        let required = [
            ("alerts.selector", &self.alerts.selector),
            ("confirm.selector", &self.confirm.selector),
            ("confirm.href_marker", &self.confirm.href_marker),
            ("forms.required_selector", &self.forms.required_selector),
            ("menu.toggle_id", &self.menu.toggle_id),
            ("menu.panel_id", &self.menu.panel_id),
            ("menu.active_class", &self.menu.active_class),
            ("scroll.anchor_selector", &self.scroll.anchor_selector),
            ("theme.storage_key", &self.theme.storage_key),
            ("theme.attribute", &self.theme.attribute),
            ("theme.hint_attribute", &self.theme.hint_attribute),
            ("theme.toggle_selector", &self.theme.toggle_selector),
            ("theme.csrf_header", &self.theme.csrf_header),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(GlueError::Config(format!("{} must not be empty", name)));
        }

        if !self.theme.endpoint.starts_with('/') {
            return Err(GlueError::Config(format!(
                "theme.endpoint must be a same-origin path, got {:?}",
                self.theme.endpoint
            )));
        }

        if !self.menu.desktop_min_width.is_finite() || self.menu.desktop_min_width <= 0.0 {
            return Err(GlueError::Config(
                "menu.desktop_min_width must be a positive width".to_string(),
            ));
        }

        Ok(())
    }
}
