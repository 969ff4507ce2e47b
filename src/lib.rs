//! Page Glue - Rust/WASM presentation layer
//!
//! Client-side behaviour attached to every page rendered by the mess
//! management portal.
//!
//! This library provides:
//! - Auto-dismissing alert banners
//! - Delete confirmation prompts
//! - Required-field form validation
//! - Mobile navigation menu toggle
//! - Smooth scrolling for in-page anchors
//! - Light/dark theme switching, persisted locally and to the server
//!
//! Every decision lives in platform-agnostic modules that build and test on
//! the host. The `web` module (wasm32 only) binds them to the DOM.

pub mod alerts;
pub mod config;
pub mod confirm;
pub mod csrf;
pub mod error;
pub mod keyboard;
pub mod logging;
pub mod menu;
pub mod scroll;
pub mod sync;
pub mod theme;
pub mod timer;
pub mod validation;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::Config;
pub use error::GlueError;
pub use theme::{Theme, ThemeController};
