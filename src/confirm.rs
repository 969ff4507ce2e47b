//! Confirmation before destructive navigation.
//!
//! Danger-styled links whose target mentions `delete` ask the user before
//! navigating. Controls inside a `<form>` are left alone: those forms carry
//! their own confirmation step server-side.

/// Blocking browser dialogs (`window.confirm` / `window.alert`)
pub trait Prompt {
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// What to do with the activation event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Allow,
    /// Prevent the default navigation
    Cancel,
}

/// True if a danger-styled control's `href` marks it as a delete action.
/// The match is a plain case-sensitive substring test.
pub fn is_delete_control(href: Option<&str>, marker: &str) -> bool {
    matches!(href, Some(h) if !marker.is_empty() && h.contains(marker))
}

pub struct DeleteGuard {
    message: String,
}

impl DeleteGuard {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn on_activate(&self, inside_form: bool, prompt: &dyn Prompt) -> Activation {
        if inside_form {
            return Activation::Allow;
        }

        if prompt.confirm(&self.message) {
            Activation::Allow
        } else {
            tracing::debug!("Delete action declined");
            Activation::Cancel
        }
    }
}
