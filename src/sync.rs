//! Saving the theme preference to the signed-in user's profile.
//!
//! Fire-and-forget: the page has already applied the theme locally and
//! nothing here can change that. Failures are logged and dropped.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GlueError;
use crate::theme::Theme;

/// Body of `POST /user/save-theme-preference/`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveThemeRequest {
    pub dark_mode: bool,
}

impl From<Theme> for SaveThemeRequest {
    fn from(theme: Theme) -> Self {
        Self {
            dark_mode: theme.is_dark(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveThemeResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[async_trait(?Send)]
pub trait PreferenceClient {
    async fn save_theme(&self, request: &SaveThemeRequest)
        -> Result<SaveThemeResponse, GlueError>;
}

/// How a background save ended. Informational only: no caller acts on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Saved,
    /// Server answered with `success: false`
    Rejected(Option<String>),
    /// Transport, HTTP or decoding failure
    Failed(String),
}

/// Push the theme to the server, logging the result and discarding it.
pub async fn sync_preference<C>(client: &C, theme: Theme) -> SyncOutcome
where
    C: PreferenceClient + ?Sized,
{
    let request = SaveThemeRequest::from(theme);
    match client.save_theme(&request).await {
        Ok(resp) if resp.success => {
            tracing::info!("Theme preference saved ({})", theme);
            SyncOutcome::Saved
        }
        Ok(resp) => {
            tracing::warn!(
                "Server did not save theme preference: {}",
                resp.error.as_deref().unwrap_or("no reason given")
            );
            SyncOutcome::Rejected(resp.error)
        }
        Err(e) => {
            tracing::warn!("Error saving theme preference: {}", e);
            SyncOutcome::Failed(e.to_string())
        }
    }
}
