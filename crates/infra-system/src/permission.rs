// File-backed notification permission
// The file stands in for the OS permission record: editing it is "changing settings".

use carcare_core::domain::AuthorizationState;
use carcare_core::port::DispatchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How the permission prompt is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptAnswer {
    Grant,
    Deny,
}

impl std::str::FromStr for PromptAnswer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grant" => Ok(PromptAnswer::Grant),
            "deny" => Ok(PromptAnswer::Deny),
            other => Err(format!("unknown prompt answer: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PermissionFile {
    state: AuthorizationState,
    updated_at: DateTime<Utc>,
}

/// Permission state persisted as JSON. A missing file means `NotDetermined`.
pub struct PermissionStore {
    path: PathBuf,
    answer: PromptAnswer,
}

impl PermissionStore {
    pub fn new(path: impl Into<PathBuf>, answer: PromptAnswer) -> Self {
        Self {
            path: path.into(),
            answer,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Result<AuthorizationState, DispatchError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(AuthorizationState::NotDetermined)
            }
            Err(e) => return Err(DispatchError::Unavailable(e.to_string())),
        };

        let file: PermissionFile = serde_json::from_str(&raw).map_err(|e| {
            DispatchError::Unavailable(format!(
                "corrupt permission file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        debug!(state = %file.state, "Permission read");
        Ok(file.state)
    }

    pub async fn write(&self, state: AuthorizationState) -> Result<(), DispatchError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DispatchError::Unavailable(e.to_string()))?;
        }

        let file = PermissionFile {
            state,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| DispatchError::Unavailable(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| DispatchError::Unavailable(e.to_string()))?;
        Ok(())
    }

    /// Answer the prompt with the configured policy and persist the result
    pub async fn prompt(&self) -> Result<bool, DispatchError> {
        let granted = self.answer == PromptAnswer::Grant;
        let state = if granted {
            AuthorizationState::Authorized
        } else {
            AuthorizationState::Denied
        };
        self.write(state).await?;
        info!(path = %self.path.display(), granted, "Permission prompt answered");
        Ok(granted)
    }
}
