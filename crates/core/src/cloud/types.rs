//! Types for the cloud storage system.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a cloud transfer task.
///
/// Closed enum: phases the server reports that we don't recognize map to
/// `Other` (and get logged) rather than passing through untyped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskPhase {
    Running,
    Complete,
    Error,
    Other,
}

/// An offline-download task on the cloud account.
///
/// Task lists are replaced wholesale on every refresh; there is no
/// client-side merge or diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudTask {
    pub id: String,
    pub name: String,
    pub phase: TaskPhase,
    /// Percent progress, 0-100.
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// Kind of a cloud file entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    File,
    Folder,
}

/// A file or folder on the cloud account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudFile {
    pub id: String,
    pub kind: FileKind,
    pub name: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CloudFile {
    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }
}

/// The authenticated cloud account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub user_id: String,
}

/// Acknowledgement for a submitted offline download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// The created task, when the server reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<CloudTask>,
}

/// A resolved direct-download link for a cloud file.
#[derive(Debug, Clone)]
pub struct ResolvedDownload {
    pub name: String,
    pub url: String,
}

/// Errors that can occur against the cloud service.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse cloud response: {0}")]
    Parse(String),

    #[error("Cloud connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for session-authenticated cloud storage backends.
#[async_trait]
pub trait CloudClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fetch the authenticated user's profile.
    async fn get_user(&self) -> Result<UserProfile, CloudError>;

    /// Submit a URL (typically a magnet link) for offline download.
    async fn add_download(
        &self,
        url: &str,
        name: Option<&str>,
    ) -> Result<TransferReceipt, CloudError>;

    /// List offline-download tasks.
    async fn get_tasks(&self) -> Result<Vec<CloudTask>, CloudError>;

    /// List files under a folder (root when `parent_id` is `None`).
    async fn get_files(&self, parent_id: Option<&str>) -> Result<Vec<CloudFile>, CloudError>;

    /// Resolve a direct download link for a file.
    async fn download_url(&self, file_id: &str) -> Result<ResolvedDownload, CloudError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_server_message_verbatim() {
        let err = CloudError::Api {
            status: 500,
            message: "task limit reached".to_string(),
        };
        assert_eq!(err.to_string(), "task limit reached");
    }

    #[test]
    fn test_cloud_task_serialization() {
        let task = CloudTask {
            id: "t1".to_string(),
            name: "Big Buck Bunny".to_string(),
            phase: TaskPhase::Running,
            progress: 42,
            file_size: Some(1024),
        };

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"running\""));

        let parsed: CloudTask = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.progress, 42);
        assert_eq!(parsed.phase, TaskPhase::Running);
    }

    #[test]
    fn test_cloud_file_is_folder() {
        let folder = CloudFile {
            id: "f1".to_string(),
            kind: FileKind::Folder,
            name: "Movies".to_string(),
            size: 0,
            created_at: None,
        };
        assert!(folder.is_folder());

        let file = CloudFile {
            kind: FileKind::File,
            ..folder
        };
        assert!(!file.is_folder());
    }
}
