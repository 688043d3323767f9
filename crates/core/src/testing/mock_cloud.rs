//! Mock cloud client for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cloud::{
    CloudClient, CloudError, CloudFile, CloudTask, ResolvedDownload, TaskPhase, TransferReceipt,
    UserProfile,
};

type ErrorFactory = Box<dyn Fn() -> CloudError + Send + Sync>;

/// Mock implementation of the CloudClient trait.
///
/// Provides controllable behavior for testing:
/// - Scripted user profile, task list, and per-folder file listings
/// - One-shot and persistent scripted errors
/// - Recorded calls for assertions (task polls, file listings, downloads)
pub struct MockCloudClient {
    profile: Arc<RwLock<Option<UserProfile>>>,
    tasks: Arc<RwLock<Vec<CloudTask>>>,
    /// Folder listings keyed by parent id (`None` = root).
    files: Arc<RwLock<HashMap<Option<String>, Vec<CloudFile>>>>,
    download: Arc<RwLock<Option<ResolvedDownload>>>,
    next_error: Arc<RwLock<Option<CloudError>>>,
    persistent_error: Arc<RwLock<Option<ErrorFactory>>>,
    get_tasks_calls: AtomicUsize,
    file_listings: Arc<RwLock<Vec<Option<String>>>>,
    downloads_added: Arc<RwLock<Vec<(String, Option<String>)>>>,
}

impl Default for MockCloudClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCloudClient {
    /// Create a new mock with an authenticated default profile.
    pub fn new() -> Self {
        Self {
            profile: Arc::new(RwLock::new(Some(UserProfile {
                username: "mock-user".to_string(),
                user_id: "mock-id".to_string(),
            }))),
            tasks: Arc::new(RwLock::new(Vec::new())),
            files: Arc::new(RwLock::new(HashMap::new())),
            download: Arc::new(RwLock::new(None)),
            next_error: Arc::new(RwLock::new(None)),
            persistent_error: Arc::new(RwLock::new(None)),
            get_tasks_calls: AtomicUsize::new(0),
            file_listings: Arc::new(RwLock::new(Vec::new())),
            downloads_added: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn set_profile(&self, profile: Option<UserProfile>) {
        *self.profile.write().await = profile;
    }

    pub async fn set_tasks(&self, tasks: Vec<CloudTask>) {
        *self.tasks.write().await = tasks;
    }

    pub async fn set_files(&self, parent_id: Option<&str>, files: Vec<CloudFile>) {
        self.files
            .write()
            .await
            .insert(parent_id.map(|s| s.to_string()), files);
    }

    pub async fn set_download(&self, download: ResolvedDownload) {
        *self.download.write().await = Some(download);
    }

    /// Fail the next call with the given error (consumed on use).
    pub async fn set_next_error(&self, error: CloudError) {
        *self.next_error.write().await = Some(error);
    }

    /// Fail every call with a freshly built error until cleared.
    pub async fn set_persistent_error<F>(&self, factory: F)
    where
        F: Fn() -> CloudError + Send + Sync + 'static,
    {
        *self.persistent_error.write().await = Some(Box::new(factory));
    }

    pub async fn clear_persistent_error(&self) {
        *self.persistent_error.write().await = None;
    }

    /// Number of get_tasks calls so far.
    pub fn get_tasks_calls(&self) -> usize {
        self.get_tasks_calls.load(Ordering::SeqCst)
    }

    /// Parent ids passed to get_files, in call order.
    pub async fn recorded_file_listings(&self) -> Vec<Option<String>> {
        self.file_listings.read().await.clone()
    }

    /// (url, name) pairs passed to add_download, in call order.
    pub async fn recorded_downloads(&self) -> Vec<(String, Option<String>)> {
        self.downloads_added.read().await.clone()
    }

    async fn scripted_error(&self) -> Option<CloudError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Some(error);
        }
        self.persistent_error.read().await.as_ref().map(|f| f())
    }
}

#[async_trait]
impl CloudClient for MockCloudClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_user(&self) -> Result<UserProfile, CloudError> {
        if let Some(error) = self.scripted_error().await {
            return Err(error);
        }
        self.profile
            .read()
            .await
            .clone()
            .ok_or_else(|| CloudError::Auth("Session expired".to_string()))
    }

    async fn add_download(
        &self,
        url: &str,
        name: Option<&str>,
    ) -> Result<TransferReceipt, CloudError> {
        if let Some(error) = self.scripted_error().await {
            return Err(error);
        }

        self.downloads_added
            .write()
            .await
            .push((url.to_string(), name.map(|s| s.to_string())));

        Ok(TransferReceipt {
            task: Some(CloudTask {
                id: format!("task-{}", self.downloads_added.read().await.len()),
                name: name.unwrap_or(url).to_string(),
                phase: TaskPhase::Running,
                progress: 0,
                file_size: None,
            }),
        })
    }

    async fn get_tasks(&self) -> Result<Vec<CloudTask>, CloudError> {
        self.get_tasks_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.scripted_error().await {
            return Err(error);
        }
        Ok(self.tasks.read().await.clone())
    }

    async fn get_files(&self, parent_id: Option<&str>) -> Result<Vec<CloudFile>, CloudError> {
        if let Some(error) = self.scripted_error().await {
            return Err(error);
        }

        self.file_listings
            .write()
            .await
            .push(parent_id.map(|s| s.to_string()));

        Ok(self
            .files
            .read()
            .await
            .get(&parent_id.map(|s| s.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn download_url(&self, _file_id: &str) -> Result<ResolvedDownload, CloudError> {
        if let Some(error) = self.scripted_error().await {
            return Err(error);
        }
        self.download
            .read()
            .await
            .clone()
            .ok_or_else(|| CloudError::Api {
                status: 404,
                message: "File URL not found".to_string(),
            })
    }
}
