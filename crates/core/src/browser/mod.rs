//! Cloud file browser navigation.
//!
//! Navigation is a breadcrumb stack of {id, name} pairs, not a persisted
//! tree: entering a folder pushes, going up pops and re-fetches, and the
//! empty stack means the account root. Selecting a non-folder entry is not
//! a navigation transition; callers resolve it to a direct download link.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::cloud::{CloudClient, CloudError, CloudFile};

/// One level of the navigation path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Breadcrumb {
    pub id: String,
    pub name: String,
}

/// Breadcrumb-stack navigator over a cloud client.
pub struct FileBrowser {
    cloud: Arc<dyn CloudClient>,
    path: RwLock<Vec<Breadcrumb>>,
}

impl FileBrowser {
    /// Create a browser positioned at the root.
    pub fn new(cloud: Arc<dyn CloudClient>) -> Self {
        Self {
            cloud,
            path: RwLock::new(Vec::new()),
        }
    }

    /// Current breadcrumb stack, root-first.
    pub async fn path(&self) -> Vec<Breadcrumb> {
        self.path.read().await.clone()
    }

    /// List the folder the browser is currently in.
    pub async fn list_current(&self) -> Result<Vec<CloudFile>, CloudError> {
        let parent = {
            let path = self.path.read().await;
            path.last().map(|crumb| crumb.id.clone())
        };
        self.cloud.get_files(parent.as_deref()).await
    }

    /// Navigate into a folder: fetch its children, then push the crumb.
    ///
    /// Fetch-before-push keeps the stack unchanged when the fetch fails.
    pub async fn enter(
        &self,
        folder_id: &str,
        name: &str,
    ) -> Result<Vec<CloudFile>, CloudError> {
        let files = self.cloud.get_files(Some(folder_id)).await?;
        let mut path = self.path.write().await;
        path.push(Breadcrumb {
            id: folder_id.to_string(),
            name: name.to_string(),
        });
        Ok(files)
    }

    /// Navigate up one level and re-fetch.
    ///
    /// From depth 1 this returns to the root: an empty stack, never a
    /// dangling crumb with an undefined parent.
    pub async fn up(&self) -> Result<Vec<CloudFile>, CloudError> {
        let parent = {
            let mut path = self.path.write().await;
            path.pop();
            path.last().map(|crumb| crumb.id.clone())
        };
        self.cloud.get_files(parent.as_deref()).await
    }

    /// Clear the stack and fetch the root listing.
    pub async fn to_root(&self) -> Result<Vec<CloudFile>, CloudError> {
        {
            let mut path = self.path.write().await;
            path.clear();
        }
        self.cloud.get_files(None).await
    }
}
