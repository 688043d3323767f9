//! PikPak cloud storage implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::PikPakConfig;
use crate::metrics::CLOUD_CALLS_TOTAL;

use super::{
    CloudClient, CloudError, CloudFile, CloudTask, FileKind, ResolvedDownload, TaskPhase,
    TransferReceipt, UserProfile,
};

/// PikPak client implementation.
///
/// The session lives in the reqwest cookie jar; an expired session is
/// recovered by a single re-login followed by one retry of the request.
pub struct PikPakClient {
    client: Client,
    config: PikPakConfig,
    /// Marker for whether a login has succeeded (cookies do the real work).
    session: Arc<RwLock<Option<String>>>,
}

impl PikPakClient {
    /// Create a new PikPak client.
    pub fn new(config: PikPakConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Login and store the session cookie.
    pub async fn login(&self) -> Result<(), CloudError> {
        let url = format!("{}/v1/auth/signin", self.base_url());

        let body = json!({
            "username": self.config.username,
            "password": self.config.password,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CloudError::Timeout
                } else {
                    CloudError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status.is_success() {
            debug!("PikPak login successful");
            let mut session = self.session.write().await;
            *session = Some("authenticated".to_string());
            Ok(())
        } else {
            Err(CloudError::Auth(extract_error_message(
                status.as_u16(),
                &text,
            )))
        }
    }

    /// Ensure we have a valid session, logging in if needed.
    async fn ensure_authenticated(&self) -> Result<(), CloudError> {
        let session = self.session.read().await;
        if session.is_some() {
            return Ok(());
        }
        drop(session);
        self.login().await
    }

    /// Send one request without retry handling.
    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, CloudError> {
        let url = format!("{}{}", self.base_url(), path);
        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                CloudError::Timeout
            } else {
                CloudError::ConnectionFailed(e.to_string())
            }
        })
    }

    /// Shared request helper: serializes an optional JSON body, attaches the
    /// session, re-authenticates once on 401/403, and unwraps the server's
    /// `error` field from failure bodies.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, CloudError> {
        self.ensure_authenticated().await?;

        let mut response = self.send_once(&method, path, body).await?;

        if response.status() == StatusCode::UNAUTHORIZED
            || response.status() == StatusCode::FORBIDDEN
        {
            warn!("PikPak session expired, re-authenticating");
            {
                let mut session = self.session.write().await;
                *session = None;
            }
            self.login().await?;
            response = self.send_once(&method, path, body).await?;
        }

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CloudError::ConnectionFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(CloudError::Api {
                status: status.as_u16(),
                message: extract_error_message(status.as_u16(), &text),
            });
        }

        serde_json::from_str(&text).map_err(|e| CloudError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CloudClient for PikPakClient {
    fn name(&self) -> &str {
        "pikpak"
    }

    async fn get_user(&self) -> Result<UserProfile, CloudError> {
        CLOUD_CALLS_TOTAL.with_label_values(&["get_user"]).inc();
        let user: PikPakUser = self.request(Method::GET, "/v1/user/me", None).await?;
        Ok(UserProfile {
            username: user.username.unwrap_or_default(),
            user_id: user.user_id.unwrap_or_default(),
        })
    }

    async fn add_download(
        &self,
        url: &str,
        name: Option<&str>,
    ) -> Result<TransferReceipt, CloudError> {
        CLOUD_CALLS_TOTAL.with_label_values(&["add_download"]).inc();

        let mut body = json!({
            "kind": "drive#file",
            "upload_type": "UPLOAD_TYPE_URL",
            "url": { "url": url },
        });
        if let Some(name) = name {
            body["name"] = json!(name);
        }

        let ack: PikPakAddResponse = self
            .request(Method::POST, "/drive/v1/files", Some(&body))
            .await?;

        Ok(TransferReceipt {
            task: ack.task.map(|t| task_to_model(t, &mut 0)),
        })
    }

    async fn get_tasks(&self) -> Result<Vec<CloudTask>, CloudError> {
        CLOUD_CALLS_TOTAL.with_label_values(&["get_tasks"]).inc();

        let response: PikPakTasksResponse = self
            .request(Method::GET, "/drive/v1/tasks?type=offline", None)
            .await?;

        let mut unknown_phases = 0u32;
        let tasks = response
            .tasks
            .into_iter()
            .map(|t| task_to_model(t, &mut unknown_phases))
            .collect();

        if unknown_phases > 0 {
            warn!(
                count = unknown_phases,
                "Task snapshot contained unrecognized phases, mapped to \"other\""
            );
        }

        Ok(tasks)
    }

    async fn get_files(&self, parent_id: Option<&str>) -> Result<Vec<CloudFile>, CloudError> {
        CLOUD_CALLS_TOTAL.with_label_values(&["get_files"]).inc();

        let path = match parent_id {
            Some(id) => format!(
                "/drive/v1/files?parent_id={}",
                urlencoding::encode(id)
            ),
            None => "/drive/v1/files".to_string(),
        };

        let response: PikPakFilesResponse = self.request(Method::GET, &path, None).await?;

        Ok(response.files.into_iter().map(file_to_model).collect())
    }

    async fn download_url(&self, file_id: &str) -> Result<ResolvedDownload, CloudError> {
        CLOUD_CALLS_TOTAL.with_label_values(&["download_url"]).inc();

        let path = format!("/drive/v1/files/{}", urlencoding::encode(file_id));
        let detail: PikPakFileDetail = self.request(Method::GET, &path, None).await?;

        let url = detail
            .web_content_link
            .filter(|u| !u.is_empty())
            .or_else(|| {
                detail
                    .medias
                    .into_iter()
                    .find_map(|m| m.link.map(|l| l.url))
            })
            .ok_or_else(|| CloudError::Api {
                status: 404,
                message: "File URL not found".to_string(),
            })?;

        Ok(ResolvedDownload {
            name: detail.name.unwrap_or_else(|| "download".to_string()),
            url,
        })
    }
}

/// Pull the server-supplied `error` field out of a failure body, falling
/// back to a generic message. Callers surface this string verbatim.
fn extract_error_message(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(error) = parsed.error {
            if !error.is_empty() {
                return error;
            }
        }
    }

    format!("Cloud error: {}", status)
}

/// Parse a PikPak phase string to a TaskPhase, counting unknowns.
fn parse_phase(phase: &str, unknown: &mut u32) -> TaskPhase {
    match phase {
        "PHASE_TYPE_RUNNING" | "PHASE_TYPE_PENDING" => TaskPhase::Running,
        "PHASE_TYPE_COMPLETE" => TaskPhase::Complete,
        "PHASE_TYPE_ERROR" => TaskPhase::Error,
        _ => {
            *unknown += 1;
            TaskPhase::Other
        }
    }
}

/// Parse a PikPak `kind` string.
fn parse_kind(kind: &str) -> FileKind {
    if kind == "drive#folder" {
        FileKind::Folder
    } else {
        FileKind::File
    }
}

/// PikPak serializes sizes as decimal strings.
fn parse_size(size: Option<&str>) -> Option<u64> {
    size.and_then(|s| s.parse::<u64>().ok())
}

fn parse_created(time: Option<&str>) -> Option<DateTime<Utc>> {
    time.and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn task_to_model(task: PikPakTask, unknown: &mut u32) -> CloudTask {
    CloudTask {
        id: task.id,
        name: task.name.unwrap_or_default(),
        phase: task
            .phase
            .as_deref()
            .map(|p| parse_phase(p, unknown))
            .unwrap_or(TaskPhase::Other),
        progress: task.progress.unwrap_or(0).clamp(0, 100) as u8,
        file_size: parse_size(task.file_size.as_deref()),
    }
}

fn file_to_model(file: PikPakFile) -> CloudFile {
    CloudFile {
        id: file.id,
        kind: file
            .kind
            .as_deref()
            .map(parse_kind)
            .unwrap_or(FileKind::File),
        name: file.name.unwrap_or_default(),
        size: parse_size(file.size.as_deref()).unwrap_or(0),
        created_at: parse_created(file.created_time.as_deref()),
    }
}

// PikPak API response types
#[derive(Debug, Deserialize)]
struct PikPakUser {
    #[serde(alias = "name")]
    username: Option<String>,
    #[serde(alias = "sub")]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PikPakTasksResponse {
    #[serde(default)]
    tasks: Vec<PikPakTask>,
}

#[derive(Debug, Deserialize)]
struct PikPakTask {
    id: String,
    name: Option<String>,
    phase: Option<String>,
    progress: Option<i64>,
    file_size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PikPakFilesResponse {
    #[serde(default)]
    files: Vec<PikPakFile>,
}

#[derive(Debug, Deserialize)]
struct PikPakFile {
    id: String,
    kind: Option<String>,
    name: Option<String>,
    size: Option<String>,
    created_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PikPakAddResponse {
    task: Option<PikPakTask>,
}

#[derive(Debug, Deserialize)]
struct PikPakFileDetail {
    name: Option<String>,
    web_content_link: Option<String>,
    #[serde(default)]
    medias: Vec<PikPakMedia>,
}

#[derive(Debug, Deserialize)]
struct PikPakMedia {
    link: Option<PikPakMediaLink>,
}

#[derive(Debug, Deserialize)]
struct PikPakMediaLink {
    url: String,
}
