use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use magnetcloud_core::{
    CloudClient, Config, FileBrowser, SanitizedConfig, SearchSession, Searcher, TransferMonitor,
};

use crate::api::cooldown::CooldownTracker;

/// Shared application state
pub struct AppState {
    config: Config,
    searcher: Option<Arc<dyn Searcher>>,
    cloud: Option<Arc<dyn CloudClient>>,
    session: RwLock<SearchSession>,
    monitor: Option<Arc<TransferMonitor>>,
    browser: Option<Arc<FileBrowser>>,
    download_cooldown: CooldownTracker,
}

impl AppState {
    pub fn new(
        config: Config,
        searcher: Option<Arc<dyn Searcher>>,
        cloud: Option<Arc<dyn CloudClient>>,
    ) -> Self {
        let monitor = cloud.as_ref().map(|c| {
            Arc::new(TransferMonitor::new(
                Arc::clone(c),
                Duration::from_millis(config.monitor.poll_interval_ms),
            ))
        });
        let browser = cloud
            .as_ref()
            .map(|c| Arc::new(FileBrowser::new(Arc::clone(c))));
        let download_cooldown =
            CooldownTracker::new(Duration::from_secs(config.limits.download_cooldown_secs));

        Self {
            config,
            searcher,
            cloud,
            session: RwLock::new(SearchSession::new()),
            monitor,
            browser,
            download_cooldown,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn searcher(&self) -> Option<&Arc<dyn Searcher>> {
        self.searcher.as_ref()
    }

    pub fn cloud(&self) -> Option<&Arc<dyn CloudClient>> {
        self.cloud.as_ref()
    }

    pub fn session(&self) -> &RwLock<SearchSession> {
        &self.session
    }

    pub fn monitor(&self) -> Option<&Arc<TransferMonitor>> {
        self.monitor.as_ref()
    }

    pub fn browser(&self) -> Option<&Arc<FileBrowser>> {
        self.browser.as_ref()
    }

    pub fn download_cooldown(&self) -> &CooldownTracker {
        &self.download_cooldown
    }

    pub fn static_dir(&self) -> &std::path::Path {
        &self.config.static_dir
    }
}
