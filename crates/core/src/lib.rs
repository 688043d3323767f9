pub mod browser;
pub mod cloud;
pub mod config;
pub mod metrics;
pub mod monitor;
pub mod ranking;
pub mod searcher;
pub mod testing;

pub use browser::{Breadcrumb, FileBrowser};
pub use cloud::{
    CloudClient, CloudError, CloudFile, CloudTask, FileKind, PikPakClient, ResolvedDownload,
    TaskPhase, TransferReceipt, UserProfile,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CloudBackend, Config, ConfigError,
    JackettConfig, LimitsConfig, MonitorConfig, PikPakConfig, SanitizedConfig, SearchBackend,
    SearchConfig, ServerConfig,
};
pub use monitor::TransferMonitor;
pub use ranking::{
    paginate, sort_results, PageState, PageView, SearchSession, SessionEvent, SortDirection,
    SortField, SortState, PAGE_SIZE,
};
pub use searcher::{JackettSearcher, SearchError, SearchQuery, Searcher, TorrentResult};
