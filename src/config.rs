use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/kv-store.sock";
pub const DEFAULT_DATA_PATH: &str = "./data/kv-store.json";
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;
pub const DEFAULT_SCAN_BATCH: usize = 100;

/// Where the key-value data actually lives.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    /// A JSON file on local disk.
    File { path: PathBuf },
    /// A Redis (or Valkey) server reachable over TCP.
    Redis { host: String, port: u16 },
}

impl BackendConfig {
    pub fn redis_url(host: &str, port: u16) -> String {
        format!("redis://{}:{}", host, port)
    }
}

// Reported by `status` as the backend target.
impl fmt::Display for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendConfig::File { path } => write!(f, "file:{}", path.display()),
            BackendConfig::Redis { host, port } => f.write_str(&Self::redis_url(host, *port)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Filesystem path of the listening Unix socket.
    pub socket_path: PathBuf,
    pub backend: BackendConfig,
    /// Longest request line accepted before the connection is dropped.
    pub max_line_length: usize,
    /// Number of keys requested per scan round-trip.
    pub scan_batch: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            backend: BackendConfig::File {
                path: PathBuf::from(DEFAULT_DATA_PATH),
            },
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            scan_batch: DEFAULT_SCAN_BATCH,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.socket_path = path.into();
        self
    }

    pub fn backend(mut self, backend: BackendConfig) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn max_line_length(mut self, length: usize) -> Self {
        self.config.max_line_length = length;
        self
    }

    /// A batch of zero would never advance a scan, so it is clamped to one.
    pub fn scan_batch(mut self, batch: usize) -> Self {
        self.config.scan_batch = batch.max(1);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
