use clap::{Parser, ValueEnum};
use sockkv::backend::{Backend, FileStore, RedisStore};
use sockkv::config::{self, BackendConfig, Config};
use sockkv::{server, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::signal;
use tokio::signal::unix::SignalKind;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendKind {
    /// JSON file on local disk
    File,
    /// Redis or Valkey server
    Redis,
}

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path of the Unix socket to listen on
    #[arg(long, env = "SOCKET_PATH", default_value = config::DEFAULT_SOCKET_PATH)]
    socket_path: PathBuf,

    /// Which backend stores the data
    #[arg(long, env = "KV_BACKEND", value_enum, default_value_t = BackendKind::File)]
    backend: BackendKind,

    /// Data file used by the file backend
    #[arg(long, env = "DATA_PATH", default_value = config::DEFAULT_DATA_PATH)]
    data_path: PathBuf,

    /// Host of the redis backend
    #[arg(long, env = "VALKEY_HOST", default_value = "127.0.0.1")]
    redis_host: String,

    /// Port of the redis backend
    #[arg(long, env = "VALKEY_PORT", default_value_t = 6379)]
    redis_port: u16,

    /// Longest request line accepted, in bytes
    #[arg(long, env = "MAX_LINE_LENGTH", default_value_t = config::DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,

    /// Keys fetched per scan round-trip
    #[arg(long, env = "SCAN_BATCH", default_value_t = config::DEFAULT_SCAN_BATCH)]
    scan_batch: usize,
}

impl Args {
    fn config(self) -> Config {
        let backend = match self.backend {
            BackendKind::File => BackendConfig::File {
                path: self.data_path,
            },
            BackendKind::Redis => BackendConfig::Redis {
                host: self.redis_host,
                port: self.redis_port,
            },
        };

        Config::builder()
            .socket_path(self.socket_path)
            .backend(backend)
            .max_line_length(self.max_line_length)
            .scan_batch(self.scan_batch)
            .build()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Args::parse().config();

    match start(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn start(config: &Config) -> Result<()> {
    info!("sockkv v{} using {}", sockkv::VERSION, config.backend);

    match &config.backend {
        BackendConfig::File { path } => {
            let store = FileStore::open(path, config.scan_batch).await?;
            serve(config, store).await
        }
        BackendConfig::Redis { host, port } => {
            let url = BackendConfig::redis_url(host, *port);
            let store = RedisStore::connect(&url, config.scan_batch).await?;
            serve(config, store).await
        }
    }
}

async fn serve<B: Backend>(config: &Config, backend: B) -> Result<()> {
    server::run(config, backend, shutdown_signal()).await?;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal::unix::signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
}
