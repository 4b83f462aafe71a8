use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, ValueEnum};
use returncheck_client::RegistryClient;
use returncheck_core::{AppConfig, BarcodeResponse, CacheBackend, FailureResponse, LookupEngine, open_store};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BackendArg {
    Json,
    Sqlite,
}

impl From<BackendArg> for CacheBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Json => CacheBackend::Json,
            BackendArg::Sqlite => CacheBackend::Sqlite,
        }
    }
}

#[derive(Args)]
pub struct LookupArgs {
    /// Barcode digits as printed on the container.
    pub barcode: String,

    /// Cache file, overriding configuration.
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Cache backend, overriding configuration.
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,
}

impl LookupArgs {
    fn config(&self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::load().context("loading configuration")?;
        if let Some(cache) = &self.cache {
            config.cache_path = cache.clone();
        }
        if let Some(backend) = self.backend {
            config.cache_backend = backend.into();
        }
        config.validate().context("validating configuration")?;
        Ok(config)
    }

    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = self.config()?;
        let store = open_store(config.cache_backend, &config.cache_path)
            .await
            .with_context(|| format!("opening cache at {}", config.cache_path.display()))?;
        let registry = RegistryClient::from_app_config(&config).context("building registry client")?;
        let engine = LookupEngine::new(store, Arc::new(registry));

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, cancelling lookup");
                on_interrupt.cancel();
            }
        });

        let (payload, code) = match engine.lookup(&self.barcode, &cancel).await {
            Ok(outcome) => (serde_json::to_string_pretty(&BarcodeResponse::from(&outcome))?, ExitCode::SUCCESS),
            Err(failure) => {
                let code = if failure.error.is_client_error() { ExitCode::from(2) } else { ExitCode::FAILURE };
                (serde_json::to_string_pretty(&FailureResponse::from(&failure))?, code)
            }
        };

        println!("{payload}");
        Ok(code)
    }
}
