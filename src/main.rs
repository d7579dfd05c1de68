use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use jino_client::application::{
    LoginRequest, LoginUseCase, LogoutUseCase, RestoreSessionUseCase, SessionSeed, TokenSource,
};
use jino_client::domain::TokenStore;
use jino_client::infrastructure::{
    ApiClient, ApiClientFactory, AppConfig, ChannelSessionObserver, CliArgs, Command,
    InMemoryTokenStore, RefreshOutcome, SessionEvent, StorageManager,
};

const ENV_ACCESS_TOKEN: &str = "JINO_ACCESS_TOKEN";
const ENV_REFRESH_TOKEN: &str = "JINO_REFRESH_TOKEN";

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = match StorageManager::new() {
        Ok(storage) => storage.load_config(args.config.as_deref())?,
        Err(e) => {
            eprintln!("warning: {e}, using default configuration");
            AppConfig::default()
        }
    };
    config.merge_with_args(args);
    Ok(config)
}

fn session_seeds(args: &CliArgs) -> Vec<SessionSeed> {
    let mut seeds = Vec::new();
    if let Some(access_token) = &args.access_token {
        seeds.push(SessionSeed::new(
            access_token.clone(),
            args.refresh_token.clone().unwrap_or_default(),
            TokenSource::CommandLine,
        ));
    }
    if let Ok(access_token) = std::env::var(ENV_ACCESS_TOKEN) {
        seeds.push(SessionSeed::new(
            access_token,
            std::env::var(ENV_REFRESH_TOKEN).unwrap_or_default(),
            TokenSource::Environment,
        ));
    }
    seeds
}

fn parse_body(body: &str) -> Result<Value> {
    Ok(serde_json::from_str(body)?)
}

fn print_json(value: &Value) -> Result<()> {
    if !value.is_null() {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

async fn run_command(
    command: Command,
    client: &ApiClient,
    config: &AppConfig,
    cancel: &CancellationToken,
) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let login = LoginUseCase::new(client.clone(), config.api.endpoints.login.clone());
            let response = login
                .execute(LoginRequest::new(username, password), cancel)
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Refresh => match client.refresh_now(cancel).await {
            RefreshOutcome::Refreshed(tokens) => {
                let pair = serde_json::json!({
                    "accessToken": tokens.access_token(),
                    "refreshToken": tokens.refresh_token(),
                });
                print_json(&pair)?;
            }
            RefreshOutcome::Failed => bail!("session could not be renewed, please login again"),
            RefreshOutcome::Cancelled => bail!("refresh cancelled"),
        },
        Command::Logout => {
            let endpoint = config.api.endpoints.logout_path().map(str::to_string);
            LogoutUseCase::new(client.clone(), endpoint)
                .execute(cancel)
                .await;
        }
        Command::Get { path } => {
            let value: Value = client.get(&path, cancel).await?;
            print_json(&value)?;
        }
        Command::Post { path, body } => {
            let value: Value = client.post(&path, &parse_body(&body)?, cancel).await?;
            print_json(&value)?;
        }
        Command::Put { path, body } => {
            let value: Value = client.put(&path, &parse_body(&body)?, cancel).await?;
            print_json(&value)?;
        }
        Command::Delete { path } => client.delete(&path, cancel).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = jino_client::VERSION, base_url = %config.api.base_url, "Starting jino-client");

    let store: Arc<dyn TokenStore> = Arc::new(InMemoryTokenStore::new());
    let (observer, mut session_events) = ChannelSessionObserver::new();
    let client = ApiClientFactory::new(config.api.clone()).build(store.clone(), Arc::new(observer))?;

    RestoreSessionUseCase::new(store).execute(session_seeds(&args));

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight request");
            ctrl_c.cancel();
        }
    });

    if let (Some(username), Some(password)) = (args.username.clone(), args.password.clone()) {
        LoginUseCase::new(client.clone(), config.api.endpoints.login.clone())
            .execute(LoginRequest::new(username, password), &cancel)
            .await?;
    }

    let result = run_command(args.command, &client, &config, &cancel).await;

    while let Ok(SessionEvent::Expired { reason }) = session_events.try_recv() {
        eprintln!("session expired: {reason}");
    }

    result
}
