mod cli;
mod display;
mod repl;
mod uploads;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use guidechat_ai::{ChatController, OpenAiClient, OpenAiConfig, PollSettings};
use guidechat_common::GuidechatError;
use guidechat_config::{GuidechatConfig, Secrets};
use tokio::sync::mpsc;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};
use crate::repl::{Interrupts, Repl};

const DEFAULT_LOG_DIRECTIVE: &str = "guidechat=info";

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let mut candidates = vec![std::path::PathBuf::from(".env")];
    if let Ok(dir) = guidechat_config::toml_loader::config_dir() {
        candidates.push(dir.join(".env"));
    }

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

fn init_logging(directive: &str) {
    let directive = directive
        .parse::<Directive>()
        .or_else(|_| DEFAULT_LOG_DIRECTIVE.parse::<Directive>());
    let filter = match directive {
        Ok(d) => EnvFilter::from_default_env().add_directive(d),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn poll_settings(config: &GuidechatConfig) -> PollSettings {
    PollSettings {
        upload_throttle: config.polling.upload_throttle(),
        thinking_interval: config.polling.thinking_interval(),
        retry_delay: config.polling.retry_delay(),
        run_timeout: config.polling.run_timeout(),
    }
}

async fn run(args: Args, config: GuidechatConfig) -> Result<(), GuidechatError> {
    // secrets.toml sits next to an explicit config file.
    let secrets = Secrets::resolve(args.config.as_deref().and_then(Path::parent))?;

    let request = match args.command {
        Command::Report(ref report) => {
            report.check().map_err(GuidechatError::InvalidInput)?;
            Some(uploads::build_request(report).await?)
        }
        Command::Chat => None,
    };

    let client = OpenAiClient::new(
        OpenAiConfig::new(secrets.api_key)
            .with_base_url(config.api.base_url.clone())
            .with_connect_timeout(config.api.connect_timeout())
            .with_request_timeout(config.api.request_timeout()),
    )?;

    let (tx, rx) = mpsc::unbounded_channel();
    let controller = ChatController::new(Arc::new(client), secrets.assistant_id)
        .with_settings(poll_settings(&config))
        .with_events(tx);

    let mut repl = Repl::new(controller, rx, Interrupts::install());
    repl.start().await?;

    let chat = match (request, &args.command) {
        (Some(request), Command::Report(report)) => {
            repl.report(request).await;
            !report.no_chat
        }
        _ => true,
    };
    if chat {
        repl.chat().await;
    }

    repl.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file before anything else
    load_dotenv();

    let args = cli::parse();

    let config = match guidechat_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", display::banner(&format!("Failed to load config: {e}")));
            return ExitCode::FAILURE;
        }
    };

    let directive = args
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.directive());
    init_logging(directive);

    tracing::info!("Guidechat v{} starting...", env!("CARGO_PKG_VERSION"));

    match run(args, config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            eprintln!("{}", display::banner(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn poll_settings_follow_config() {
        let mut config = GuidechatConfig::default();
        config.polling.upload_throttle_secs = 0;
        config.polling.thinking_interval_ms = 250;
        config.polling.run_timeout_secs = 0;

        let settings = poll_settings(&config);
        assert_eq!(settings.upload_throttle, Duration::ZERO);
        assert_eq!(settings.thinking_interval, Duration::from_millis(250));
        assert_eq!(settings.retry_delay, Duration::from_secs(3));
        assert_eq!(settings.run_timeout, None);
    }

    #[test]
    fn config_defaults_match_client_defaults() {
        let config = GuidechatConfig::default();
        assert_eq!(poll_settings(&config), PollSettings::default());

        let client = OpenAiConfig::new("sk");
        assert_eq!(client.base_url, config.api.base_url);
        assert_eq!(client.connect_timeout, config.api.connect_timeout());
        assert_eq!(client.request_timeout, config.api.request_timeout());
    }
}
