mod cli;
mod render;
mod repl;

use std::time::Duration;

use gemchat_ai::{
    Credentials, FileKeyStore, GeminiClient, GeminiConfig, KeyStore, MemoryKeyStore, Session,
};
use gemchat_config::GemchatConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a key for this run only.
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        std::path::PathBuf::from(".env"),
        manifest_dir.join("..").join("..").join(".env"),
    ];

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
    let filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::filter::Directive::from(tracing::Level::INFO)),
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn gemini_config(config: &GemchatConfig) -> GeminiConfig {
    let mut gemini = GeminiConfig::default()
        .with_base_url(config.api.base_url.clone())
        .with_timeouts(
            Duration::from_secs(u64::from(config.api.connect_timeout_secs)),
            Duration::from_secs(u64::from(config.api.request_timeout_secs)),
        );
    if let Some(instruction) = &config.model.system_instruction {
        gemini = gemini.with_system_instruction(instruction.clone());
    }
    if let Some(temperature) = config.model.temperature {
        gemini = gemini.with_temperature(temperature);
    }
    if let Some(max) = config.model.max_output_tokens {
        gemini = gemini.with_max_output_tokens(max);
    }
    gemini
}

fn open_key_store() -> Box<dyn KeyStore> {
    match FileKeyStore::open_default() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "no key store directory, API key will not persist");
            Box::new(MemoryKeyStore::new())
        }
    }
}

/// Key precedence: `--key`, then `GEMINI_API_KEY` for this run only, then
/// whatever the store holds. With remembering off the stored copy is removed.
fn load_credentials(
    config: &GemchatConfig,
    args: &cli::Args,
    store: Box<dyn KeyStore>,
) -> Credentials {
    let remember = config.credentials.remember && !args.no_remember;
    let mut credentials = Credentials::load(store, config.credentials.key_name.clone(), remember);
    if !remember {
        if let Err(e) = credentials.set_remember(false) {
            warn!(error = %e, "failed to remove stored API key");
        }
    }

    if let Some(key) = args.key.as_deref().filter(|k| !k.trim().is_empty()) {
        if let Err(e) = credentials.set_key(key) {
            warn!(error = %e, "failed to store API key");
        }
    } else if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            credentials.use_transient(&key);
        }
    }
    credentials
}

#[tokio::main]
async fn main() {
    load_dotenv();

    let args = cli::parse();

    let loaded = match args.config.as_deref() {
        Some(path) => gemchat_config::load_config_from(&gemchat_common::paths::expand_home(path)),
        None => gemchat_config::load_config(),
    };
    let (config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (GemchatConfig::default(), Some(e)),
    };

    let directive = args
        .log_level
        .as_deref()
        .unwrap_or_else(|| config.logging.level.as_directive());
    init_logging(&format!(
        "gemchat={directive},gemchat_ai={directive},gemchat_config={directive}"
    ));

    if let Some(e) = config_error {
        warn!(error = %e, "failed to load config, using defaults");
    }

    let client = match GeminiClient::new(gemini_config(&config)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("gemchat: {e}");
            std::process::exit(1);
        }
    };

    let credentials = load_credentials(&config, &args, open_key_store());
    let session =
        Session::new(config.model.name.clone(), credentials).with_greeting(&config.session.greeting);
    if let Some(model) = args.model.as_deref() {
        if let Err(e) = session.set_model(model) {
            eprintln!("gemchat: {e}");
            std::process::exit(1);
        }
    }
    info!(model = %session.model(), "starting gemchat");

    if let Some(path) = args.attach.as_deref() {
        let path = gemchat_common::paths::expand_home(path);
        if let Err(e) = session
            .attach_file(&path, config.attachments.max_file_size_bytes())
            .await
        {
            eprintln!("gemchat: {e}");
            if args.prompt.is_some() {
                std::process::exit(1);
            }
        }
    }

    if let Some(prompt) = args.prompt.as_deref() {
        match session.submit(&client, Some(prompt)).await {
            Ok(reply) => println!("{}", reply.text()),
            Err(e) => {
                eprintln!("gemchat: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = repl::run(&session, &client, &config).await {
        eprintln!("gemchat: {e}");
        std::process::exit(1);
    }
}
