use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use crex::core::config::{CliOverrides, CrexConfig, load_config, load_config_from, resolve};
use crex::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "crex", about = "Server-driven TV interface in the terminal")]
struct Args {
    /// URL of the root Crex document
    #[arg(short, long)]
    url: Option<String>,

    /// Template used for the root screen
    #[arg(short, long)]
    template: Option<String>,

    /// Config file to use instead of ~/.crex/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the log
    #[arg(long, default_value = "crex.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - the terminal belongs to the UI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let loaded = match &args.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let file_config = loaded.unwrap_or_else(|e| {
        log::warn!("Config unusable, falling back to defaults: {}", e);
        eprintln!("warning: {}, using defaults", e);
        CrexConfig::default()
    });

    let config = resolve(
        &file_config,
        &CliOverrides {
            root_url: args.url,
            root_template: args.template,
        },
    );

    let Some(root_url) = config.root_url.as_deref() else {
        eprintln!(
            "No root URL configured. Pass --url, set CREX_ROOT_URL, or add root_url to the [app] section of the config file."
        );
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "missing root URL",
        ));
    };

    log::info!(
        "Crex starting up at {} with template {}",
        root_url,
        config.root_template
    );

    tui::run(config)
}
