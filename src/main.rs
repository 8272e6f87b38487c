// Module declarations
mod animation;
mod app;
mod display;
mod player;
mod text;

use app::cli::Args;
use app::config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Parse command line arguments
    let args = Args::parse();

    // Handle --generate-config option
    if let Some(path) = &args.generate_config {
        let config_path = if path.is_dir() || path.to_str() == Some(".") {
            path.join("config.toml")
        } else {
            path.clone()
        };
        Config::generate_default(config_path)?;
        return Ok(());
    }

    // Determine config path for logging later
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };
    let config_existed = config_path.exists();

    let (mut config, config_warnings) = Config::load(Some(config_path.clone()))?;

    if let Some(ref addr) = args.address {
        config.mpd.address = addr.clone();
    }
    if let Some(width) = args.width {
        config.display.width = usize::from(width);
    }
    config.validate()?;

    // Keep the handle alive until exit so the log gets flushed
    let _logger = if config.logging.enabled {
        app::logging::ensure_log_directory(&config.logging)?;
        let handle = app::logging::init_logger(&config.logging)?;
        app::logging::log_startup_info(&config.logging);
        app::logging::log_config_loading(&config_path, !config_existed);
        for warning in &config_warnings {
            log::warn!("{}", warning);
        }
        Some(handle)
    } else {
        // The panel takes over the terminal, so print these before it does.
        for warning in &config_warnings {
            eprintln!("Warning: {}", warning);
        }
        None
    };

    let result = app::lifecycle::run(config).await;

    if result.is_ok() {
        app::logging::log_shutdown_info();
    }
    result
}
