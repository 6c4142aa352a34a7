//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.crex/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Version of the Crex document protocol this client understands.
/// Actions with a higher `requiredCrexVersion` are refused.
pub const CREX_VERSION: u32 = 1;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CrexConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub menu_bar: MenuBarConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub root_url: Option<String>,
    pub root_template: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TimingConfig {
    pub animation_ms: Option<u64>,
    pub spinner_delay_ms: Option<u64>,
    pub content_cache_secs: Option<u64>,
    pub fetch_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub resolution_height: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MenuBarConfig {
    pub background_color: Option<String>,
    pub focused_text_color: Option<String>,
    pub unfocused_text_color: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ROOT_TEMPLATE: &str = "Menu";
pub const DEFAULT_ANIMATION_MS: u64 = 250;
pub const DEFAULT_SPINNER_DELAY_MS: u64 = 500;
pub const DEFAULT_CONTENT_CACHE_SECS: u64 = 600;
pub const DEFAULT_RESOLUTION_HEIGHT: u32 = 1080;
pub const DEFAULT_MENU_BACKGROUND: &str = "#b2121212";
pub const DEFAULT_MENU_FOCUSED: &str = "#dddddd";
pub const DEFAULT_MENU_UNFOCUSED: &str = "#808080";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Required to actually run; `main` refuses to start without it.
    pub root_url: Option<String>,
    pub root_template: String,
    pub animation_time: Duration,
    pub spinner_delay: Duration,
    pub content_cache_time: Duration,
    /// `None` leaves fetches unbounded.
    pub fetch_timeout: Option<Duration>,
    pub resolution_height: u32,
    pub menu_bar: MenuBarColors,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuBarColors {
    pub background: String,
    pub focused_text: String,
    pub unfocused_text: String,
}

/// Values that can come from the command line. `None` = flag not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub root_url: Option<String>,
    pub root_template: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.crex/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".crex").join("config.toml"))
}

/// Load config from `~/.crex/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `CrexConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<CrexConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(CrexConfig::default())
        }
    }
}

/// Same as [`load_config`] for an explicit path (`--config`).
pub fn load_config_from(path: &Path) -> Result<CrexConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(CrexConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: CrexConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r##"# Crex Configuration
# All settings are optional, defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [app]
# root_url = "http://tv.example.com/crex/index.json"   # Or set CREX_ROOT_URL
# root_template = "Menu"                               # Or set CREX_ROOT_TEMPLATE

# [timing]
# animation_ms = 250
# spinner_delay_ms = 500
# content_cache_secs = 600
# fetch_timeout_ms = 15000     # Unset = wait forever. Or set CREX_FETCH_TIMEOUT_MS

# [display]
# resolution_height = 1080     # Picks HD/FHD/UHD image variants

# [menu_bar]
# background_color = "#b2121212"
# focused_text_color = "#dddddd"
# unfocused_text_color = "#808080"
"##;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &CrexConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &CrexConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Root URL: CLI → env → config
    let root_url = cli
        .root_url
        .clone()
        .or_else(|| env("CREX_ROOT_URL"))
        .or_else(|| config.app.root_url.clone())
        .filter(|url| !url.trim().is_empty());

    // Root template: CLI → env → config → default
    let root_template = cli
        .root_template
        .clone()
        .or_else(|| env("CREX_ROOT_TEMPLATE"))
        .or_else(|| config.app.root_template.clone())
        .unwrap_or_else(|| DEFAULT_ROOT_TEMPLATE.to_string());

    // Fetch timeout: env → config → unbounded
    let fetch_timeout_ms = match env("CREX_FETCH_TIMEOUT_MS") {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(ms) => Some(ms),
            Err(e) => {
                warn!("Ignoring CREX_FETCH_TIMEOUT_MS={:?}: {}", raw, e);
                config.timing.fetch_timeout_ms
            }
        },
        None => config.timing.fetch_timeout_ms,
    };

    let menu_bar = &config.menu_bar;

    ResolvedConfig {
        root_url,
        root_template,
        animation_time: Duration::from_millis(
            config.timing.animation_ms.unwrap_or(DEFAULT_ANIMATION_MS),
        ),
        spinner_delay: Duration::from_millis(
            config
                .timing
                .spinner_delay_ms
                .unwrap_or(DEFAULT_SPINNER_DELAY_MS),
        ),
        content_cache_time: Duration::from_secs(
            config
                .timing
                .content_cache_secs
                .unwrap_or(DEFAULT_CONTENT_CACHE_SECS),
        ),
        fetch_timeout: fetch_timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis),
        resolution_height: config
            .display
            .resolution_height
            .unwrap_or(DEFAULT_RESOLUTION_HEIGHT),
        menu_bar: MenuBarColors {
            background: menu_bar
                .background_color
                .clone()
                .unwrap_or_else(|| DEFAULT_MENU_BACKGROUND.to_string()),
            focused_text: menu_bar
                .focused_text_color
                .clone()
                .unwrap_or_else(|| DEFAULT_MENU_FOCUSED.to_string()),
            unfocused_text: menu_bar
                .unfocused_text_color
                .clone()
                .unwrap_or_else(|| DEFAULT_MENU_UNFOCUSED.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = CrexConfig::default();
        assert!(config.app.root_url.is_none());
        assert!(config.timing.fetch_timeout_ms.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&CrexConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.root_url, None);
        assert_eq!(resolved.root_template, "Menu");
        assert_eq!(resolved.animation_time, Duration::from_millis(250));
        assert_eq!(resolved.spinner_delay, Duration::from_millis(500));
        assert_eq!(resolved.content_cache_time, Duration::from_secs(600));
        assert_eq!(resolved.fetch_timeout, None);
        assert_eq!(resolved.resolution_height, 1080);
        assert_eq!(resolved.menu_bar.background, "#b2121212");
        assert_eq!(resolved.menu_bar.focused_text, "#dddddd");
        assert_eq!(resolved.menu_bar.unfocused_text, "#808080");
    }

    #[test]
    fn test_toml_values_override_defaults() {
        let toml_str = r##"
[app]
root_url = "http://tv.example.com/index.json"
root_template = "PosterList"

[timing]
animation_ms = 100
spinner_delay_ms = 0
content_cache_secs = 30
fetch_timeout_ms = 5000

[display]
resolution_height = 2160

[menu_bar]
focused_text_color = "#ffffff"
"##;
        let config: CrexConfig = toml::from_str(toml_str).unwrap();
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(
            resolved.root_url.as_deref(),
            Some("http://tv.example.com/index.json")
        );
        assert_eq!(resolved.root_template, "PosterList");
        assert_eq!(resolved.animation_time, Duration::from_millis(100));
        assert_eq!(resolved.spinner_delay, Duration::ZERO);
        assert_eq!(resolved.content_cache_time, Duration::from_secs(30));
        assert_eq!(resolved.fetch_timeout, Some(Duration::from_millis(5000)));
        assert_eq!(resolved.resolution_height, 2160);
        assert_eq!(resolved.menu_bar.focused_text, "#ffffff");
        assert_eq!(resolved.menu_bar.background, DEFAULT_MENU_BACKGROUND);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[timing]
animation_ms = 400
"#;
        let config: CrexConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.timing.animation_ms, Some(400));
        assert!(config.timing.spinner_delay_ms.is_none());
        assert!(config.app.root_template.is_none());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("crex-config-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[timing]\nanimation_ms = \"slow\"\n").unwrap();
        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = std::env::temp_dir().join(format!("crex-config-gen-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");
        let config = load_config_from(&path).unwrap();
        assert!(config.app.root_url.is_none());

        let generated = fs::read_to_string(&path).unwrap();
        assert!(generated.starts_with("# Crex Configuration"));
        // every line is a comment, so it parses to the defaults
        let reparsed: CrexConfig = toml::from_str(&generated).unwrap();
        assert!(reparsed.timing.animation_ms.is_none());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let config = CrexConfig {
            app: AppConfig {
                root_url: Some("http://file/index.json".to_string()),
                root_template: Some("Menu".to_string()),
            },
            ..Default::default()
        };
        let env: HashMap<&str, &str> = HashMap::from([
            ("CREX_ROOT_URL", "http://env/index.json"),
            ("CREX_ROOT_TEMPLATE", "PosterList"),
            ("CREX_FETCH_TIMEOUT_MS", "750"),
        ]);
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let resolved = resolve_with_env(&config, &CliOverrides::default(), lookup);
        assert_eq!(resolved.root_url.as_deref(), Some("http://env/index.json"));
        assert_eq!(resolved.root_template, "PosterList");
        assert_eq!(resolved.fetch_timeout, Some(Duration::from_millis(750)));

        let cli = CliOverrides {
            root_url: Some("http://cli/index.json".to_string()),
            root_template: None,
        };
        let resolved = resolve_with_env(&config, &cli, lookup);
        assert_eq!(resolved.root_url.as_deref(), Some("http://cli/index.json"));
        assert_eq!(resolved.root_template, "PosterList");
    }

    #[test]
    fn test_bad_timeout_env_falls_back_to_file() {
        let config = CrexConfig {
            timing: TimingConfig {
                fetch_timeout_ms: Some(2000),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), |key| {
            (key == "CREX_FETCH_TIMEOUT_MS").then(|| "soon".to_string())
        });
        assert_eq!(resolved.fetch_timeout, Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_zero_timeout_means_unbounded() {
        let config = CrexConfig {
            timing: TimingConfig {
                fetch_timeout_ms: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.fetch_timeout, None);
    }

    #[test]
    fn test_blank_root_url_is_absent() {
        let cli = CliOverrides {
            root_url: Some("  ".to_string()),
            root_template: None,
        };
        let resolved = resolve_with_env(&CrexConfig::default(), &cli, no_env);
        assert_eq!(resolved.root_url, None);
    }
}
