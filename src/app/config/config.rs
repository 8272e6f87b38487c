use crate::app::config::display::DisplayConfig;
use crate::app::config::logging::LoggingConfig;
use crate::app::config::messages::MessagesConfig;
use crate::app::config::mpd::MpdConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub mpd: MpdConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Known keys per section, used for unknown-option warnings.
const KNOWN_FIELDS: &[(&str, &[&str])] = &[
    ("mpd", &["address", "reconnect_delay_ms"]),
    (
        "display",
        &["width", "frame_delay_ms", "boot_hold_ms", "farewell_hold_ms"],
    ),
    (
        "messages",
        &[
            "boot_line1",
            "boot_line2",
            "greeting",
            "farewell",
            "error_title",
        ],
    ),
    (
        "logging",
        &[
            "enabled",
            "level",
            "log_to_console",
            "append_to_file",
            "rotate_logs",
            "rotation_size_mb",
            "keep_log_files",
            "custom_log_path",
        ],
    ),
];

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();

    // Two rolling rows instead of the full matrix.
    let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution = prev_row[j] + usize::from(a_char != *b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(substitution);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_chars.len()]
}

/// Closest candidate within a few edits of `unknown`, if any
fn find_similar<'a>(unknown: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let unknown_lower = unknown.to_lowercase();

    candidates
        .iter()
        .map(|&candidate| {
            let distance = levenshtein_distance(&unknown_lower, &candidate.to_lowercase());
            (candidate, distance)
        })
        .filter(|&(candidate, distance)| {
            let threshold = (unknown.len().max(candidate.len()) / 2).max(3);
            distance <= threshold
        })
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

fn unknown_section_warning(key: &str, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!("Unknown config section: [{}] (did you mean: [{}]?)", key, s),
        None => format!("Unknown config section: [{}]", key),
    }
}

fn unknown_field_warning(section: &str, key: &str, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!(
            "Unknown option in [{}]: {} (did you mean: {}?)",
            section, key, s
        ),
        None => format!("Unknown option in [{}]: {}", section, key),
    }
}

impl Config {
    /// Returns the default config file path based on the platform:
    /// - Linux: ~/.config/mpd-lcd/config.toml (XDG_CONFIG_HOME)
    /// - macOS: ~/Library/Application Support/mpd-lcd/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\mpd-lcd\config.toml
    pub fn default_config_path() -> color_eyre::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))?;
        Ok(config_dir.join("mpd-lcd").join("config.toml"))
    }

    /// Load the config, writing a default one first if the file is missing.
    ///
    /// Returns the config and any warnings to log once logging is up.
    pub fn load(config_path: Option<PathBuf>) -> color_eyre::Result<(Self, Vec<String>)> {
        let config_path = match config_path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            let default_config = Config::default();
            default_config.write_to(&config_path)?;

            // The logger is not up yet; main logs the creation again later.
            eprintln!("Created default config file at: {}", config_path.display());

            return Ok((default_config, Vec::new()));
        }

        let contents = std::fs::read_to_string(&config_path)?;
        Ok(Self::parse(&contents))
    }

    /// Parse config text, falling back to defaults if it is malformed.
    pub fn parse(contents: &str) -> (Self, Vec<String>) {
        let mut warnings = Self::check_unknown_fields(contents);

        let config = toml::from_str(contents).unwrap_or_else(|e| {
            warnings.push(format!("Failed to parse config file, using defaults: {}", e));
            Config::default()
        });
        (config, warnings)
    }

    /// Reject settings the display cannot work with.
    pub fn validate(&self) -> color_eyre::Result<()> {
        if self.display.width == 0 {
            return Err(color_eyre::eyre::eyre!(
                "[display] width must be at least 1"
            ));
        }
        Ok(())
    }

    /// Check for unknown sections and fields and return warnings
    fn check_unknown_fields(contents: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        // Let the main parser report syntax errors.
        let Ok(table) = toml::from_str::<toml::Table>(contents) else {
            return warnings;
        };

        let sections: Vec<&str> = KNOWN_FIELDS.iter().map(|(section, _)| *section).collect();

        for (key, value) in &table {
            let Some((section, fields)) = KNOWN_FIELDS.iter().find(|(s, _)| *s == key.as_str())
            else {
                warnings.push(unknown_section_warning(key, find_similar(key, &sections)));
                continue;
            };

            if let toml::Value::Table(entries) = value {
                for field in entries.keys() {
                    if !fields.contains(&field.as_str()) {
                        warnings.push(unknown_field_warning(
                            section,
                            field,
                            find_similar(field, fields),
                        ));
                    }
                }
            }
        }

        warnings
    }

    /// Generate a default config file at the specified path
    pub fn generate_default(path: PathBuf) -> color_eyre::Result<()> {
        if path.exists() {
            return Err(color_eyre::eyre::eyre!(
                "Config file already exists at: {}",
                path.display()
            ));
        }

        Config::default().write_to(&path)?;
        println!("Generated default config at: {}", path.display());
        Ok(())
    }

    fn write_to(&self, path: &Path) -> color_eyre::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }
}
