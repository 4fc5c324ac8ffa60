//! Scheduling constants and planner configuration.
//!
//! The review scheduler runs purely on the constants below. The planner
//! defaults can be overridden through `config.toml` or the environment.

use serde::Deserialize;
use std::path::Path;

// ==================== Review Scheduler ====================

/// Ease factor floor; intervals stop shrinking here
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor of a newly created card
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Interval after the first successful recall (and after every "again")
pub const FIRST_INTERVAL_DAYS: i64 = 1;

/// Interval after the second consecutive successful recall
pub const SECOND_INTERVAL_DAYS: i64 = 6;

/// Upper bound on a review interval (~100 years)
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

// ==================== Weekly Planner ====================

/// Number of consecutive days in a generated plan
pub const PLAN_DAYS: u32 = 7;

/// Duration assumed for topics without an estimate
pub const DEFAULT_TOPIC_MINUTES: u32 = 30;

/// Daily study time used when the user has no preference
pub const DEFAULT_DAILY_HOURS: f64 = 2.0;

/// Default config file, relative to the working directory
pub const CONFIG_FILE: &str = "config.toml";

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    planner: Option<PlannerSection>,
}

#[derive(Debug, Deserialize)]
struct PlannerSection {
    daily_hours: Option<f64>,
    default_topic_minutes: Option<u32>,
}

/// Resolved planner defaults
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub daily_hours: f64,
    pub default_topic_minutes: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            daily_hours: DEFAULT_DAILY_HOURS,
            default_topic_minutes: DEFAULT_TOPIC_MINUTES,
        }
    }
}

/// Load planner config with priority: config.toml > .env > default
pub fn load_planner_config() -> PlannerConfig {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    load_planner_config_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Resolve planner config from an explicit file and environment lookup.
///
/// Values that fail to parse or are out of range are logged and skipped.
pub fn load_planner_config_from<F>(path: &Path, env: F) -> PlannerConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = PlannerConfig::default();
    let mut hours_set = false;
    let mut minutes_set = false;

    // Priority 1: config.toml
    if let Some(section) = read_planner_section(path) {
        if let Some(hours) = section.daily_hours {
            if valid_hours(hours) {
                tracing::info!("Using daily_hours from {}: {}", path.display(), hours);
                config.daily_hours = hours;
                hours_set = true;
            } else {
                tracing::warn!("Ignoring non-positive daily_hours in {}: {}", path.display(), hours);
            }
        }
        if let Some(minutes) = section.default_topic_minutes {
            if minutes > 0 {
                config.default_topic_minutes = minutes;
                minutes_set = true;
            } else {
                tracing::warn!("Ignoring zero default_topic_minutes in {}", path.display());
            }
        }
    }

    // Priority 2: environment
    if !hours_set {
        if let Some(raw) = env("STUDY_DAILY_HOURS") {
            match raw.trim().parse::<f64>() {
                Ok(hours) if valid_hours(hours) => {
                    tracing::info!("Using daily_hours from STUDY_DAILY_HOURS env: {}", hours);
                    config.daily_hours = hours;
                }
                _ => tracing::warn!("Ignoring invalid STUDY_DAILY_HOURS: {}", raw),
            }
        }
    }
    if !minutes_set {
        if let Some(raw) = env("STUDY_DEFAULT_TOPIC_MINUTES") {
            match raw.trim().parse::<u32>() {
                Ok(minutes) if minutes > 0 => config.default_topic_minutes = minutes,
                _ => tracing::warn!("Ignoring invalid STUDY_DEFAULT_TOPIC_MINUTES: {}", raw),
            }
        }
    }

    config
}

fn read_planner_section(path: &Path) -> Option<PlannerSection> {
    let contents = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&contents) {
        Ok(config) => config.planner,
        Err(e) => {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

fn valid_hours(hours: f64) -> bool {
    hours.is_finite() && hours > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_planner_config_from(&dir.path().join("missing.toml"), env_of(&[]));
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.default_topic_minutes, 30);
    }

    #[test]
    fn test_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[planner]\ndaily_hours = 3.5\ndefault_topic_minutes = 45\n").unwrap();

        let config = load_planner_config_from(&path, env_of(&[]));
        assert!((config.daily_hours - 3.5).abs() < f64::EPSILON);
        assert_eq!(config.default_topic_minutes, 45);
    }

    #[test]
    fn test_file_takes_priority_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[planner]\ndaily_hours = 1.0\n").unwrap();

        let env = env_of(&[("STUDY_DAILY_HOURS", "4"), ("STUDY_DEFAULT_TOPIC_MINUTES", "20")]);
        let config = load_planner_config_from(&path, env);
        assert!((config.daily_hours - 1.0).abs() < f64::EPSILON);
        // Not set in the file, so the env value applies
        assert_eq!(config.default_topic_minutes, 20);
    }

    #[test]
    fn test_env_values() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_of(&[("STUDY_DAILY_HOURS", " 2.25 ")]);
        let config = load_planner_config_from(&dir.path().join("none.toml"), env);
        assert!((config.daily_hours - 2.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_values_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[planner]\ndaily_hours = -1.0\ndefault_topic_minutes = 0\n").unwrap();

        let env = env_of(&[("STUDY_DAILY_HOURS", "lots"), ("STUDY_DEFAULT_TOPIC_MINUTES", "0")]);
        let config = load_planner_config_from(&path, env);
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[planner\ndaily_hours = ").unwrap();

        let config = load_planner_config_from(&path, env_of(&[("STUDY_DAILY_HOURS", "5")]));
        assert!((config.daily_hours - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_file_without_planner_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\npath = \"data/app.db\"\n").unwrap();

        let config = load_planner_config_from(&path, env_of(&[]));
        assert_eq!(config, PlannerConfig::default());
    }
}
