use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineArgs {
    /// Path to a YAML config file. Built-in defaults apply when omitted.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
    #[arg(long = "set", value_parser = parse_key_val)]
    pub overrides: Vec<(String, String)>,
}

impl CommandLineArgs {
    pub fn new_with_path(path: impl Into<PathBuf>) -> Self {
        CommandLineArgs {
            config: Some(path.into()),
            overrides: Vec::new(),
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s.find('=');
    match pos {
        Some(pos) => Ok((s[..pos].to_string(), s[pos + 1..].to_string())),
        None => Err(format!("invalid KEY=VALUE: no `=` found in `{}`", s)),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub facility: Facility,
    #[serde(default)]
    pub billing: Billing,
    #[serde(default)]
    pub output: Output,
}

impl From<CommandLineArgs> for Config {
    fn from(args: CommandLineArgs) -> Self {
        let mut config = match &args.config {
            Some(path) => Config::from_file(path),
            None => Config::default(),
        };
        config.apply_overrides(&args.overrides);
        config
    }
}

impl Config {
    pub fn from_file(config_path: &Path) -> Self {
        let file = File::open(config_path).unwrap_or_else(|e| {
            panic!(
                "Failed to open config file at {:?}. Original error was {}",
                config_path, e
            )
        });
        let deserializer = serde_yaml::Deserializer::from_reader(BufReader::new(file));
        serde_path_to_error::deserialize(deserializer).unwrap_or_else(|e| {
            panic!(
                "Failed to parse config at {:?}. Original error was: {}",
                config_path, e
            )
        })
    }

    /// Apply generic key-value overrides to the config, e.g. facility.capacity=10
    pub fn apply_overrides(&mut self, overrides: &[(String, String)]) {
        if !overrides.is_empty() {
            info!("Applying overrides: {:?}", overrides);
        }

        for (key, value) in overrides {
            match key.as_str() {
                "facility.capacity" => {
                    if let Ok(v) = value.parse() {
                        self.facility.capacity = v;
                    }
                }
                "billing.unit_seconds" => {
                    if let Ok(v) = value.parse() {
                        self.billing.unit_seconds = v;
                    }
                }
                "output.log_dir" => {
                    self.output.log_dir = Some(PathBuf::from(value));
                }
                "output.logging" => {
                    self.output.logging = match value.to_lowercase().as_str() {
                        "info" => Logging::Info,
                        "none" => Logging::None,
                        _ => panic!("Invalid logging level: {}", value),
                    };
                }
                _ => warn!("No override handler found for key: {}", key),
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Facility {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for Facility {
    fn default() -> Self {
        Facility {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    5
}

/// How elapsed parking time turns into billable units. The concrete unit
/// length is a config choice; the default of one second keeps the
/// one-elapsed-second-equals-one-billable-unit convention.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Billing {
    #[serde(default = "default_unit_seconds")]
    pub unit_seconds: u32,
}

impl Billing {
    /// Converts an elapsed duration in seconds into billed units. The
    /// duration is truncated to whole units; at least one unit is billed.
    pub fn units_for(&self, elapsed_seconds: u32) -> u32 {
        1.max(elapsed_seconds / self.unit_seconds)
    }
}

impl Default for Billing {
    fn default() -> Self {
        Billing {
            unit_seconds: default_unit_seconds(),
        }
    }
}

fn default_unit_seconds() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Output {
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for Output {
    fn default() -> Self {
        Output {
            logging: Logging::default(),
            log_dir: None,
        }
    }
}

/// Have this extra layer of log level enum, as tracing subscriber has no
/// off/none option by default.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub enum Logging {
    #[default]
    Info,
    None,
}

#[cfg(test)]
mod tests {
    use crate::parking::config::{Billing, CommandLineArgs, Config, Logging};
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(5, config.facility.capacity);
        assert_eq!(1, config.billing.unit_seconds);
        assert_eq!(Logging::Info, config.output.logging);
        assert_eq!(None, config.output.log_dir);
    }

    #[test]
    fn from_file() {
        let config = Config::from_file(&PathBuf::from("./assets/config.yml"));
        assert_eq!(5, config.facility.capacity);
        assert_eq!(1, config.billing.unit_seconds);
        assert_eq!(Logging::Info, config.output.logging);
    }

    #[test]
    fn from_partial_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.yml");
        fs::write(&path, "facility:\n  capacity: 2\n").expect("Failed to write config");

        let config = Config::from_file(&path);

        assert_eq!(2, config.facility.capacity);
        // untouched sections fall back to their defaults
        assert_eq!(1, config.billing.unit_seconds);
    }

    #[test]
    #[should_panic]
    fn from_file_missing() {
        Config::from_file(&PathBuf::from("./assets/no-such-config.yml"));
    }

    #[test]
    fn overrides_applied() {
        let mut args = CommandLineArgs::new_with_path("./assets/config.yml");
        args.overrides = vec![
            (String::from("facility.capacity"), String::from("12")),
            (String::from("billing.unit_seconds"), String::from("3600")),
            (String::from("unknown.key"), String::from("ignored")),
        ];

        let config = Config::from(args);

        assert_eq!(12, config.facility.capacity);
        assert_eq!(3600, config.billing.unit_seconds);
    }

    #[test]
    fn parse_key_val_rejects_missing_separator() {
        assert!(super::parse_key_val("facility.capacity").is_err());
        assert_eq!(
            Ok((String::from("a"), String::from("b=c"))),
            super::parse_key_val("a=b=c")
        );
    }

    #[test]
    fn units_truncate_with_minimum() {
        let billing = Billing { unit_seconds: 1 };
        assert_eq!(1, billing.units_for(0));
        assert_eq!(1, billing.units_for(1));
        assert_eq!(3, billing.units_for(3));

        let coarse = Billing { unit_seconds: 3 };
        assert_eq!(1, coarse.units_for(0));
        assert_eq!(1, coarse.units_for(2));
        assert_eq!(1, coarse.units_for(3));
        assert_eq!(2, coarse.units_for(7));
    }
}
