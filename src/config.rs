/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub building: BuildingConfig,
    pub elevator: ElevatorConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BuildingConfig {
    pub n_floors: u8,
    pub n_elevators: u8,
}

/// Timings in milliseconds.
#[derive(Deserialize, Clone, Debug)]
pub struct ElevatorConfig {
    pub time_between_floors: u64,
    pub passenger_transfer_time: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct GeneratorConfig {
    pub request_interval: u64,
    pub seed: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ElevatorConfig {
    pub fn time_between_floors(&self) -> Duration {
        Duration::from_millis(self.time_between_floors)
    }

    pub fn passenger_transfer_time(&self) -> Duration {
        Duration::from_millis(self.passenger_transfer_time)
    }
}

impl GeneratorConfig {
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval)
    }
}

impl Default for GeneratorConfig {
    fn default() -> GeneratorConfig {
        GeneratorConfig {
            request_interval: 1500,
            seed: None,
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path)?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.building.n_floors == 0 {
            return Err(ConfigError::Invalid("n_floors must be at least 1".into()));
        }
        if self.building.n_elevators == 0 {
            return Err(ConfigError::Invalid("n_elevators must be at least 1".into()));
        }
        Ok(())
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
