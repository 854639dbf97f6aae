/***************************************/
/*        3rd party libraries          */
/***************************************/
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::selection::PolicyKind;
use crate::shared::Floor;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub building: BuildingConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    pub fleet: Vec<CarConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BuildingConfig {
    pub name: String,
    pub top_floor: Floor,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct DispatchConfig {
    #[serde(default)]
    pub policy: PolicyKind,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CarConfig {
    pub id: String,
    pub max_capacity: usize,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.building.top_floor == 0 {
            bail!("building.top_floor must be at least 1");
        }
        if self.fleet.is_empty() {
            bail!("fleet must contain at least one elevator");
        }

        let mut seen = HashSet::new();
        for car in &self.fleet {
            if car.max_capacity == 0 {
                bail!("elevator {} has max_capacity 0", car.id);
            }
            if !seen.insert(car.id.as_str()) {
                bail!("elevator id {} is listed twice", car.id);
            }
        }
        Ok(())
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str).context("Failed to parse configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
    parse_config(&config_str).with_context(|| format!("In {}", path.display()))
}
