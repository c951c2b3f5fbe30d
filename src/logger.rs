use anyhow::Result;
use log::Level;
use simple_logger::init_with_level;
use std::{env, str::FromStr};

const LOG_LEVEL_VAR: &str = "PINATA_DEPLOY_LOG";

pub fn init() -> Result<()> {
    init_with_level(level(env::var(LOG_LEVEL_VAR).ok().as_deref()))?;

    Ok(())
}

fn level(value: Option<&str>) -> Level {
    value
        .and_then(|value| Level::from_str(value.trim()).ok())
        .unwrap_or(Level::Info)
}
