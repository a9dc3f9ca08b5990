//! HEXARIO CLI - scripted agents, terminal renderer and commands
//!
//! The binary in `main.rs` is a thin clap front end over these modules.

pub mod policy;
pub mod ascii;
pub mod play;
pub mod bench;

use std::path::Path;

use anyhow::{Context, Result};

use hexario_core::EngineConfig;

/// Config from an optional JSON file, with an optional seed override
pub fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(p) => EngineConfig::load(p)
            .with_context(|| format!("Failed to load config: {}", p.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(s) = seed {
        config.seed = Some(s);
    }

    Ok(config)
}
