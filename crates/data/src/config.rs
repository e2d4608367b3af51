use anyhow::{ensure, Context};
use std::fs;
use std::path::Path;
use twinmatch_core::GameConfig;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CATALOG_FILE_NAME: &str = "unit_data.csv";

/// Reads `config.json` from the assets directory; missing file means defaults.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(GameConfig::default());
    }
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let config: GameConfig =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    ensure!(config.hand_slots > 0, "hand_slots must be at least 1");
    ensure!(config.rounds_per_set > 0, "rounds_per_set must be at least 1");
    ensure!(
        config.time_limit_secs > 0.0,
        "time_limit_secs must be positive"
    );
    Ok(config)
}
