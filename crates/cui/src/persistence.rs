use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use twinmatch_core::Catalog;

const DATA_DIR_NAME: &str = ".twinmatch";

/// Writable per-user directory for the profile and logs.
pub fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
}

/// Text sprites keyed by visual key. Image assets have no terminal form and are skipped.
pub fn load_sprite_art(catalog: &Catalog) -> HashMap<String, Vec<String>> {
    let mut art = HashMap::new();
    for card in catalog.cards() {
        let path = &card.visual.path;
        if !is_text_sprite(path) {
            continue;
        }
        match fs::read_to_string(path) {
            Ok(body) => {
                art.insert(
                    card.visual.key.clone(),
                    body.lines().map(str::to_string).collect(),
                );
            }
            Err(err) => warn!(path = %path.display(), %err, "sprite unreadable"),
        }
    }
    art
}

fn is_text_sprite(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "txt")
}
