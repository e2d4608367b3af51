use std::path::{Path, PathBuf};
use twinmatch_core::VisualRef;

const CANDIDATE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "txt"];

/// Turns a catalog visual path into a handle, or `None` when the asset is missing.
pub trait AssetResolver {
    fn resolve(&self, key: &str) -> Option<VisualRef>;
}

/// Looks keys up under a root directory. Keys may omit the file extension.
#[derive(Debug, Clone)]
pub struct DirAssetResolver {
    root: PathBuf,
}

impl DirAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetResolver for DirAssetResolver {
    fn resolve(&self, key: &str) -> Option<VisualRef> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        let direct = self.root.join(key);
        if direct.is_file() {
            return Some(VisualRef::new(key, direct));
        }
        CANDIDATE_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{key}.{ext}")))
            .find(|path| path.is_file())
            .map(|path| VisualRef::new(key, path))
    }
}
