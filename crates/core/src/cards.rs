use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Opaque handle to a resolved visual asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VisualRef {
    /// Asset key as written in the catalog source.
    pub key: String,
    /// Location the asset lookup resolved the key to.
    pub path: PathBuf,
}

impl VisualRef {
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }

    /// Short label for text surfaces: the last path segment of the key.
    pub fn label(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardRecord {
    pub group_id: i64,
    pub variant_id: String,
    pub visual: VisualRef,
}

impl CardRecord {
    pub fn new(group_id: i64, variant_id: impl Into<String>, visual: VisualRef) -> Self {
        Self {
            group_id,
            variant_id: variant_id.into(),
            visual,
        }
    }
}

/// Immutable, process-wide card list. Built once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: Vec<Arc<CardRecord>>,
}

impl Catalog {
    /// Builds a catalog, dropping any record whose `variant_id` was already seen.
    pub fn new(records: impl IntoIterator<Item = CardRecord>) -> Self {
        let mut seen = HashSet::new();
        let cards = records
            .into_iter()
            .filter(|card| seen.insert(card.variant_id.clone()))
            .map(Arc::new)
            .collect();
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Arc<CardRecord>] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&Arc<CardRecord>> {
        self.cards.get(index)
    }

    pub fn by_variant(&self, variant_id: &str) -> Option<&Arc<CardRecord>> {
        self.cards.iter().find(|card| card.variant_id == variant_id)
    }

    pub fn group_count(&self) -> usize {
        self.cards
            .iter()
            .map(|card| card.group_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// First card in catalog order that shares `card`'s group but not its variant.
    pub fn alternate_variant(&self, card: &CardRecord) -> Option<&Arc<CardRecord>> {
        self.cards
            .iter()
            .find(|other| other.group_id == card.group_id && other.variant_id != card.variant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(group: i64, variant: &str) -> CardRecord {
        CardRecord::new(group, variant, VisualRef::new(variant, variant))
    }

    #[test]
    fn drops_repeated_variants() {
        let catalog = Catalog::new(vec![card(1, "a"), card(2, "a"), card(2, "b")]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.by_variant("a").map(|c| c.group_id), Some(1));
        assert_eq!(catalog.group_count(), 2);
    }

    #[test]
    fn alternate_variant_stays_in_group() {
        let catalog = Catalog::new(vec![card(1, "a"), card(2, "b"), card(1, "c")]);
        let first = catalog.get(0).expect("card");
        let alt = catalog.alternate_variant(first).expect("alternate");
        assert_eq!(alt.variant_id, "c");
        let lone = catalog.get(1).expect("card");
        assert!(catalog.alternate_variant(lone).is_none());
    }

    #[test]
    fn label_is_last_segment() {
        let visual = VisualRef::new("cards/hero_a", "assets/cards/hero_a.png");
        assert_eq!(visual.label(), "hero_a");
    }
}
