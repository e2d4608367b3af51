use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Persisted player record. Field names follow the on-disk format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(rename = "highScore", default)]
    pub best_score: u64,
    #[serde(
        rename = "correctCards",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub solved_variants: BTreeSet<String>,
}

impl UserProfile {
    /// Returns false when the variant was already recorded.
    pub fn record_solved(&mut self, variant_id: &str) -> bool {
        if self.solved_variants.contains(variant_id) {
            return false;
        }
        self.solved_variants.insert(variant_id.to_string())
    }

    pub fn has_solved(&self, variant_id: &str) -> bool {
        self.solved_variants.contains(variant_id)
    }

    /// Raises the best score if `score` beats it. Returns whether it did.
    pub fn offer_score(&mut self, score: u64) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Error)]
#[error("profile store: {0}")]
pub struct StoreError(pub String);

/// Write-through persistence for the profile. Called after every mutation.
pub trait ProfileStore {
    fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_set_ignores_repeats() {
        let mut profile = UserProfile::default();
        assert!(profile.record_solved("hero_a"));
        assert!(!profile.record_solved("hero_a"));
        assert_eq!(profile.solved_variants.len(), 1);
        assert!(profile.has_solved("hero_a"));
    }

    #[test]
    fn offer_score_only_raises() {
        let mut profile = UserProfile {
            best_score: 2000,
            ..UserProfile::default()
        };
        assert!(!profile.offer_score(2000));
        assert!(!profile.offer_score(1500));
        assert!(profile.offer_score(2500));
        assert_eq!(profile.best_score, 2500);
    }

    #[test]
    fn decodes_wire_names_and_missing_cards() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"highScore":4000,"correctCards":["b","a","b"]}"#)
                .expect("decode");
        assert_eq!(profile.best_score, 4000);
        assert_eq!(profile.solved_variants.len(), 2);

        let bare: UserProfile = serde_json::from_str(r#"{"highScore":10}"#).expect("decode");
        assert!(bare.solved_variants.is_empty());

        let no_score: UserProfile =
            serde_json::from_str(r#"{"correctCards":["fox_day"]}"#).expect("decode");
        assert_eq!(no_score.best_score, 0);
        assert!(no_score.has_solved("fox_day"));

        let null: UserProfile =
            serde_json::from_str(r#"{"highScore":10,"correctCards":null}"#).expect("decode");
        assert!(null.solved_variants.is_empty());
    }

    #[test]
    fn encodes_wire_names() {
        let mut profile = UserProfile::default();
        profile.record_solved("x");
        let body = serde_json::to_string(&profile).expect("encode");
        assert_eq!(body, r#"{"highScore":0,"correctCards":["x"]}"#);
    }
}
