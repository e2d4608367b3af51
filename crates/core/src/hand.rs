use crate::{CardRecord, Catalog, RngState, RoundError, VisualRef};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cards the player chooses from. No two slots share a `group_id`.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    slots: Vec<Arc<CardRecord>>,
}

impl Hand {
    /// Shuffles the whole catalog, seeds the hand with the first card, then
    /// fills the remaining slots with cards from groups not yet present.
    pub fn deal(catalog: &Catalog, slots: usize, rng: &mut RngState) -> Result<Self, RoundError> {
        if slots == 0 {
            return Err(RoundError::NoHandSlots);
        }
        if catalog.is_empty() {
            return Err(RoundError::EmptyCatalog);
        }
        let mut shuffled: Vec<&Arc<CardRecord>> = catalog.cards().iter().collect();
        rng.shuffle(&mut shuffled);

        let mut hand: Vec<Arc<CardRecord>> = Vec::with_capacity(slots);
        for card in shuffled {
            if hand.len() >= slots {
                break;
            }
            if hand.iter().any(|held| held.group_id == card.group_id) {
                continue;
            }
            hand.push(Arc::clone(card));
        }
        if hand.len() < slots {
            return Err(RoundError::InsufficientHandSize {
                required: slots,
                available: hand.len(),
            });
        }
        if let Some(lead) = hand.first() {
            debug!(
                lead_group = lead.group_id,
                lead_variant = %lead.variant_id,
                "hand dealt"
            );
        }
        Ok(Self { slots: hand })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Arc<CardRecord>> {
        self.slots.get(slot)
    }

    pub fn cards(&self) -> &[Arc<CardRecord>] {
        &self.slots
    }

    pub fn visuals(&self) -> Vec<VisualRef> {
        self.slots.iter().map(|card| card.visual.clone()).collect()
    }
}

/// The slot the player must find, plus the differently-drawn card shown as the problem.
#[derive(Debug, Clone)]
pub struct ProblemReference {
    pub slot: usize,
    pub answer: Arc<CardRecord>,
    pub alternate: Option<Arc<CardRecord>>,
}

impl ProblemReference {
    /// Picks the answer slot uniformly and looks up another variant of the same group.
    pub fn choose(hand: &Hand, catalog: &Catalog, rng: &mut RngState) -> Option<Self> {
        if hand.is_empty() {
            return None;
        }
        let slot = rng.index(hand.len());
        let answer = Arc::clone(hand.get(slot)?);
        let alternate = catalog.alternate_variant(&answer).cloned();
        if alternate.is_none() {
            warn!(
                group_id = answer.group_id,
                variant_id = %answer.variant_id,
                "no other variant in group; problem reuses the hand art"
            );
        }
        Some(Self {
            slot,
            answer,
            alternate,
        })
    }

    /// Visual to show as the problem. Falls back to the answer's own art.
    pub fn visual(&self) -> &VisualRef {
        self.alternate
            .as_ref()
            .map(|card| &card.visual)
            .unwrap_or(&self.answer.visual)
    }

    pub fn same_art(&self) -> bool {
        self.alternate.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn catalog(rows: &[(i64, &str)]) -> Catalog {
        Catalog::new(rows.iter().map(|(group, variant)| {
            CardRecord::new(*group, *variant, VisualRef::new(*variant, *variant))
        }))
    }

    #[test]
    fn hands_never_repeat_a_group() {
        let catalog = catalog(&[
            (1, "1a"),
            (1, "1b"),
            (2, "2a"),
            (2, "2b"),
            (3, "3a"),
            (4, "4a"),
            (4, "4b"),
            (5, "5a"),
        ]);
        for seed in 0..200 {
            let mut rng = RngState::from_seed(seed);
            let hand = Hand::deal(&catalog, 4, &mut rng).expect("deal");
            assert_eq!(hand.len(), 4);
            let groups: HashSet<i64> = hand.cards().iter().map(|c| c.group_id).collect();
            assert_eq!(groups.len(), 4);
            let problem = ProblemReference::choose(&hand, &catalog, &mut rng).expect("problem");
            assert!(problem.slot < hand.len());
            assert_eq!(hand.get(problem.slot).map(|c| c.group_id), Some(problem.answer.group_id));
        }
    }

    #[test]
    fn too_few_groups_is_an_error() {
        let catalog = catalog(&[(1, "1a"), (1, "1b"), (2, "2a")]);
        let mut rng = RngState::from_seed(3);
        let err = Hand::deal(&catalog, 4, &mut rng).expect_err("short hand");
        assert!(matches!(
            err,
            RoundError::InsufficientHandSize {
                required: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn zero_slots_is_an_error() {
        let catalog = catalog(&[(1, "1a"), (2, "2a")]);
        let mut rng = RngState::from_seed(3);
        let err = Hand::deal(&catalog, 0, &mut rng).expect_err("no slots");
        assert!(matches!(err, RoundError::NoHandSlots));
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let mut rng = RngState::from_seed(3);
        let err = Hand::deal(&Catalog::default(), 4, &mut rng).expect_err("empty");
        assert!(matches!(err, RoundError::EmptyCatalog));
    }

    #[test]
    fn problem_prefers_another_variant() {
        let catalog = catalog(&[(1, "1a"), (1, "1b"), (2, "2a"), (3, "3a")]);
        for seed in 0..50 {
            let mut rng = RngState::from_seed(seed);
            let hand = Hand::deal(&catalog, 3, &mut rng).expect("deal");
            let problem = ProblemReference::choose(&hand, &catalog, &mut rng).expect("problem");
            if problem.answer.group_id == 1 {
                let alt = problem.alternate.as_ref().expect("alternate");
                assert_ne!(alt.variant_id, problem.answer.variant_id);
                assert!(!problem.same_art());
            } else {
                assert!(problem.same_art());
                assert_eq!(problem.visual(), &problem.answer.visual);
            }
        }
    }
}
