use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Selectable slots in each hand.
    pub hand_slots: usize,
    pub time_limit_secs: f32,
    /// How long correct/incorrect feedback stays up before the round ends.
    pub feedback_delay_secs: f32,
    pub rounds_per_set: u8,
    pub base_points: u64,
    pub combo_bonus: u64,
    /// Combo length at which the bonus starts to apply.
    pub combo_bonus_from: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_slots: 4,
            time_limit_secs: 30.0,
            feedback_delay_secs: 2.0,
            rounds_per_set: 3,
            base_points: 1000,
            combo_bonus: 500,
            combo_bonus_from: 2,
        }
    }
}
