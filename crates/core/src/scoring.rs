use crate::GameConfig;

/// Points for a correct pick given the combo length *after* counting that pick.
pub fn points_for_correct(config: &GameConfig, combo: u32) -> u64 {
    if combo >= config.combo_bonus_from {
        config.base_points + config.combo_bonus
    } else {
        config.base_points
    }
}
