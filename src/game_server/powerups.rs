//! Power-ups - Player-triggered boosts with per-race usage caps
//!
//! These only touch a single racer's state. Whether the race is actually
//! running is checked by the caller.

use crate::game_server::config::{Millis, RaceConfig};
use crate::game_server::racer::RacerState;

/// Feed a treat: short speed boost and a bark. Returns false past the cap.
pub fn feed_treat(state: &mut RacerState, now: Millis, config: &RaceConfig) -> bool {
    if state.treats_used >= config.max_treats {
        return false;
    }
    state.boosted.activate(now, config.treat_duration_ms);
    state.barking.activate(now, config.bark_duration_ms);
    state.treats_used += 1;
    state.add_fatigue(config.treat_fatigue);
    true
}

/// Unlock cheetah mode: long, strong boost. Returns false past the cap.
pub fn activate_cheetah(state: &mut RacerState, now: Millis, config: &RaceConfig) -> bool {
    if state.cheetah_used >= config.max_cheetahs {
        return false;
    }
    state.cheetah_mode.activate(now, config.cheetah_duration_ms);
    state.cheetah_used += 1;
    state.add_fatigue(config.cheetah_fatigue);
    true
}
