//! Keyboard shortcuts: number keys pick a racer, the modifier picks cheetah.

use serde::{Deserialize, Serialize};

use crate::game_server::racer::RacerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "racer", rename_all = "snake_case")]
pub enum PlayerAction {
    FeedTreat(RacerId),
    ActivateCheetah(RacerId),
}

/// Map a key press to an action. Keys `1`-`5` follow roster order.
pub fn action_for_key(key: char, modifier: bool) -> Option<PlayerAction> {
    let slot = key.to_digit(10)? as usize;
    let id = *RacerId::ALL.get(slot.checked_sub(1)?)?;
    Some(if modifier {
        PlayerAction::ActivateCheetah(id)
    } else {
        PlayerAction::FeedTreat(id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_map_to_roster() {
        assert_eq!(action_for_key('1', false), Some(PlayerAction::FeedTreat(RacerId::Louie)));
        assert_eq!(
            action_for_key('5', true),
            Some(PlayerAction::ActivateCheetah(RacerId::Iko))
        );
    }

    #[test]
    fn other_keys_do_nothing() {
        assert_eq!(action_for_key('0', false), None);
        assert_eq!(action_for_key('6', false), None);
        assert_eq!(action_for_key('q', true), None);
    }
}
