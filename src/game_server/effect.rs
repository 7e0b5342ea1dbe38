//! Timed flags with lazy expiry.
//!
//! Effects, weather and on-screen visuals all share this shape: a flag plus
//! the simulation time at which it lapses. Nothing is scheduled; whoever
//! reads the flag clears it once the clock passes the expiry.

use serde::{Deserialize, Serialize};

use crate::game_server::config::Millis;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedFlag {
    pub active: bool,
    pub expires_at: Millis,
}

impl TimedFlag {
    /// Raise the flag until `now + duration`, replacing any previous expiry.
    pub fn activate(&mut self, now: Millis, duration: Millis) {
        self.active = true;
        self.expires_at = now + duration;
    }

    /// Whether the flag is set and has not yet lapsed at `now`.
    pub fn is_active(&self, now: Millis) -> bool {
        self.active && now < self.expires_at
    }

    /// Clear the flag if it has lapsed. Returns the resulting state.
    pub fn refresh(&mut self, now: Millis) -> bool {
        if self.active && now >= self.expires_at {
            self.active = false;
        }
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_until_expiry() {
        let mut flag = TimedFlag::default();
        flag.activate(1000, 500);
        assert!(flag.is_active(1000));
        assert!(flag.is_active(1499));
        assert!(!flag.is_active(1500));
    }

    #[test]
    fn refresh_clears_lapsed_flag() {
        let mut flag = TimedFlag::default();
        flag.activate(0, 100);
        assert!(flag.refresh(99));
        assert!(!flag.refresh(100));
        assert!(!flag.active);
    }

    #[test]
    fn reactivation_extends_expiry() {
        let mut flag = TimedFlag::default();
        flag.activate(0, 100);
        flag.activate(80, 100);
        assert_eq!(flag.expires_at, 180);
        assert!(flag.refresh(150));
    }
}
