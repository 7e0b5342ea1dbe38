//! Betting - Coin wallet, single-dog bets and the finished-race history
//!
//! Everything here lives in memory for the lifetime of the server.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{RaceError, RaceResult};
use crate::game_server::config::{Millis, RaceConfig};
use crate::game_server::racer::RacerId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingState {
    pub selected: Option<RacerId>,
    pub bet_amount: u32,
    pub total_coins: u32,
    /// Stake has been taken for the race in progress
    pub locked: bool,
}

impl BettingState {
    pub fn new(starting_coins: u32) -> Self {
        Self {
            selected: None,
            bet_amount: 0,
            total_coins: starting_coins,
            locked: false,
        }
    }

    /// Choose a dog and a stake for the next race. Replaces any earlier pick.
    pub fn place(&mut self, id: RacerId, amount: u32) -> RaceResult<()> {
        if self.locked {
            return Err(RaceError::BetRejected("betting is closed while a race runs"));
        }
        if amount == 0 {
            return Err(RaceError::BetRejected("stake must be at least one coin"));
        }
        if amount > self.total_coins {
            return Err(RaceError::BetRejected("not enough coins"));
        }
        self.selected = Some(id);
        self.bet_amount = amount;
        Ok(())
    }

    pub fn cancel(&mut self) {
        if !self.locked {
            self.selected = None;
            self.bet_amount = 0;
        }
    }

    /// Take the stake when the race starts.
    pub fn lock(&mut self) {
        if self.selected.is_some() {
            self.total_coins -= self.bet_amount;
            self.locked = true;
        }
    }

    /// Pay out (or not) against the winner and clear the bet.
    /// Returns `(bet_correct, coins_won)`.
    pub fn settle(&mut self, winner: RacerId, payout_multiplier: u32) -> (bool, u32) {
        if !self.locked {
            return (false, 0);
        }
        let correct = self.selected == Some(winner);
        let won = if correct {
            self.bet_amount.saturating_mul(payout_multiplier)
        } else {
            0
        };
        self.total_coins = self.total_coins.saturating_add(won);
        self.selected = None;
        self.bet_amount = 0;
        self.locked = false;
        (correct, won)
    }

    /// Give the stake back for a race that never finished.
    pub fn refund(&mut self) {
        if self.locked {
            self.total_coins += self.bet_amount;
            self.locked = false;
        }
    }
}

/// One finished race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceHistoryEntry {
    pub race_number: u32,
    pub winner: RacerId,
    pub winner_name: String,
    pub finished_at_ms: Millis,
    pub bet_correct: bool,
    pub coins_won: u32,
}

#[derive(Debug, Clone)]
pub struct RaceHistory {
    entries: VecDeque<RaceHistoryEntry>,
    limit: usize,
    races_run: u32,
}

impl RaceHistory {
    pub fn new(config: &RaceConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.history_limit),
            limit: config.history_limit,
            races_run: 0,
        }
    }

    pub fn record(
        &mut self,
        winner: RacerId,
        finished_at_ms: Millis,
        bet_correct: bool,
        coins_won: u32,
    ) -> &RaceHistoryEntry {
        self.races_run += 1;
        self.entries.push_front(RaceHistoryEntry {
            race_number: self.races_run,
            winner,
            winner_name: winner.name().to_string(),
            finished_at_ms,
            bet_correct,
            coins_won,
        });
        self.entries.truncate(self.limit.max(1));
        &self.entries[0]
    }

    /// Most recent race first
    pub fn entries(&self) -> Vec<RaceHistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn races_run(&self) -> u32 {
        self.races_run
    }
}
