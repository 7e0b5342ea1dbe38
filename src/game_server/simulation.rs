//! Simulation - Game server wrapping the race for the host
//!
//! Turns wall-clock frames into race ticks, settles bets when a race
//! ends and keeps the in-memory history. This is the interface the Tauri
//! commands talk to.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{RaceError, RaceResult};
use crate::game_server::betting::{BettingState, RaceHistory, RaceHistoryEntry};
use crate::game_server::config::{Millis, RaceConfig};
use crate::game_server::input::{self, PlayerAction};
use crate::game_server::race::{GameStatus, Race, RaceSnapshot};
use crate::game_server::racer::RacerId;

/// Number of tick durations kept for the rolling average
const TICK_WINDOW: usize = 60;

/// Server statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStats {
    pub ticks: u64,
    pub avg_tick_time_ms: f32,
    pub racer_count: u32,
    pub game_status: GameStatus,
    pub paused: bool,
    pub races_run: u32,
}

/// Main game server
pub struct GameServer {
    race: Race,
    betting: BettingState,
    history: RaceHistory,
    /// Host frames do not advance the race while set
    paused: bool,
    /// Last wall-clock tick
    last_tick: Instant,
    /// Recent tick durations for averaging
    tick_times: Vec<f32>,
    ticks: u64,
}

impl GameServer {
    /// Create a new game server with default settings
    pub fn new() -> Self {
        Self::with_config(RaceConfig::default())
    }

    pub fn with_config(config: RaceConfig) -> Self {
        Self {
            betting: BettingState::new(config.starting_coins),
            history: RaceHistory::new(&config),
            race: Race::new(config),
            paused: false,
            last_tick: Instant::now(),
            tick_times: Vec::with_capacity(TICK_WINDOW),
            ticks: 0,
        }
    }

    /// Replace the race configuration. Any running race is abandoned and
    /// its stake refunded; coins and history are kept.
    pub fn configure(&mut self, config: RaceConfig) -> RaceResult<()> {
        config.validate()?;
        self.betting.refund();
        self.race = Race::new(config);
        self.paused = false;
        log::info!("Race reconfigured");
        Ok(())
    }

    /// Start (or restart) the race countdown
    pub fn start_race(&mut self) -> bool {
        if !self.race.start() {
            return false;
        }
        self.betting.lock();
        self.paused = false;
        self.last_tick = Instant::now();
        true
    }

    /// Advance by the wall-clock time since the previous call
    pub fn tick(&mut self) -> RaceSnapshot {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_millis() as Millis;
        self.last_tick = now;
        self.advance(delta)
    }

    /// Advance by an explicit amount of simulated time
    pub fn advance(&mut self, delta_ms: Millis) -> RaceSnapshot {
        if self.paused {
            return self.get_snapshot();
        }

        let tick_start = Instant::now();

        if let Some(winner) = self.race.advance(delta_ms) {
            self.finish(winner);
        }

        self.ticks += 1;
        let tick_time = tick_start.elapsed().as_secs_f32() * 1000.0;
        self.tick_times.push(tick_time);
        if self.tick_times.len() > TICK_WINDOW {
            self.tick_times.remove(0);
        }

        self.get_snapshot()
    }

    fn finish(&mut self, winner: RacerId) {
        let (bet_correct, coins_won) = self
            .betting
            .settle(winner, self.race.config().payout_multiplier);
        let entry = self
            .history
            .record(winner, self.race.elapsed(), bet_correct, coins_won);
        log::info!(
            "Race {} won by {} (bet correct: {}, coins won: {})",
            entry.race_number,
            entry.winner_name,
            bet_correct,
            coins_won
        );
    }

    pub fn feed_treat(&mut self, id: RacerId) -> bool {
        self.race.feed_treat(id)
    }

    pub fn activate_cheetah(&mut self, id: RacerId) -> bool {
        self.race.activate_cheetah(id)
    }

    /// Apply a keyboard shortcut. Returns the action if one was applied.
    pub fn handle_key(&mut self, key: char, modifier: bool) -> Option<PlayerAction> {
        let action = input::action_for_key(key, modifier)?;
        let applied = match action {
            PlayerAction::FeedTreat(id) => self.feed_treat(id),
            PlayerAction::ActivateCheetah(id) => self.activate_cheetah(id),
        };
        applied.then_some(action)
    }

    /// Bet on a dog for the next race
    pub fn place_bet(&mut self, id: RacerId, amount: u32) -> RaceResult<()> {
        if matches!(
            self.race.status(),
            GameStatus::Countdown | GameStatus::Racing
        ) {
            return Err(RaceError::BetRejected("betting is closed while a race runs"));
        }
        self.betting.place(id, amount)
    }

    pub fn cancel_bet(&mut self) {
        self.betting.cancel();
    }

    /// Latest published race snapshot
    pub fn get_snapshot(&self) -> RaceSnapshot {
        self.race.snapshot().clone()
    }

    pub fn get_betting(&self) -> BettingState {
        self.betting.clone()
    }

    /// Finished races, newest first
    pub fn get_history(&self) -> Vec<RaceHistoryEntry> {
        self.history.entries()
    }

    /// Get server statistics
    pub fn get_stats(&self) -> ServerStats {
        let avg_tick_time = if self.tick_times.is_empty() {
            0.0
        } else {
            self.tick_times.iter().sum::<f32>() / self.tick_times.len() as f32
        };

        ServerStats {
            ticks: self.ticks,
            avg_tick_time_ms: avg_tick_time,
            racer_count: self.race.store().len() as u32,
            game_status: self.race.status(),
            paused: self.paused,
            races_run: self.history.races_run(),
        }
    }

    pub fn get_status(&self) -> GameStatus {
        self.race.status()
    }

    pub fn race(&self) -> &Race {
        &self.race
    }

    /// Back to the ready screen. Coins and history survive.
    pub fn reset(&mut self) {
        let config = self.race.config().clone();
        self.betting.refund();
        self.race = Race::new(config);
        self.paused = false;
        self.tick_times.clear();
        log::info!("Race reset");
    }

    /// Pause the simulation
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the simulation
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last_tick = Instant::now();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for GameServer {
    fn default() -> Self {
        Self::new()
    }
}
