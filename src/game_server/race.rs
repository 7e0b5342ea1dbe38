//! Race - Status machine and the per-tick update loop
//!
//! `Race` owns every piece of mutable race state. The host feeds it time
//! through `advance`; each call is one tick. Readers only ever see the
//! published `RaceSnapshot`, refreshed at most once per publish interval.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::game_server::commentary::{Commentary, CommentaryLine};
use crate::game_server::config::{Millis, RaceConfig};
use crate::game_server::events::{EventScheduler, Weather};
use crate::game_server::powerups;
use crate::game_server::racer::{RacerId, RacerState, Stride};
use crate::game_server::store::RaceStore;

/// Overall game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Ready,
    Countdown,
    Racing,
    Finished,
}

/// Read-only view of the race handed to the front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub status: GameStatus,
    pub countdown: u32,
    pub weather: Weather,
    pub winner: Option<RacerId>,
    pub leader: Option<RacerId>,
    pub commentary: Option<String>,
    pub racers: Vec<RacerState>,
    pub cat_crossing: bool,
    pub ball_thrown: bool,
    /// Time since the start gun
    pub elapsed_ms: Millis,
}

impl RaceSnapshot {
    pub fn racer(&self, id: RacerId) -> &RacerState {
        &self.racers[id.index()]
    }
}

/// Complete race state
#[derive(Debug)]
pub struct Race {
    config: RaceConfig,
    status: GameStatus,
    /// Simulation clock
    now: Millis,
    countdown: u32,
    countdown_elapsed: Millis,
    started_at: Option<Millis>,
    store: RaceStore,
    events: EventScheduler,
    commentary: Commentary,
    winner: Option<RacerId>,
    rng: StdRng,
    published: RaceSnapshot,
    last_publish: Millis,
}

impl Race {
    /// Create an idle race with the given configuration
    pub fn new(config: RaceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let store = RaceStore::new(config.base_speed);
        let commentary = Commentary::new(config.commentary_limit);
        let mut race = Self {
            status: GameStatus::Ready,
            now: 0,
            countdown: config.countdown_from,
            countdown_elapsed: 0,
            started_at: None,
            store,
            events: EventScheduler::new(0),
            commentary,
            winner: None,
            rng,
            published: RaceSnapshot {
                status: GameStatus::Ready,
                countdown: config.countdown_from,
                weather: Weather::Sunny,
                winner: None,
                leader: None,
                commentary: None,
                racers: Vec::new(),
                cat_crossing: false,
                ball_thrown: false,
                elapsed_ms: 0,
            },
            last_publish: 0,
            config,
        };
        race.publish();
        race
    }

    /// Reset everything and enter the countdown. Ignored while a race is
    /// already counting down or running.
    pub fn start(&mut self) -> bool {
        if matches!(self.status, GameStatus::Countdown | GameStatus::Racing) {
            log::debug!("start ignored: race already {:?}", self.status);
            return false;
        }

        self.store.reset(self.config.base_speed);
        self.events = EventScheduler::new(self.now);
        self.commentary.reset(self.now);
        self.winner = None;
        self.started_at = None;
        self.countdown = self.config.countdown_from;
        self.countdown_elapsed = 0;
        self.status = GameStatus::Countdown;
        log::info!("Race countdown started");

        if self.countdown == 0 {
            self.begin_racing();
        }
        self.publish();
        true
    }

    /// Advance the simulation clock by `delta_ms` and run one tick.
    /// Returns the winner on the tick the race is decided.
    pub fn advance(&mut self, delta_ms: Millis) -> Option<RacerId> {
        self.now += delta_ms;

        match self.status {
            GameStatus::Ready | GameStatus::Finished => None,

            GameStatus::Countdown => {
                self.countdown_elapsed += delta_ms;
                while self.status == GameStatus::Countdown
                    && self.countdown_elapsed >= self.config.countdown_step_ms
                {
                    self.countdown_elapsed -= self.config.countdown_step_ms;
                    self.countdown = self.countdown.saturating_sub(1);
                    if self.countdown == 0 {
                        self.begin_racing();
                    }
                }
                self.maybe_publish();
                None
            }

            GameStatus::Racing => self.tick_racing(),
        }
    }

    fn begin_racing(&mut self) {
        self.status = GameStatus::Racing;
        self.started_at = Some(self.now);
        self.events = EventScheduler::new(self.now);
        self.commentary.reset(self.now);
        self.commentary.push(self.now, "And they're off!");
        log::info!("Race started at {}ms", self.now);
    }

    fn tick_racing(&mut self) -> Option<RacerId> {
        let now = self.now;

        let fired = self.events.step(
            now,
            &mut self.store,
            &mut self.commentary,
            &self.config,
            &mut self.rng,
        );
        for event in fired {
            log::debug!("{:?} at {}ms", event, now);
        }
        let weather = self.events.weather().speed_multiplier(&self.config);

        // First racer in roster order to reach the line wins
        let mut winner = None;
        for racer in self.store.iter_mut() {
            let crossed = Stride::update(racer, now, weather, &self.config, &mut self.rng);
            if crossed && winner.is_none() {
                winner = Some(racer.id);
            }
        }

        self.commentary
            .observe(now, &self.store, &self.config, &mut self.rng);

        match winner {
            Some(id) => {
                self.winner = Some(id);
                self.status = GameStatus::Finished;
                self.commentary.push(now, format!("{} wins!", id.name()));
                log::info!("{} wins after {}ms", id.name(), self.elapsed());
                self.publish();
            }
            None => self.maybe_publish(),
        }
        winner
    }

    /// Feed a treat to one racer. No-op outside a running race or past the cap.
    pub fn feed_treat(&mut self, id: RacerId) -> bool {
        if self.status != GameStatus::Racing {
            log::debug!("treat for {} ignored: status {:?}", id, self.status);
            return false;
        }
        let applied = powerups::feed_treat(self.store.get_mut(id), self.now, &self.config);
        if applied {
            self.commentary
                .push(self.now, format!("{} gobbles a treat! Woof!", id.name()));
        }
        applied
    }

    /// Unlock cheetah mode for one racer. No-op outside a running race or past the cap.
    pub fn activate_cheetah(&mut self, id: RacerId) -> bool {
        if self.status != GameStatus::Racing {
            log::debug!("cheetah for {} ignored: status {:?}", id, self.status);
            return false;
        }
        let applied = powerups::activate_cheetah(self.store.get_mut(id), self.now, &self.config);
        if applied {
            self.commentary
                .push(self.now, format!("{} unlocks cheetah speed!", id.name()));
        }
        applied
    }

    fn maybe_publish(&mut self) {
        if self.now.saturating_sub(self.last_publish) > self.config.publish_interval_ms {
            self.publish();
        }
    }

    fn publish(&mut self) {
        self.published = self.build_snapshot();
        self.last_publish = self.now;
        log::trace!("published snapshot at {}ms", self.now);
    }

    fn build_snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            status: self.status,
            countdown: self.countdown,
            weather: self.events.weather(),
            winner: self.winner,
            leader: self.leader(),
            commentary: self.commentary.latest().map(|l| l.text.clone()),
            racers: self.store.snapshot(),
            cat_crossing: self.events.cat_crossing(),
            ball_thrown: self.events.ball_thrown(),
            elapsed_ms: self.elapsed(),
        }
    }

    /// Most recently published snapshot
    pub fn snapshot(&self) -> &RaceSnapshot {
        &self.published
    }

    /// Current leader, if the race has left the start line
    pub fn leader(&self) -> Option<RacerId> {
        self.store
            .standings()
            .first()
            .filter(|r| r.position > 0.0)
            .map(|r| r.id)
    }

    pub fn elapsed(&self) -> Millis {
        self.started_at.map_or(0, |t| self.now - t)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<RacerId> {
        self.winner
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn racer(&self, id: RacerId) -> &RacerState {
        self.store.get(id)
    }

    pub fn store(&self) -> &RaceStore {
        &self.store
    }

    pub fn commentary(&self) -> Vec<CommentaryLine> {
        self.commentary.lines().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut RaceStore {
        &mut self.store
    }
}
