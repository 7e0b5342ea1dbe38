//! Events - Random environmental events during a race
//!
//! Rain, a crossing cat and a thrown ball. Each event type has its own
//! quiet period and per-tick chance, gated on the simulation clock rather
//! than on a fixed schedule. Every reversion is an expiry timestamp.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game_server::commentary::Commentary;
use crate::game_server::config::{Millis, RaceConfig};
use crate::game_server::effect::TimedFlag;
use crate::game_server::racer::RacerId;
use crate::game_server::store::RaceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Sunny,
    Rainy,
}

impl Weather {
    pub fn speed_multiplier(self, config: &RaceConfig) -> f32 {
        match self {
            Weather::Sunny => config.sunny_multiplier,
            Weather::Rainy => config.rainy_multiplier,
        }
    }
}

/// Which event fired on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceEvent {
    RainStarted,
    RainStopped,
    CatCrossing,
    BallThrown(RacerId),
}

#[derive(Debug, Clone)]
pub struct EventScheduler {
    rain: TimedFlag,
    rain_used: bool,
    last_weather_change: Millis,
    last_cat: Millis,
    last_ball: Millis,
    cat_visual: TimedFlag,
    ball_visual: TimedFlag,
}

impl EventScheduler {
    /// Scheduler with all gates armed at `now`
    pub fn new(now: Millis) -> Self {
        Self {
            rain: TimedFlag::default(),
            rain_used: false,
            last_weather_change: now,
            last_cat: now,
            last_ball: now,
            cat_visual: TimedFlag::default(),
            ball_visual: TimedFlag::default(),
        }
    }

    pub fn weather(&self) -> Weather {
        if self.rain.active {
            Weather::Rainy
        } else {
            Weather::Sunny
        }
    }

    pub fn cat_crossing(&self) -> bool {
        self.cat_visual.active
    }

    pub fn ball_thrown(&self) -> bool {
        self.ball_visual.active
    }

    /// Run one scheduler step. Lapsed weather and visuals are cleared
    /// first, then each event type rolls independently.
    pub fn step<R: Rng>(
        &mut self,
        now: Millis,
        store: &mut RaceStore,
        commentary: &mut Commentary,
        config: &RaceConfig,
        rng: &mut R,
    ) -> Vec<RaceEvent> {
        let mut fired = Vec::new();

        if self.rain.active && !self.rain.refresh(now) {
            self.last_weather_change = now;
            commentary.push(now, "The sun is back out!");
            fired.push(RaceEvent::RainStopped);
        }
        self.cat_visual.refresh(now);
        self.ball_visual.refresh(now);

        if !self.rain_used
            && now.saturating_sub(self.last_weather_change) > config.rain_gate_ms
            && rng.gen_bool(config.rain_chance)
        {
            self.rain_used = true;
            self.rain.activate(now, config.rain_duration_ms);
            self.last_weather_change = now;
            commentary.push(now, "It's starting to rain! The track is slippery!");
            fired.push(RaceEvent::RainStarted);
        }

        if now.saturating_sub(self.last_cat) > config.cat_gate_ms
            && rng.gen_bool(config.cat_chance)
        {
            self.last_cat = now;
            self.cat_visual.activate(now, config.cat_visual_ms);
            for racer in store.iter_mut() {
                racer.distracted_by_cat.activate(now, config.cat_duration_ms);
            }
            commentary.push(now, "A cat crosses the track! The dogs are distracted!");
            fired.push(RaceEvent::CatCrossing);
        }

        if now.saturating_sub(self.last_ball) > config.ball_gate_ms
            && rng.gen_bool(config.ball_chance)
        {
            let id = RacerId::ALL[rng.gen_range(0..RacerId::ALL.len())];
            self.last_ball = now;
            self.ball_visual.activate(now, config.ball_visual_ms);
            store
                .get_mut(id)
                .fatigued_by_ball
                .activate(now, config.ball_duration_ms);
            commentary.push(now, format!("{} spots a ball and bolts after it!", id.name()));
            fired.push(RaceEvent::BallThrown(id));
        }

        fired
    }
}
