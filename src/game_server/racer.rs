//! Racer - The dog roster and per-dog race state
//!
//! The roster is fixed: five dogs, known at compile time. Each dog carries
//! a dynamic `RacerState` that the race loop advances every tick.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RaceError;
use crate::game_server::config::{Millis, RaceConfig};
use crate::game_server::effect::TimedFlag;

/// Position of the finish line
pub const FINISH_LINE: f32 = 100.0;

/// Upper bound for fatigue
pub const MAX_FATIGUE: f32 = 100.0;

/// Identity of a racer. The set is closed, so every id has a state slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RacerId {
    Louie,
    Freddy,
    Olive,
    Gary,
    Iko,
}

impl RacerId {
    /// Roster order; also the tie-break order at the finish line.
    pub const ALL: [RacerId; 5] = [
        RacerId::Louie,
        RacerId::Freddy,
        RacerId::Olive,
        RacerId::Gary,
        RacerId::Iko,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RacerId::Louie => "louie",
            RacerId::Freddy => "freddy",
            RacerId::Olive => "olive",
            RacerId::Gary => "gary",
            RacerId::Iko => "iko",
        }
    }

    /// Static profile for this racer
    pub fn profile(self) -> &'static Racer {
        &ROSTER[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }
}

impl fmt::Display for RacerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RacerId {
    type Err = RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RacerId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| RaceError::UnknownRacer(s.to_string()))
    }
}

/// Rendering scale class; has no effect on speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeClass {
    VerySmall,
    Small,
    Medium,
    Large,
}

/// Static racer profile
#[derive(Debug, Clone, Serialize)]
pub struct Racer {
    pub id: RacerId,
    pub name: &'static str,
    pub breed: &'static str,
    pub color: &'static str,
    pub collar_color: &'static str,
    pub size: SizeClass,
}

pub static ROSTER: [Racer; 5] = [
    Racer {
        id: RacerId::Louie,
        name: "Louis",
        breed: "Maltipoo",
        color: "#4A4A4A",
        collar_color: "#E63946",
        size: SizeClass::VerySmall,
    },
    Racer {
        id: RacerId::Freddy,
        name: "Freddy",
        breed: "Poodle",
        color: "#FFFFFF",
        collar_color: "#457B9D",
        size: SizeClass::Small,
    },
    Racer {
        id: RacerId::Olive,
        name: "Olive",
        breed: "Golden Retriever",
        color: "#F5DEB3",
        collar_color: "#2A9D8F",
        size: SizeClass::Large,
    },
    Racer {
        id: RacerId::Gary,
        name: "Gary Pancakes",
        breed: "Dachshund",
        color: "#A0522D",
        collar_color: "#F4A261",
        size: SizeClass::Small,
    },
    Racer {
        id: RacerId::Iko,
        name: "Iko",
        breed: "Golden Retriever",
        color: "#DAA520",
        collar_color: "#9B5DE5",
        size: SizeClass::Large,
    },
];

/// Complete dynamic state for a single racer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacerState {
    pub id: RacerId,
    /// Progress along the track, 0..=100
    pub position: f32,
    /// Speed before modifiers (track units per tick)
    pub base_speed: f32,
    /// Speed applied on the last tick
    pub current_speed: f32,
    pub boosted: TimedFlag,
    pub cheetah_mode: TimedFlag,
    pub distracted_by_cat: TimedFlag,
    /// Chasing a ball. Speeds the dog up despite the name.
    pub fatigued_by_ball: TimedFlag,
    pub barking: TimedFlag,
    pub treats_used: u32,
    pub cheetah_used: u32,
    /// 0..=100; each point costs half a percent of speed
    pub fatigue: f32,
}

impl RacerState {
    /// Create a racer on the start line
    pub fn new(id: RacerId, base_speed: f32) -> Self {
        Self {
            id,
            position: 0.0,
            base_speed,
            current_speed: 0.0,
            boosted: TimedFlag::default(),
            cheetah_mode: TimedFlag::default(),
            distracted_by_cat: TimedFlag::default(),
            fatigued_by_ball: TimedFlag::default(),
            barking: TimedFlag::default(),
            treats_used: 0,
            cheetah_used: 0,
            fatigue: 0.0,
        }
    }

    pub fn finished(&self) -> bool {
        self.position >= FINISH_LINE
    }

    pub fn add_fatigue(&mut self, amount: f32) {
        self.fatigue = (self.fatigue + amount).min(MAX_FATIGUE);
    }

    /// Drop every effect whose expiry has passed.
    pub fn refresh_effects(&mut self, now: Millis) {
        self.boosted.refresh(now);
        self.cheetah_mode.refresh(now);
        self.distracted_by_cat.refresh(now);
        self.fatigued_by_ball.refresh(now);
        self.barking.refresh(now);
    }

    /// Multiplier from the highest-precedence live effect:
    /// cat, then ball chase, then cheetah, then treat boost.
    pub fn effect_multiplier(&self, now: Millis, config: &RaceConfig) -> f32 {
        if self.distracted_by_cat.is_active(now) {
            config.cat_multiplier
        } else if self.fatigued_by_ball.is_active(now) {
            config.ball_multiplier
        } else if self.cheetah_mode.is_active(now) {
            config.cheetah_multiplier
        } else if self.boosted.is_active(now) {
            config.treat_multiplier
        } else {
            1.0
        }
    }

    /// Speed factor from fatigue, between 0.5 and 1.0
    pub fn fatigue_penalty(&self) -> f32 {
        1.0 - self.fatigue / (2.0 * MAX_FATIGUE)
    }
}

/// Per-tick racer movement
pub struct Stride;

impl Stride {
    /// Advance one racer by one tick. Returns true if the racer is on the
    /// finish line afterwards.
    pub fn update<R: Rng>(
        state: &mut RacerState,
        now: Millis,
        weather_multiplier: f32,
        config: &RaceConfig,
        rng: &mut R,
    ) -> bool {
        state.refresh_effects(now);
        state.fatigue = (state.fatigue - config.fatigue_decay).clamp(0.0, MAX_FATIGUE);

        let random_factor = 1.0 + (rng.gen::<f32>() - 0.5) * config.speed_jitter;
        state.current_speed = state.base_speed
            * random_factor
            * state.effect_multiplier(now, config)
            * weather_multiplier
            * state.fatigue_penalty();

        state.position = (state.position + state.current_speed).clamp(state.position, FINISH_LINE);
        state.finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn roster_is_indexed_by_id() {
        for id in RacerId::ALL {
            assert_eq!(id.profile().id, id);
        }
        assert_eq!(RacerId::Gary.name(), "Gary Pancakes");
    }

    #[test]
    fn parse_known_and_unknown_ids() {
        assert_eq!("olive".parse::<RacerId>().unwrap(), RacerId::Olive);
        let err = "rex".parse::<RacerId>().unwrap_err();
        assert!(matches!(err, RaceError::UnknownRacer(ref s) if s == "rex"));
    }

    #[test]
    fn effect_precedence() {
        let config = RaceConfig::default();
        let mut state = RacerState::new(RacerId::Iko, 1.0);
        state.boosted.activate(0, 1000);
        assert_eq!(state.effect_multiplier(0, &config), 1.5);
        state.cheetah_mode.activate(0, 1000);
        assert_eq!(state.effect_multiplier(0, &config), 3.0);
        state.fatigued_by_ball.activate(0, 1000);
        assert_eq!(state.effect_multiplier(0, &config), 1.8);
        state.distracted_by_cat.activate(0, 1000);
        assert_eq!(state.effect_multiplier(0, &config), 0.3);
        assert_eq!(state.effect_multiplier(1000, &config), 1.0);
    }

    #[test]
    fn fatigue_is_capped_and_penalty_bounded() {
        let mut state = RacerState::new(RacerId::Louie, 1.0);
        state.add_fatigue(80.0);
        state.add_fatigue(80.0);
        assert_eq!(state.fatigue, MAX_FATIGUE);
        assert_eq!(state.fatigue_penalty(), 0.5);
    }

    #[test]
    fn stride_clamps_at_finish_line() {
        let config = RaceConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = RacerState::new(RacerId::Olive, 5.0);
        state.position = 98.0;
        assert!(Stride::update(&mut state, 0, 1.1, &config, &mut rng));
        assert_eq!(state.position, FINISH_LINE);
    }

    #[test]
    fn stride_decays_fatigue_and_clears_expired_effects() {
        let config = RaceConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = RacerState::new(RacerId::Freddy, 0.1);
        state.fatigue = 0.2;
        state.boosted.activate(0, 100);
        Stride::update(&mut state, 100, 1.0, &config, &mut rng);
        assert_eq!(state.fatigue, 0.0);
        assert!(!state.boosted.active);
    }

    #[test]
    fn speed_combines_effect_weather_and_fatigue() {
        let config = RaceConfig::default().with_speed_jitter(0.0);
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = RacerState::new(RacerId::Iko, 0.02);
        state.fatigue = 40.0;
        state.cheetah_mode.activate(0, 4000);

        Stride::update(&mut state, 10, config.rainy_multiplier, &config, &mut rng);

        // 40 fatigue decays to 39.5 before the penalty applies
        let expected = 0.02 * 3.0 * 0.8 * (1.0 - 39.5 / 200.0);
        assert!((state.current_speed - expected).abs() < 1e-6);
        assert!((state.position - expected).abs() < 1e-6);
    }

    #[test]
    fn position_never_moves_backwards() {
        let config = RaceConfig {
            sunny_multiplier: -1.0,
            ..RaceConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(6);
        let mut state = RacerState::new(RacerId::Louie, 0.015);
        state.position = 10.0;
        Stride::update(&mut state, 0, config.sunny_multiplier, &config, &mut rng);
        assert_eq!(state.position, 10.0);
    }

    #[test]
    fn jitter_stays_within_six_percent() {
        let config = RaceConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let mut state = RacerState::new(RacerId::Gary, 1.0);
            Stride::update(&mut state, 0, 1.0, &config, &mut rng);
            assert!(state.current_speed >= 0.94 && state.current_speed <= 1.06);
        }
    }
}
