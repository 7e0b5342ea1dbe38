//! Config - Race tuning parameters
//!
//! Every gameplay constant lives here so a front end (or a test) can
//! reshape the race without touching the simulation code.

use serde::{Deserialize, Serialize};

use crate::error::{RaceError, RaceResult};

/// Time in milliseconds on the simulation clock.
pub type Millis = u64;

/// Race configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Track units advanced per tick before modifiers
    pub base_speed: f32,
    /// Total width of the per-tick speed jitter (0.12 = +/-6%)
    pub speed_jitter: f32,

    /// Countdown start value (seconds shown before the race)
    pub countdown_from: u32,
    /// Countdown cadence
    pub countdown_step_ms: Millis,

    pub treat_multiplier: f32,
    pub treat_duration_ms: Millis,
    pub max_treats: u32,
    pub treat_fatigue: f32,
    pub bark_duration_ms: Millis,

    pub cheetah_multiplier: f32,
    pub cheetah_duration_ms: Millis,
    pub max_cheetahs: u32,
    pub cheetah_fatigue: f32,

    /// Fatigue removed every tick
    pub fatigue_decay: f32,

    pub sunny_multiplier: f32,
    pub rainy_multiplier: f32,
    /// Quiet period after the last weather change before rain may start
    pub rain_gate_ms: Millis,
    pub rain_chance: f64,
    pub rain_duration_ms: Millis,

    pub cat_multiplier: f32,
    pub cat_gate_ms: Millis,
    pub cat_chance: f64,
    pub cat_duration_ms: Millis,
    /// How long the crossing cat stays on screen
    pub cat_visual_ms: Millis,

    pub ball_multiplier: f32,
    pub ball_gate_ms: Millis,
    pub ball_chance: f64,
    pub ball_duration_ms: Millis,
    pub ball_visual_ms: Millis,

    /// Minimum spacing between leader checks
    pub commentary_interval_ms: Millis,
    /// Gap between the top two that counts as a close race
    pub close_gap: f32,
    pub closing_in_chance: f64,
    /// Commentary lines kept for the front end
    pub commentary_limit: usize,

    /// Render-rate throttle for snapshot publication
    pub publish_interval_ms: Millis,

    pub starting_coins: u32,
    /// Gross payout on a correct bet, as a multiple of the stake
    pub payout_multiplier: u32,
    pub history_limit: usize,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            seed: None,
            base_speed: 0.015,
            speed_jitter: 0.12,

            countdown_from: 3,
            countdown_step_ms: 1000,

            treat_multiplier: 1.5,
            treat_duration_ms: 2000,
            max_treats: 5,
            treat_fatigue: 15.0,
            bark_duration_ms: 600,

            cheetah_multiplier: 3.0,
            cheetah_duration_ms: 4000,
            max_cheetahs: 3,
            cheetah_fatigue: 20.0,

            fatigue_decay: 0.5,

            sunny_multiplier: 1.1,
            rainy_multiplier: 0.8,
            rain_gate_ms: 10_000,
            rain_chance: 0.01,
            rain_duration_ms: 7000,

            cat_multiplier: 0.3,
            cat_gate_ms: 15_000,
            cat_chance: 0.005,
            cat_duration_ms: 2000,
            cat_visual_ms: 3000,

            ball_multiplier: 1.8,
            ball_gate_ms: 15_000,
            ball_chance: 0.005,
            ball_duration_ms: 3000,
            ball_visual_ms: 3000,

            commentary_interval_ms: 3000,
            close_gap: 5.0,
            closing_in_chance: 0.3,
            commentary_limit: 20,

            publish_interval_ms: 16,

            starting_coins: 100,
            payout_multiplier: 4,
            history_limit: 20,
        }
    }
}

impl RaceConfig {
    /// Parse a (possibly partial) JSON configuration; missing fields keep their defaults.
    pub fn from_json(json: &str) -> RaceResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the RNG seed for a reproducible race.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_base_speed(mut self, speed: f32) -> Self {
        self.base_speed = speed;
        self
    }

    /// Override all three random-event probabilities at once.
    pub fn with_event_chances(mut self, rain: f64, cat: f64, ball: f64) -> Self {
        self.rain_chance = rain;
        self.cat_chance = cat;
        self.ball_chance = ball;
        self
    }

    pub fn with_speed_jitter(mut self, jitter: f32) -> Self {
        self.speed_jitter = jitter;
        self
    }

    pub fn validate(&self) -> RaceResult<()> {
        if !(self.base_speed > 0.0) {
            return Err(RaceError::InvalidConfig("base_speed must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.speed_jitter) {
            return Err(RaceError::InvalidConfig("speed_jitter must be in [0, 1)".into()));
        }
        let chances = [
            ("rain_chance", self.rain_chance),
            ("cat_chance", self.cat_chance),
            ("ball_chance", self.ball_chance),
            ("closing_in_chance", self.closing_in_chance),
        ];
        for (name, p) in chances {
            if !(0.0..=1.0).contains(&p) {
                return Err(RaceError::InvalidConfig(format!("{name} must be in [0, 1]")));
            }
        }
        let multipliers = [
            ("treat_multiplier", self.treat_multiplier),
            ("cheetah_multiplier", self.cheetah_multiplier),
            ("sunny_multiplier", self.sunny_multiplier),
            ("rainy_multiplier", self.rainy_multiplier),
            ("cat_multiplier", self.cat_multiplier),
            ("ball_multiplier", self.ball_multiplier),
        ];
        for (name, m) in multipliers {
            if !(m > 0.0) {
                return Err(RaceError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        let fatigue = [
            ("treat_fatigue", self.treat_fatigue),
            ("cheetah_fatigue", self.cheetah_fatigue),
            ("fatigue_decay", self.fatigue_decay),
        ];
        for (name, f) in fatigue {
            if !(f >= 0.0) {
                return Err(RaceError::InvalidConfig(format!("{name} must not be negative")));
            }
        }
        let durations = [
            ("countdown_step_ms", self.countdown_step_ms),
            ("treat_duration_ms", self.treat_duration_ms),
            ("bark_duration_ms", self.bark_duration_ms),
            ("cheetah_duration_ms", self.cheetah_duration_ms),
            ("rain_duration_ms", self.rain_duration_ms),
            ("cat_duration_ms", self.cat_duration_ms),
            ("cat_visual_ms", self.cat_visual_ms),
            ("ball_duration_ms", self.ball_duration_ms),
            ("ball_visual_ms", self.ball_visual_ms),
        ];
        for (name, ms) in durations {
            if ms == 0 {
                return Err(RaceError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_game_rules() {
        let config = RaceConfig::default();
        assert_eq!(config.max_treats, 5);
        assert_eq!(config.max_cheetahs, 3);
        assert_eq!(config.treat_duration_ms, 2000);
        assert_eq!(config.cheetah_duration_ms, 4000);
        assert_eq!(config.publish_interval_ms, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RaceConfig::from_json(r#"{ "seed": 7, "cat_chance": 1.0 }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.cat_chance, 1.0);
        assert_eq!(config.max_treats, 5);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = RaceConfig::from_json("{ seed: ").unwrap_err();
        assert!(matches!(err, RaceError::Config(_)));
    }

    #[test]
    fn out_of_range_probability_rejected() {
        let err = RaceConfig::from_json(r#"{ "rain_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(err, RaceError::InvalidConfig(_)));
    }

    fn rejected(json: &str) -> bool {
        matches!(RaceConfig::from_json(json), Err(RaceError::InvalidConfig(_)))
    }

    #[test]
    fn non_positive_multipliers_rejected() {
        for field in [
            "treat_multiplier",
            "cheetah_multiplier",
            "sunny_multiplier",
            "rainy_multiplier",
            "cat_multiplier",
            "ball_multiplier",
        ] {
            assert!(rejected(&format!(r#"{{ "{field}": -1.0 }}"#)), "{field} -1");
            assert!(rejected(&format!(r#"{{ "{field}": 0.0 }}"#)), "{field} 0");
        }
    }

    #[test]
    fn negative_fatigue_numbers_rejected() {
        for field in ["treat_fatigue", "cheetah_fatigue", "fatigue_decay"] {
            assert!(rejected(&format!(r#"{{ "{field}": -1.0 }}"#)), "{field}");
        }
        assert!(RaceConfig::from_json(r#"{ "fatigue_decay": 0.0 }"#).is_ok());
    }

    #[test]
    fn zero_durations_rejected() {
        for field in [
            "countdown_step_ms",
            "treat_duration_ms",
            "bark_duration_ms",
            "cheetah_duration_ms",
            "rain_duration_ms",
            "cat_duration_ms",
            "cat_visual_ms",
            "ball_duration_ms",
            "ball_visual_ms",
        ] {
            assert!(rejected(&format!(r#"{{ "{field}": 0 }}"#)), "{field}");
        }
    }

    #[test]
    fn builder_chain() {
        let config = RaceConfig::default()
            .with_seed(9)
            .with_base_speed(0.5)
            .with_event_chances(0.0, 1.0, 0.0)
            .with_speed_jitter(0.0);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.speed_jitter, 0.0);
        assert_eq!(config.base_speed, 0.5);
        assert_eq!(config.cat_chance, 1.0);
        assert_eq!(config.rain_chance, 0.0);
    }
}
