//! Game Server Module
//!
//! Five-dog race simulation: roster, timed effects, power-ups, random
//! events and the tick loop, plus the betting wallet around it.
//! Communicates with the JS frontend via Tauri commands.

pub mod betting;
pub mod commentary;
pub mod config;
pub mod effect;
pub mod events;
pub mod input;
pub mod powerups;
pub mod race;
pub mod racer;
pub mod simulation;
pub mod store;

pub use betting::{BettingState, RaceHistoryEntry};
pub use config::{Millis, RaceConfig};
pub use events::Weather;
pub use input::PlayerAction;
pub use race::{GameStatus, Race, RaceSnapshot};
pub use racer::{Racer, RacerId, RacerState, ROSTER};
pub use simulation::{GameServer, ServerStats};
