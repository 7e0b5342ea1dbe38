//! Store - Per-racer dynamic state keyed by racer id
//!
//! The roster is closed, so the store holds exactly one slot per
//! `RacerId`, laid out in roster order.

use serde::Serialize;

use crate::game_server::racer::{RacerId, RacerState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceStore {
    racers: Vec<RacerState>,
}

impl RaceStore {
    /// Every racer on the start line
    pub fn new(base_speed: f32) -> Self {
        Self {
            racers: RacerId::ALL
                .into_iter()
                .map(|id| RacerState::new(id, base_speed))
                .collect(),
        }
    }

    /// Put every racer back on the start line with fresh counters.
    pub fn reset(&mut self, base_speed: f32) {
        *self = Self::new(base_speed);
    }

    pub fn get(&self, id: RacerId) -> &RacerState {
        &self.racers[id.index()]
    }

    pub fn get_mut(&mut self, id: RacerId) -> &mut RacerState {
        &mut self.racers[id.index()]
    }

    pub fn set(&mut self, state: RacerState) {
        let slot = state.id.index();
        self.racers[slot] = state;
    }

    /// Racers in roster order
    pub fn iter(&self) -> impl Iterator<Item = &RacerState> {
        self.racers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RacerState> {
        self.racers.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.racers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.racers.is_empty()
    }

    /// Owned copy of every racer, detached from later mutation
    pub fn snapshot(&self) -> Vec<RacerState> {
        self.racers.clone()
    }

    /// Racers ordered by position, leader first. Ties keep roster order.
    pub fn standings(&self) -> Vec<&RacerState> {
        let mut order: Vec<&RacerState> = self.racers.iter().collect();
        order.sort_by(|a, b| b.position.total_cmp(&a.position));
        order
    }
}
