//! Commentary - Race announcer lines for the front end
//!
//! Keeps a short rolling log of messages. Leader checks run at a fixed
//! minimum spacing; power-ups and random events add lines directly.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game_server::config::{Millis, RaceConfig};
use crate::game_server::racer::RacerId;
use crate::game_server::store::RaceStore;

/// A single announcer message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryLine {
    pub at: Millis,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Commentary {
    lines: VecDeque<CommentaryLine>,
    limit: usize,
    last_check: Millis,
    leader: Option<RacerId>,
}

impl Commentary {
    pub fn new(limit: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(limit),
            limit,
            last_check: 0,
            leader: None,
        }
    }

    /// Forget everything and start the leader-check interval at `now`.
    pub fn reset(&mut self, now: Millis) {
        self.lines.clear();
        self.last_check = now;
        self.leader = None;
    }

    pub fn push(&mut self, at: Millis, text: impl Into<String>) {
        let text = text.into();
        log::debug!("commentary: {}", text);
        self.lines.push_back(CommentaryLine { at, text });
        while self.lines.len() > self.limit {
            self.lines.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&CommentaryLine> {
        self.lines.back()
    }

    pub fn lines(&self) -> impl Iterator<Item = &CommentaryLine> {
        self.lines.iter()
    }

    /// Re-rank the field if enough time has passed and announce a new
    /// leader or a close race.
    pub fn observe<R: Rng>(
        &mut self,
        now: Millis,
        store: &RaceStore,
        config: &RaceConfig,
        rng: &mut R,
    ) {
        if now.saturating_sub(self.last_check) < config.commentary_interval_ms {
            return;
        }
        self.last_check = now;

        let standings = store.standings();
        let (first, second) = match standings.as_slice() {
            [first, second, ..] => (*first, *second),
            _ => return,
        };

        if self.leader != Some(first.id) {
            self.leader = Some(first.id);
            self.push(now, format!("{} takes the lead!", first.id.name()));
        } else if first.position - second.position < config.close_gap
            && rng.gen_bool(config.closing_in_chance)
        {
            self.push(
                now,
                format!("{} is closing in on {}!", second.id.name(), first.id.name()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (Commentary, RaceStore, RaceConfig, StdRng) {
        (
            Commentary::new(3),
            RaceStore::new(0.015),
            RaceConfig::default(),
            StdRng::seed_from_u64(11),
        )
    }

    #[test]
    fn announces_leader_change_only_after_interval() {
        let (mut commentary, mut store, config, mut rng) = setup();
        store.get_mut(RacerId::Olive).position = 20.0;
        commentary.observe(2999, &store, &config, &mut rng);
        assert!(commentary.latest().is_none());

        commentary.observe(3000, &store, &config, &mut rng);
        assert_eq!(commentary.latest().unwrap().text, "Olive takes the lead!");

        store.get_mut(RacerId::Iko).position = 40.0;
        commentary.observe(4000, &store, &config, &mut rng);
        assert_eq!(commentary.latest().unwrap().text, "Olive takes the lead!");
        commentary.observe(6000, &store, &config, &mut rng);
        assert_eq!(commentary.latest().unwrap().text, "Iko takes the lead!");
    }

    #[test]
    fn close_race_announced_when_certain() {
        let (mut commentary, mut store, mut config, mut rng) = setup();
        config.closing_in_chance = 1.0;
        store.get_mut(RacerId::Gary).position = 50.0;
        store.get_mut(RacerId::Louie).position = 47.0;
        commentary.observe(3000, &store, &config, &mut rng);
        commentary.observe(6000, &store, &config, &mut rng);
        assert_eq!(
            commentary.latest().unwrap().text,
            "Louis is closing in on Gary Pancakes!"
        );
    }

    #[test]
    fn no_close_race_line_for_big_gap() {
        let (mut commentary, mut store, mut config, mut rng) = setup();
        config.closing_in_chance = 1.0;
        store.get_mut(RacerId::Gary).position = 50.0;
        store.get_mut(RacerId::Louie).position = 40.0;
        commentary.observe(3000, &store, &config, &mut rng);
        commentary.observe(6000, &store, &config, &mut rng);
        assert_eq!(commentary.lines().count(), 1);
    }

    #[test]
    fn log_is_bounded() {
        let (mut commentary, ..) = setup();
        for i in 0..5 {
            commentary.push(i, format!("line {i}"));
        }
        let texts: Vec<&str> = commentary.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["line 2", "line 3", "line 4"]);
    }
}
