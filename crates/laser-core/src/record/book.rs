use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::SessionResult;

/// Cumulative statistics for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "score")]
    pub total_score: u64,
    #[serde(rename = "missed")]
    pub total_missed: u64,
    #[serde(rename = "games")]
    pub games_played: u64,
}

impl PlayerRecord {
    /// Fold one finished session into this record
    pub fn absorb(&mut self, result: &SessionResult) {
        self.total_score = self.total_score.saturating_add(u64::from(result.score));
        self.total_missed = self.total_missed.saturating_add(u64::from(result.missed));
        self.games_played = self.games_played.saturating_add(1);
    }
}

/// All player records, keyed by the exact name entered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordBook {
    records: BTreeMap<String, PlayerRecord>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player: &str) -> Option<&PlayerRecord> {
        self.records.get(player)
    }

    pub fn insert(&mut self, player: String, record: PlayerRecord) {
        self.records.insert(player, record);
    }

    pub fn get_or_insert(&mut self, player: &str) -> &mut PlayerRecord {
        self.records.entry(player.to_string()).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PlayerRecord)> {
        self.records.iter()
    }

    /// Entries by total score (highest first), then name
    pub fn ranked(&self) -> Vec<(&str, &PlayerRecord)> {
        let mut entries: Vec<_> = self
            .records
            .iter()
            .map(|(name, record)| (name.as_str(), record))
            .collect();
        entries.sort_by(|a, b| b.1.total_score.cmp(&a.1.total_score).then(a.0.cmp(b.0)));
        entries
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
