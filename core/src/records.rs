use alloc::string::String;
use alloc::vec::Vec;
use chrono::NaiveDate;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Entries kept per difficulty.
pub const MAX_RECORDS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// 1-based position, fastest first
    pub rank: u32,
    pub name: String,
    pub seconds: u32,
    pub date: NaiveDate,
}

/// Best times for one difficulty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    records: Vec<GameRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Adds a finished game and returns its rank, or `None` when it did not make the table.
    /// Ties keep the older record ahead.
    pub fn submit(
        &mut self,
        name: impl Into<String>,
        seconds: u32,
        date: NaiveDate,
    ) -> Option<u32> {
        let position = self.records.partition_point(|record| record.seconds <= seconds);
        if position >= MAX_RECORDS {
            return None;
        }

        self.records.insert(
            position,
            GameRecord {
                rank: 0,
                name: name.into(),
                seconds,
                date,
            },
        );
        self.records.truncate(MAX_RECORDS);
        self.rerank();
        Some(position as u32 + 1)
    }

    /// Restores ordering and ranks, e.g. after loading records from storage.
    pub fn normalize(&mut self) {
        self.records.sort_by_key(|record| record.seconds);
        self.records.truncate(MAX_RECORDS);
        self.rerank();
    }

    fn rerank(&mut self) {
        for (index, record) in self.records.iter_mut().enumerate() {
            record.rank = index as u32 + 1;
        }
    }
}

/// One [`Leaderboard`] per difficulty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboards {
    boards: HashMap<Difficulty, Leaderboard>,
}

impl Leaderboards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self, difficulty: Difficulty) -> Option<&Leaderboard> {
        self.boards.get(&difficulty)
    }

    pub fn submit(
        &mut self,
        difficulty: Difficulty,
        name: impl Into<String>,
        seconds: u32,
        date: NaiveDate,
    ) -> Option<u32> {
        let rank = self
            .boards
            .entry(difficulty)
            .or_default()
            .submit(name, seconds, date);
        log::debug!("{} record {}s ranked {:?}", difficulty, seconds, rank);
        rank
    }

    pub fn normalize(&mut self) {
        self.boards.values_mut().for_each(Leaderboard::normalize);
    }
}
