use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use mine3d_core::{Difficulty, Leaderboards};

/// Leaderboards backed by an optional JSON file, written after every new entry.
#[derive(Debug)]
pub struct RecordStore {
    path: Option<PathBuf>,
    boards: Leaderboards,
}

impl RecordStore {
    /// A missing file starts empty tables.
    pub fn open(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let boards = match &path {
            Some(path) if path.exists() => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let mut boards: Leaderboards = serde_json::from_str(&text)
                    .with_context(|| format!("malformed records in {}", path.display()))?;
                boards.normalize();
                log::info!("Loaded records from {}", path.display());
                boards
            }
            _ => Leaderboards::new(),
        };
        Ok(Self { path, boards })
    }

    pub fn boards(&self) -> &Leaderboards {
        &self.boards
    }

    pub fn submit(
        &mut self,
        difficulty: Difficulty,
        name: &str,
        seconds: u32,
        date: NaiveDate,
    ) -> anyhow::Result<Option<u32>> {
        let rank = self.boards.submit(difficulty, name, seconds, date);
        if rank.is_some() {
            self.save()?;
        }
        Ok(rank)
    }

    fn save(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.boards)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        log::debug!("Saved records to {}", path.display());
        Ok(())
    }
}
