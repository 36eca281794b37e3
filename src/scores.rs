use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const RUNNER: &str = "neon-runner";
pub const PLATFORMER: &str = "neon-platformer";
pub const LAVA: &str = "neon-lava";

/// Games with a single-player score, as (storage key, display name).
pub const TRACKED: [(&str, &str); 3] = [
    (RUNNER, "Runner"),
    (PLATFORMER, "Platformer"),
    (LAVA, "Lava Climb"),
];

#[derive(Default, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(default)]
    best: BTreeMap<String, u32>,
}

/// One best score per game name, persisted as a small JSON file.
pub struct HighScores {
    best: BTreeMap<String, u32>,
    path: Option<PathBuf>,
    /// Games whose finished round was already submitted this session
    submitted: HashSet<String>,
}

impl HighScores {
    pub fn load(path: PathBuf) -> Self {
        let mut hs = HighScores {
            best: BTreeMap::new(),
            path: Some(path),
            submitted: HashSet::new(),
        };
        match hs.read_file() {
            Ok(n) => log::info!("loaded {} high scores", n),
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no high score file yet, starting fresh");
            }
            Err(e) => log::warn!("ignoring unreadable high score file: {}", e),
        }
        hs
    }

    /// Table that never touches the disk.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        HighScores {
            best: BTreeMap::new(),
            path: None,
            submitted: HashSet::new(),
        }
    }

    fn read_file(&mut self) -> Result<usize, StoreError> {
        let Some(path) = &self.path else { return Ok(0) };
        let text = fs::read_to_string(path)?;
        let file: ScoreFile = serde_json::from_str(&text)?;
        self.best = file.best;
        Ok(self.best.len())
    }

    fn write_file(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else { return Ok(()) };
        let file = ScoreFile {
            best: self.best.clone(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    pub fn best(&self, game: &str) -> u32 {
        self.best.get(game).copied().unwrap_or(0)
    }

    /// Record `score` for `game`. Returns true (and saves) on a new best.
    pub fn submit(&mut self, game: &str, score: u32) -> bool {
        if score == 0 || score <= self.best(game) {
            return false;
        }
        self.best.insert(game.to_string(), score);
        log::info!("new high score for {}: {}", game, score);
        if let Err(e) = self.write_file() {
            log::warn!("could not save high scores: {}", e);
        }
        true
    }

    /// Check if a game score has been submitted this run (to avoid duplicates)
    pub fn was_submitted(&self, game: &str) -> bool {
        self.submitted.contains(game)
    }

    pub fn mark_submitted(&mut self, game: &str) {
        self.submitted.insert(game.to_string());
    }

    /// Clear submitted flag (called when game resets)
    pub fn clear_submitted(&mut self, game: &str) {
        self.submitted.remove(game);
    }
}
