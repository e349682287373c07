//! Local score counter persisted as JSON.

use super::{Outcome, Symbol};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Fixed storage key; the file name is `<key>.json`.
pub const STORAGE_KEY: &str = "tictactoe_scores";

/// Win/loss/draw tally from the local player's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ScoreBoard {
    /// Rounds the local player won.
    player: u32,
    /// Rounds the computer or remote opponent won.
    opponent: u32,
    /// Drawn rounds.
    draws: u32,
}

impl ScoreBoard {
    /// Tallies a terminal outcome for the player holding `local`.
    ///
    /// In-progress outcomes are ignored.
    #[instrument(skip(self))]
    pub fn record(&mut self, outcome: &Outcome, local: Symbol) {
        match outcome {
            Outcome::InProgress => {}
            Outcome::Draw => self.draws += 1,
            Outcome::Win { symbol, .. } if *symbol == local => self.player += 1,
            Outcome::Win { .. } => self.opponent += 1,
        }
        debug!(player = self.player, opponent = self.opponent, draws = self.draws, "Score updated");
    }

    /// Resets every counter to zero.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// File-backed storage for a [`ScoreBoard`].
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    /// Creates a store writing `tictactoe_scores.json` inside `dir`.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", STORAGE_KEY)),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored scores.
    ///
    /// A missing, unreadable or corrupt file means "no prior scores" and
    /// yields zeros; this never fails.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> ScoreBoard {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No score file yet");
                return ScoreBoard::default();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read score file, starting from zero");
                return ScoreBoard::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(scores) => {
                info!("Scores loaded");
                scores
            }
            Err(e) => {
                warn!(error = %e, "Corrupt score file, starting from zero");
                ScoreBoard::default()
            }
        }
    }

    /// Writes the scores, replacing any previous file.
    #[instrument(skip(self, scores), fields(path = %self.path.display()))]
    pub fn save(&self, scores: &ScoreBoard) -> Result<(), ScoreError> {
        let json = serde_json::to_string(scores)
            .map_err(|e| ScoreError::new(format!("Failed to serialize scores: {}", e)))?;
        std::fs::write(&self.path, json)
            .map_err(|e| ScoreError::new(format!("Failed to write score file: {}", e)))?;
        debug!("Scores saved");
        Ok(())
    }
}

/// Score persistence error.
#[derive(Debug, Clone, Display, Error)]
#[display("Score error: {} at {}:{}", message, file, line)]
pub struct ScoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ScoreError {
    /// Creates a new score error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
