//! Terminal game against the computer.

use crate::config::PlayConfig;
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};
use velha_tictactoe::{Board, COMPUTER, GameSession, HUMAN, Outcome, ScoreBoard, ScoreStore};

/// One line of terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayCommand {
    /// Claim a cell, 0-based.
    Move(usize),
    /// Take back the last round.
    Undo,
    /// Replay an undone round.
    Redo,
    /// Start a new game.
    New,
    /// Zero the score file.
    ClearScores,
    /// Leave.
    Quit,
}

impl PlayCommand {
    /// Parses `1`-`9`, `u`, `r`, `n`, `c` or `q`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "u" => Some(Self::Undo),
            "r" => Some(Self::Redo),
            "n" => Some(Self::New),
            "c" => Some(Self::ClearScores),
            "q" => Some(Self::Quit),
            other => match other.parse::<usize>() {
                Ok(n @ 1..=9) => Some(Self::Move(n - 1)),
                _ => None,
            },
        }
    }
}

/// Runs the interactive loop on stdin/stdout until `q` or end of input.
#[instrument(skip_all, fields(difficulty = %config.difficulty()))]
pub async fn run(config: PlayConfig) -> Result<()> {
    let mut tally = Tally::load(ScoreStore::in_dir(config.scores_dir()));
    let mut session = GameSession::local(*config.difficulty());
    info!(path = %tally.store.path().display(), "Starting terminal game");

    render(&session, &tally.scores);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = PlayCommand::parse(&line) else {
            println!("Enter 1-9 to move, u undo, r redo, n new game, c clear scores, q quit");
            continue;
        };
        debug!(?command, "Input");

        match command {
            PlayCommand::Quit => break,
            PlayCommand::Undo => {
                if !session.undo() {
                    println!("Nothing to undo");
                }
            }
            PlayCommand::Redo => {
                if !session.redo() {
                    println!("Nothing to redo");
                }
            }
            PlayCommand::New => {
                session.reset();
                tally.new_game();
            }
            PlayCommand::ClearScores => tally.clear(),
            PlayCommand::Move(index) => match session.play(index) {
                Ok(outcome) if outcome.is_terminal() => finish(&session, &outcome, &mut tally),
                Ok(_) => {
                    render(&session, &tally.scores);
                    println!("Computer is thinking...");
                    let outcome = computer_turn(&mut session, &config).await?;
                    if outcome.is_terminal() {
                        finish(&session, &outcome, &mut tally);
                    }
                }
                Err(e) => println!("{}", e),
            },
        }
        render(&session, &tally.scores);
    }

    info!("Terminal game finished");
    Ok(())
}

/// Searches off the async runtime, then waits the configured delay.
async fn computer_turn(session: &mut GameSession, config: &PlayConfig) -> Result<Outcome> {
    let Some(turn) = session.pending_computer_turn() else {
        return Ok(session.outcome());
    };
    let index = tokio::task::spawn_blocking(move || turn.solve(&mut rand::thread_rng())).await??;
    tokio::time::sleep(*config.delay()).await;
    debug!(index, "Computer replied");
    Ok(session.apply_computer_move(index)?)
}

fn finish(session: &GameSession, outcome: &Outcome, tally: &mut Tally) {
    match outcome.winner() {
        Some(HUMAN) => println!("You win!"),
        Some(COMPUTER) => println!("Computer wins."),
        _ => println!("Draw."),
    }
    tally.record(*session.board(), outcome);
    println!("Press n for a new game.");
}

/// Persisted scores for one terminal game.
///
/// A finished board is counted once per game, so undoing the last round and
/// replaying into the same result does not score it again.
#[derive(Debug)]
struct Tally {
    store: ScoreStore,
    scores: ScoreBoard,
    counted: Option<Board>,
}

impl Tally {
    fn load(store: ScoreStore) -> Self {
        let scores = store.load();
        Self {
            store,
            scores,
            counted: None,
        }
    }

    /// Counts `outcome` unless `board` was already counted. Returns whether it
    /// was counted.
    fn record(&mut self, board: Board, outcome: &Outcome) -> bool {
        if self.counted == Some(board) {
            debug!("Result already counted");
            return false;
        }
        self.counted = Some(board);
        self.scores.record(outcome, HUMAN);
        self.save();
        true
    }

    fn new_game(&mut self) {
        self.counted = None;
    }

    fn clear(&mut self) {
        self.scores.clear();
        self.save();
    }

    fn save(&self) {
        if let Err(e) = self.store.save(&self.scores) {
            warn!(error = %e, "Could not save scores");
        }
    }
}

fn render(session: &GameSession, scores: &ScoreBoard) {
    println!();
    println!("{}", session.board());
    println!(
        "You {}  Computer {}  Draws {}",
        scores.player(),
        scores.opponent(),
        scores.draws()
    );
    match session.outcome() {
        Outcome::InProgress if session.is_local_turn() => println!("Your move ({}):", HUMAN),
        Outcome::InProgress => {}
        outcome => println!("{}", outcome),
    }
}
