//! Game session state machine.
//!
//! A [`GameSession`] holds the level, score, target sequence and the taps entered so far.
//! It performs no I/O: the sequence arrives through [`GameSession::begin_round`], taps through
//! [`GameSession::tap`], and earned points through [`GameSession::complete_level`].
//! [`crate::game::GameRunner`] layers the service calls and timed playback on top.
//!
//! Phase flow:
//!
//! ```text
//! Idle --begin_round--> ShowingSequence --start_input--> AwaitingInput
//!   ^                                                      |      |
//!   |                        mismatching tap --------------+      | final matching tap
//!   |                              v                              v
//!   +------- reset ---------- GameOver          LevelComplete --complete_level--> Idle
//! ```

use serde::Serialize;
use uuid::Uuid;

/// Highest level a game may start at. A level-N round asks for N tiles.
pub const MAX_LEVEL: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Waiting for a round to start, or for a retry after a failed fetch.
    Idle,
    ShowingSequence,
    AwaitingInput,
    LevelComplete,
    GameOver,
}

/// Result of a single accepted tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Tap matched; more taps are needed. `entered` counts the taps so far.
    Matched { entered: usize },
    /// Tap matched and completed the sequence.
    LevelComplete,
    /// Tap did not match the expected tile; the game is over.
    Mismatch { expected: usize, got: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("no round is accepting taps")]
    NoActiveRound,
    #[error("all {0} taps have already been entered")]
    InputComplete(usize),
    #[error("tile {index} is outside the {tile_count}-tile grid")]
    TileOutOfRange { index: usize, tile_count: usize },
    #[error("the service returned an empty sequence")]
    EmptySequence,
    #[error("the current level has not been completed")]
    LevelNotComplete,
    #[error("the game is over")]
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    id: Uuid,
    starting_level: u32,
    level: u32,
    score: u32,
    tile_count: usize,
    sequence: Vec<usize>,
    user_input: Vec<usize>,
    phase: Phase,
}

impl GameSession {
    /// Create a session at `starting_level` (clamped to `1..=MAX_LEVEL`) over `tile_count` tiles.
    pub fn new(starting_level: u32, tile_count: usize) -> Self {
        let starting_level = starting_level.clamp(1, MAX_LEVEL);
        Self {
            id: Uuid::new_v4(),
            starting_level,
            level: starting_level,
            score: 0,
            tile_count,
            sequence: Vec::new(),
            user_input: Vec::new(),
            phase: Phase::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn starting_level(&self) -> u32 {
        self.starting_level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    pub fn user_input(&self) -> &[usize] {
        &self.user_input
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while taps are being accepted.
    pub fn accepts_taps(&self) -> bool {
        self.phase == Phase::AwaitingInput && self.user_input.len() < self.sequence.len()
    }

    /// The tile the next tap must hit, if a tap is expected.
    pub fn expected_next(&self) -> Option<usize> {
        if self.accepts_taps() {
            self.sequence.get(self.user_input.len()).copied()
        } else {
            None
        }
    }

    /// True when every entered tap equals the sequence entry at the same position.
    pub fn input_is_prefix(&self) -> bool {
        self.user_input.len() <= self.sequence.len()
            && self.sequence.starts_with(&self.user_input)
    }

    /// Install a freshly fetched sequence and enter the playback phase.
    ///
    /// The sequence is rejected without any state change when it is empty or
    /// names a tile outside the grid.
    pub fn begin_round(&mut self, sequence: Vec<usize>) -> Result<(), SessionError> {
        match self.phase {
            Phase::Idle => {}
            Phase::GameOver => return Err(SessionError::GameOver),
            _ => return Err(SessionError::RoundInProgress),
        }
        if sequence.is_empty() {
            return Err(SessionError::EmptySequence);
        }
        if let Some(&index) = sequence.iter().find(|&&i| i >= self.tile_count) {
            return Err(SessionError::TileOutOfRange {
                index,
                tile_count: self.tile_count,
            });
        }
        self.sequence = sequence;
        self.user_input.clear();
        self.phase = Phase::ShowingSequence;
        Ok(())
    }

    /// Playback finished; start accepting taps.
    pub fn start_input(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::ShowingSequence {
            return Err(SessionError::NoActiveRound);
        }
        self.phase = Phase::AwaitingInput;
        Ok(())
    }

    /// Record a tap and compare it against the sequence position it fills.
    pub fn tap(&mut self, index: usize) -> Result<TapOutcome, SessionError> {
        match self.phase {
            Phase::AwaitingInput => {}
            Phase::GameOver => return Err(SessionError::GameOver),
            _ => return Err(SessionError::NoActiveRound),
        }
        if self.user_input.len() >= self.sequence.len() {
            return Err(SessionError::InputComplete(self.sequence.len()));
        }
        if index >= self.tile_count {
            return Err(SessionError::TileOutOfRange {
                index,
                tile_count: self.tile_count,
            });
        }

        self.user_input.push(index);
        let position = self.user_input.len() - 1;
        let expected = self.sequence[position];

        if expected != index {
            self.phase = Phase::GameOver;
            return Ok(TapOutcome::Mismatch {
                expected,
                got: index,
            });
        }
        if self.user_input.len() == self.sequence.len() {
            self.phase = Phase::LevelComplete;
            return Ok(TapOutcome::LevelComplete);
        }
        Ok(TapOutcome::Matched {
            entered: self.user_input.len(),
        })
    }

    /// Credit `points` for the completed level and advance to the next one.
    pub fn complete_level(&mut self, points: u32) -> Result<(), SessionError> {
        if self.phase != Phase::LevelComplete {
            return Err(SessionError::LevelNotComplete);
        }
        self.score = self.score.saturating_add(points);
        self.level = self.level.saturating_add(1);
        self.user_input.clear();
        self.sequence.clear();
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Back to the starting level with a zero score.
    pub fn reset(&mut self) {
        self.level = self.starting_level;
        self.score = 0;
        self.sequence.clear();
        self.user_input.clear();
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(sequence: Vec<usize>, tile_count: usize) -> GameSession {
        let mut s = GameSession::new(sequence.len() as u32, tile_count);
        s.begin_round(sequence).unwrap();
        s.start_input().unwrap();
        s
    }

    #[test]
    fn single_tile_round_success() {
        let mut s = ready(vec![2], 4);
        assert_eq!(s.level(), 1);
        assert_eq!(s.tap(2), Ok(TapOutcome::LevelComplete));
        s.complete_level(20).unwrap();
        assert_eq!(s.level(), 2);
        assert_eq!(s.score(), 20);
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.user_input().is_empty());
    }

    #[test]
    fn single_tile_round_failure() {
        let mut s = ready(vec![2], 4);
        assert_eq!(s.tap(1), Ok(TapOutcome::Mismatch { expected: 2, got: 1 }));
        assert_eq!(s.phase(), Phase::GameOver);
        assert_eq!(s.level(), 1);
    }

    #[test]
    fn mismatch_ends_round_early() {
        let mut s = ready(vec![0, 1, 2, 3], 4);
        assert_eq!(s.tap(0), Ok(TapOutcome::Matched { entered: 1 }));
        assert!(matches!(s.tap(3), Ok(TapOutcome::Mismatch { expected: 1, got: 3 })));
        assert_eq!(s.tap(1), Err(SessionError::GameOver));
        assert_eq!(s.user_input(), &[0, 3]);
    }

    #[test]
    fn taps_rejected_outside_input_phase() {
        let mut s = GameSession::new(1, 4);
        assert_eq!(s.tap(0), Err(SessionError::NoActiveRound));
        s.begin_round(vec![1]).unwrap();
        assert_eq!(s.tap(1), Err(SessionError::NoActiveRound));
        s.start_input().unwrap();
        s.tap(1).unwrap();
        assert_eq!(s.tap(1), Err(SessionError::NoActiveRound));
        assert_eq!(s.user_input().len(), 1);
    }

    #[test]
    fn out_of_range_tap_leaves_state_untouched() {
        let mut s = ready(vec![1, 2], 4);
        assert_eq!(
            s.tap(4),
            Err(SessionError::TileOutOfRange {
                index: 4,
                tile_count: 4
            })
        );
        assert!(s.user_input().is_empty());
        assert_eq!(s.phase(), Phase::AwaitingInput);
    }

    #[test]
    fn begin_round_validates_sequence() {
        let mut s = GameSession::new(1, 4);
        assert_eq!(s.begin_round(vec![]), Err(SessionError::EmptySequence));
        assert!(matches!(
            s.begin_round(vec![0, 7]),
            Err(SessionError::TileOutOfRange { index: 7, .. })
        ));
        assert_eq!(s.phase(), Phase::Idle);
        s.begin_round(vec![3]).unwrap();
        assert_eq!(s.begin_round(vec![3]), Err(SessionError::RoundInProgress));
    }

    #[test]
    fn complete_level_requires_completion() {
        let mut s = ready(vec![1, 1], 4);
        s.tap(1).unwrap();
        assert_eq!(s.complete_level(10), Err(SessionError::LevelNotComplete));
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn reset_restores_starting_level() {
        let mut s = GameSession::new(3, 6);
        s.begin_round(vec![5, 4, 3]).unwrap();
        s.start_input().unwrap();
        for tile in [5, 4, 3] {
            s.tap(tile).unwrap();
        }
        s.complete_level(30).unwrap();
        assert_eq!((s.level(), s.score()), (4, 30));
        s.reset();
        assert_eq!((s.level(), s.score()), (3, 0));
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn zero_starting_level_is_raised() {
        assert_eq!(GameSession::new(0, 4).level(), 1);
    }

    #[test]
    fn huge_starting_level_is_capped() {
        let s = GameSession::new(4_000_000_000, 4);
        assert_eq!(s.level(), MAX_LEVEL);
        assert_eq!(s.starting_level(), MAX_LEVEL);
    }

    #[test]
    fn expected_next_tracks_position() {
        let mut s = ready(vec![3, 0], 4);
        assert_eq!(s.expected_next(), Some(3));
        s.tap(3).unwrap();
        assert_eq!(s.expected_next(), Some(0));
        s.tap(0).unwrap();
        assert_eq!(s.expected_next(), None);
    }
}
