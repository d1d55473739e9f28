//! Property tests for the session state machine
use proptest::prelude::*;
use tilerecall::game::{GameSession, Phase, SessionError, TapOutcome};

fn tile_counts() -> impl Strategy<Value = usize> {
    prop_oneof![Just(4usize), Just(6usize), Just(8usize)]
}

/// A tile count plus a sequence and a tap stream over that many tiles.
fn round() -> impl Strategy<Value = (usize, Vec<usize>, Vec<usize>)> {
    tile_counts().prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec(0..n, 1..12),
            prop::collection::vec(0..n, 0..16),
        )
    })
}

fn started(tile_count: usize, sequence: Vec<usize>) -> GameSession {
    let mut s = GameSession::new(sequence.len() as u32, tile_count);
    s.begin_round(sequence).unwrap();
    s.start_input().unwrap();
    s
}

proptest! {
    #[test]
    fn input_stays_a_prefix_until_first_mismatch((n, sequence, taps) in round()) {
        let mut s = started(n, sequence.clone());
        for tap in taps {
            match s.tap(tap) {
                Ok(TapOutcome::Matched { .. }) => {
                    prop_assert!(s.input_is_prefix());
                    prop_assert!(s.user_input().len() < sequence.len());
                }
                Ok(TapOutcome::LevelComplete) => {
                    prop_assert_eq!(s.user_input(), sequence.as_slice());
                    break;
                }
                Ok(TapOutcome::Mismatch { .. }) => {
                    prop_assert_eq!(s.phase(), Phase::GameOver);
                    break;
                }
                Err(e) => prop_assert!(false, "unexpected rejection {}", e),
            }
        }
        prop_assert!(s.user_input().len() <= sequence.len());
    }

    #[test]
    fn any_mismatch_ends_the_round(
        (n, sequence) in tile_counts().prop_flat_map(|n| (Just(n), prop::collection::vec(0..n, 1..12))),
        pos_seed in any::<usize>(),
        offset in 0usize..8,
    ) {
        let pos = pos_seed % sequence.len();
        let mut s = started(n, sequence.clone());
        for &tile in &sequence[..pos] {
            s.tap(tile).unwrap();
        }
        // Shift by 1..n so the tile always differs from the expected one
        let wrong = (sequence[pos] + 1 + offset % (n - 1)) % n;
        let outcome = s.tap(wrong).unwrap();
        let is_mismatch = matches!(outcome, TapOutcome::Mismatch { .. });
        prop_assert!(is_mismatch);
        prop_assert_eq!(s.tap(sequence[pos]), Err(SessionError::GameOver));
    }

    #[test]
    fn completing_a_level_advances_with_non_decreasing_score(
        (n, sequence) in tile_counts().prop_flat_map(|n| (Just(n), prop::collection::vec(0..n, 1..12))),
        points in 0u32..1000,
        prior in 0u32..1000,
    ) {
        let mut s = GameSession::new(1, n);
        s.begin_round(vec![0]).unwrap();
        s.start_input().unwrap();
        s.tap(0).unwrap();
        s.complete_level(prior).unwrap();

        let (level, score) = (s.level(), s.score());
        s.begin_round(sequence.clone()).unwrap();
        s.start_input().unwrap();
        let mut last = None;
        for tile in sequence {
            last = Some(s.tap(tile).unwrap());
        }
        prop_assert_eq!(last, Some(TapOutcome::LevelComplete));
        s.complete_level(points).unwrap();
        prop_assert_eq!(s.level(), level + 1);
        prop_assert!(s.score() >= score);
        prop_assert!(s.user_input().is_empty());
    }
}
