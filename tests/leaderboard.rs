mod common;

use common::{entries, ScriptedBackend};
use tilerecall::game::{fetch_top, format_leaderboard, TOP_N};

#[tokio::test]
async fn keeps_at_most_ten_in_service_order() {
    let backend = ScriptedBackend {
        board: entries(25),
        ..Default::default()
    };
    let top = fetch_top(&backend, TOP_N).await;
    assert_eq!(top.len(), TOP_N);
    assert_eq!(top[0].name, "player0");
    assert_eq!(top[9].name, "player9");
}

#[tokio::test]
async fn larger_requests_are_capped() {
    let backend = ScriptedBackend {
        board: entries(12),
        ..Default::default()
    };
    assert_eq!(fetch_top(&backend, 50).await.len(), TOP_N);
    assert_eq!(fetch_top(&backend, 3).await.len(), 3);
}

#[tokio::test]
async fn service_order_is_not_resorted() {
    let mut board = entries(3);
    board.reverse();
    let backend = ScriptedBackend {
        board: board.clone(),
        ..Default::default()
    };
    assert_eq!(fetch_top(&backend, TOP_N).await, board);
}

#[tokio::test]
async fn failure_yields_empty_list() {
    let backend = ScriptedBackend {
        board: entries(5),
        fail_leaderboard: true,
        ..Default::default()
    };
    let top = fetch_top(&backend, TOP_N).await;
    assert!(top.is_empty());
    assert_eq!(format_leaderboard(&top), "No scores available.\n");
}
