use std::fs;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use audl_cache::game_match::match_game;
use audl_cache::model::{Game, GameStatus, ScoreSnapshot};
use audl_cache::stats_fetch::parse_game_snapshots_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn game() -> Game {
    Game::new(
        NaiveDate::from_ymd_opt(2014, 4, 12).unwrap(),
        "7:00 EST",
        "2014",
        "Cincinnati Revolution",
        "Madison Radicals",
    )
}

fn snap(h: u32, min: u32, ours: u32, theirs: u32) -> ScoreSnapshot {
    let ts = at(2014, 4, 12, h, min);
    ScoreSnapshot {
        opponent: "Cincinnati Revolution".to_string(),
        timestamp: ts,
        date: ts.date(),
        points_for: ours,
        points_against: theirs,
    }
}

fn window() -> Duration {
    Duration::hours(3)
}

#[test]
fn away_perspective_maps_points_to_home_and_away() {
    let snapshots = parse_game_snapshots_json(&read_fixture("games.json")).unwrap();
    let mut g = game();

    let changed = match_game(&mut g, &snapshots, false, at(2014, 5, 1, 12, 0), window());

    assert!(changed);
    assert_eq!(g.home_score, Some(16));
    assert_eq!(g.away_score, Some(25));
    assert_eq!(g.last_observed, Some(at(2014, 4, 12, 19, 26)));
    assert_eq!(g.status, Some(GameStatus::NotLive));
    assert!(g.is_finished());
}

#[test]
fn home_perspective_keeps_orientation() {
    let snapshots = parse_game_snapshots_json(&read_fixture("games.json")).unwrap();
    let mut g = game();

    match_game(&mut g, &snapshots, true, at(2014, 5, 1, 12, 0), window());

    assert_eq!(g.home_score, Some(25));
    assert_eq!(g.away_score, Some(16));
}

#[test]
fn highest_total_wins_regardless_of_order() {
    let snapshots = vec![snap(19, 0, 10, 8), snap(20, 30, 25, 16), snap(19, 45, 15, 12)];
    let mut reversed = snapshots.clone();
    reversed.reverse();

    let now = at(2014, 4, 13, 9, 0);
    let mut forward = game();
    let mut backward = game();
    match_game(&mut forward, &snapshots, true, now, window());
    match_game(&mut backward, &reversed, true, now, window());

    assert_eq!(forward.score(), Some((25, 16)));
    assert_eq!(forward.score(), backward.score());
    assert_eq!(forward.last_observed, backward.last_observed);
}

#[test]
fn score_never_regresses() {
    let now = at(2014, 4, 13, 9, 0);
    let mut g = game();
    match_game(&mut g, &[snap(20, 30, 25, 16)], true, now, window());
    let changed = match_game(&mut g, &[snap(21, 0, 12, 10)], true, now, window());

    assert!(!changed);
    assert_eq!(g.score(), Some((25, 16)));
    assert_eq!(g.last_observed, Some(at(2014, 4, 12, 20, 30)));
}

#[test]
fn matching_twice_is_idempotent() {
    let snapshots = vec![snap(19, 0, 10, 8), snap(20, 30, 25, 16)];
    let now = at(2014, 4, 12, 21, 0);
    let mut g = game();
    match_game(&mut g, &snapshots, false, now, window());
    let first = g.clone();
    let changed = match_game(&mut g, &snapshots, false, now, window());

    assert!(!changed);
    assert_eq!(g, first);
}

#[test]
fn snapshots_from_other_dates_are_ignored() {
    let mut other_day = snap(15, 42, 26, 21);
    other_day.date = NaiveDate::from_ymd_opt(2014, 4, 13).unwrap();
    let mut g = game();

    let changed = match_game(&mut g, &[other_day], true, at(2014, 4, 13, 16, 0), window());

    assert!(!changed);
    assert!(g.score().is_none());
    assert!(g.status.is_none());
    assert_eq!(g.score_label(), "0-0");
}

#[test]
fn recent_snapshot_on_game_day_is_live() {
    let mut g = game();
    match_game(&mut g, &[snap(19, 26, 12, 11)], true, at(2014, 4, 12, 20, 0), window());
    assert_eq!(g.status, Some(GameStatus::Live));

    // No newer snapshot arrives; later refreshes infer the game is over.
    match_game(&mut g, &[snap(19, 26, 12, 11)], true, at(2014, 4, 12, 23, 30), window());
    assert_eq!(g.status, Some(GameStatus::NotLive));
    assert_eq!(g.score(), Some((12, 11)));
}

#[test]
fn extreme_upstream_scores_compare_without_overflow() {
    let snapshots = parse_game_snapshots_json(
        r#"[{"timestamp": "2014-04-12 19:00", "ours": 4294967295, "theirs": 1}]"#,
    )
    .unwrap();
    let now = at(2014, 4, 13, 9, 0);
    let mut g = game();

    assert!(match_game(&mut g, &snapshots, true, now, window()));
    assert_eq!(g.total_points(), Some(4_294_967_296));
    // A second pass compares totals again instead of overflowing.
    assert!(!match_game(&mut g, &snapshots, true, now, window()));
    assert!(!match_game(&mut g, &[snap(20, 30, 25, 16)], true, now, window()));
    assert_eq!(g.score(), Some((u32::MAX, 1)));
}
