use chrono::{Duration, NaiveDateTime};

use crate::model::{Game, GameStatus, ScoreSnapshot};

pub const DEFAULT_LIVE_WINDOW_HOURS: i64 = 3;

/// Pick the authoritative score for `game` out of a team's score snapshots.
///
/// Only snapshots reported on the game's scheduled date count. A snapshot replaces
/// the recorded score when nothing is recorded yet or when its total points
/// strictly exceed the recorded total, so scores only move forward and the
/// outcome does not depend on snapshot order. Returns true if the score changed.
pub fn match_game(
    game: &mut Game,
    snapshots: &[ScoreSnapshot],
    is_home_perspective: bool,
    now: NaiveDateTime,
    live_window: Duration,
) -> bool {
    let mut changed = false;
    for snap in snapshots {
        if snap.date != game.date {
            continue;
        }
        let replace = match game.total_points() {
            None => true,
            Some(current) => snap.total() > current,
        };
        if !replace {
            continue;
        }
        let (home, away) = if is_home_perspective {
            (snap.points_for, snap.points_against)
        } else {
            (snap.points_against, snap.points_for)
        };
        game.home_score = Some(home);
        game.away_score = Some(away);
        game.last_observed = Some(snap.timestamp);
        changed = true;
    }

    if let Some(observed) = game.last_observed {
        game.status = Some(live_status(observed, now, live_window));
    }
    changed
}

/// Live while the latest snapshot is from today and no older than the window.
pub fn live_status(observed: NaiveDateTime, now: NaiveDateTime, window: Duration) -> GameStatus {
    let age = now - observed;
    if observed.date() == now.date() && age >= Duration::zero() && age <= window {
        GameStatus::Live
    } else {
        GameStatus::NotLive
    }
}
