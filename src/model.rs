use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

pub const STAT_GOALS: &str = "Goals";
pub const STAT_ASSISTS: &str = "Assists";
pub const STAT_DROPS: &str = "Drops";
pub const STAT_THROWAWAYS: &str = "Throwaways";
pub const STAT_PLUS_MINUS: &str = "PMC";
pub const STAT_DS: &str = "Ds";

/// Stats tracked for per-team and league-wide leaderboards, in display order.
pub const TRACKED_STATS: [&str; 6] = [
    STAT_GOALS,
    STAT_ASSISTS,
    STAT_DROPS,
    STAT_THROWAWAYS,
    STAT_PLUS_MINUS,
    STAT_DS,
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Player {
    pub first_name: String,
    pub last_name: String,
    // 0 when the provider has no number on record.
    pub number: u32,
    pub stats: HashMap<String, i64>,
}

impl Player {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            ..Self::default()
        }
    }

    /// Split a provider display name ("Peter Graffy") into first/last.
    pub fn from_full_name(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((first, last)) => Self::new(first, last),
            None => Self::new(trimmed, ""),
        }
    }

    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            return self.first_name.clone();
        }
        if self.first_name.is_empty() {
            return self.last_name.clone();
        }
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn stat(&self, name: &str) -> i64 {
        self.stats.get(name).copied().unwrap_or(0)
    }

    pub fn set_stat(&mut self, name: &str, value: i64) {
        self.stats.insert(name.to_string(), value);
    }

    // The stats provider uses "Anonymous" placeholders for unnamed callahan/line slots.
    pub fn is_anonymous(&self) -> bool {
        self.first_name.contains("Anon") || self.last_name.contains("Anon")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GameId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    Live,
    NotLive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub date: NaiveDate,
    pub time: String,
    pub year: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub last_observed: Option<NaiveDateTime>,
    pub status: Option<GameStatus>,
}

impl Game {
    pub fn new(date: NaiveDate, time: &str, year: &str, home_team: &str, away_team: &str) -> Self {
        Self {
            date,
            time: time.to_string(),
            year: year.to_string(),
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_score: None,
            away_score: None,
            last_observed: None,
            status: None,
        }
    }

    pub fn score(&self) -> Option<(u32, u32)> {
        Some((self.home_score?, self.away_score?))
    }

    pub fn total_points(&self) -> Option<u64> {
        self.score().map(|(home, away)| u64::from(home) + u64::from(away))
    }

    pub fn is_finished(&self) -> bool {
        self.score().is_some()
    }

    /// "home-away", or "0-0" before any score was recorded.
    pub fn score_label(&self) -> String {
        match self.score() {
            Some((home, away)) => format!("{home}-{away}"),
            None => "0-0".to_string(),
        }
    }

    pub fn is_home(&self, team_name: &str) -> bool {
        self.home_team == team_name
    }

    pub fn involves(&self, team_name: &str) -> bool {
        self.home_team == team_name || self.away_team == team_name
    }

    pub fn opponent_of(&self, team_name: &str) -> &str {
        if self.is_home(team_name) {
            &self.away_team
        } else {
            &self.home_team
        }
    }

    /// Score as (ours, theirs) from the given team's side.
    pub fn score_for(&self, team_name: &str) -> Option<(u32, u32)> {
        let (home, away) = self.score()?;
        if self.is_home(team_name) {
            Some((home, away))
        } else {
            Some((away, home))
        }
    }
}

/// One reported score observation, from the reporting team's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSnapshot {
    pub opponent: String,
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    pub points_for: u32,
    pub points_against: u32,
}

impl ScoreSnapshot {
    pub fn total(&self) -> u64 {
        u64::from(self.points_for) + u64::from(self.points_against)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamInfo {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub coach: Option<String>,
    pub division: Option<String>,
}

impl TeamInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub published: String,
    pub link: String,
    pub title: String,
}

/// League-owned arena of games. Teams hold `GameId`s into it, so a game shared by
/// two teams is stored exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameRegistry {
    games: Vec<Game>,
    by_team_date: HashMap<(String, NaiveDate), GameId>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a game without indexing it; used by teams outside a league.
    pub fn insert(&mut self, game: Game) -> GameId {
        let id = GameId(self.games.len());
        self.games.push(game);
        id
    }

    /// Store a game and index it under both participants for that date.
    pub fn register(&mut self, game: Game) -> GameId {
        let home_key = (game.home_team.clone(), game.date);
        let away_key = (game.away_team.clone(), game.date);
        let id = self.insert(game);
        self.by_team_date.entry(home_key).or_insert(id);
        self.by_team_date.entry(away_key).or_insert(id);
        id
    }

    pub fn find_for_team(&self, team_name: &str, date: NaiveDate) -> Option<GameId> {
        self.by_team_date
            .get(&(team_name.to_string(), date))
            .copied()
    }

    /// The registered game between `team` and `opponent` on `date`, looked up
    /// from either side. A side booked twice that day only indexes its first
    /// game, so every hit is checked against both names.
    pub fn find_matchup(&self, team: &str, opponent: &str, date: NaiveDate) -> Option<GameId> {
        [opponent, team]
            .into_iter()
            .filter_map(|name| self.find_for_team(name, date))
            .find(|id| {
                self.get(*id)
                    .is_some_and(|g| g.involves(team) && g.involves(opponent))
            })
    }

    pub fn get(&self, id: GameId) -> Option<&Game> {
        self.games.get(id.0)
    }

    pub fn get_mut(&mut self, id: GameId) -> Option<&mut Game> {
        self.games.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameId, &Game)> {
        self.games
            .iter()
            .enumerate()
            .map(|(idx, game)| (GameId(idx), game))
    }
}
