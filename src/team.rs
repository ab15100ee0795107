use chrono::NaiveDate;
use serde::Serialize;

use crate::error::LeagueResult;
use crate::model::{
    Game, GameId, GameRegistry, Player, STAT_ASSISTS, STAT_DROPS, STAT_DS, STAT_GOALS,
    STAT_PLUS_MINUS, STAT_THROWAWAYS, TRACKED_STATS, TeamInfo,
};
use crate::sources::{RawRosterEntry, RawScheduleEntry, normalize_roster, normalize_schedule};
use crate::stats_fetch::{PlayerStatLine, PlayerSummary};

pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatEntry {
    pub player: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatLeaders {
    pub stat: String,
    pub leaders: Vec<StatEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub point_differential: i64,
}

impl TeamRecord {
    /// Standings sort key, compared descending as a whole tuple.
    pub fn sort_key(&self) -> (u32, u32, i64) {
        (self.wins, self.losses, self.point_differential)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterView {
    pub city: String,
    pub name: String,
    pub id: u32,
    pub players: Vec<(String, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub date: NaiveDate,
    pub time: String,
    pub opponent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRow {
    pub date: NaiveDate,
    pub opponent: String,
    pub score: String,
}

#[derive(Debug, Clone)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub coach: Option<String>,
    pub division: Option<String>,
    // Name of the owning league; the league owns the team, not the other way round.
    pub league: Option<String>,
    pub players: Vec<Player>,
    pub games: Vec<GameId>,
    pub top_fives: Vec<StatLeaders>,
}

impl Team {
    pub fn new(info: &TeamInfo) -> Self {
        Self {
            id: info.id,
            name: info.name.clone(),
            city: info.city.clone(),
            coach: info.coach.clone(),
            division: info.division.clone(),
            league: None,
            players: Vec::new(),
            games: Vec::new(),
            top_fives: Vec::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }

    /// Rebuild the game list, reusing league games already registered for the
    /// same matchup. A malformed row fails before anything changes.
    pub fn add_games(
        &mut self,
        raw: &[RawScheduleEntry],
        registry: &mut GameRegistry,
    ) -> LeagueResult<usize> {
        let entries = normalize_schedule(raw)?;
        let full_name = self.full_name();

        let mut games = Vec::new();
        for entry in entries.iter().filter(|e| e.names(&full_name)) {
            let existing = if self.league.is_some() {
                registry.find_matchup(&full_name, entry.opponent_of(&full_name), entry.date)
            } else {
                // Standalone: only collapse rows repeated within this schedule.
                games.iter().copied().find(|id| {
                    registry.get(*id).is_some_and(|g| {
                        g.date == entry.date
                            && g.home_team == entry.home_team
                            && g.away_team == entry.away_team
                    })
                })
            };
            let id = match existing {
                Some(id) => id,
                None => {
                    let game = Game::new(
                        entry.date,
                        &entry.time,
                        &entry.year,
                        &entry.home_team,
                        &entry.away_team,
                    );
                    if self.league.is_some() {
                        registry.register(game)
                    } else {
                        registry.insert(game)
                    }
                }
            };
            if !games.contains(&id) {
                games.push(id);
            }
        }

        self.games = games;
        Ok(self.games.len())
    }

    pub fn add_players(&mut self, summaries: &[PlayerSummary], lines: &[PlayerStatLine]) {
        let mut players = Vec::with_capacity(lines.len());
        for line in lines {
            let mut player = Player::from_full_name(&line.name);
            player.set_stat(STAT_ASSISTS, line.assists);
            player.set_stat(STAT_GOALS, line.goals);
            player.set_stat(STAT_PLUS_MINUS, line.plus_minus);
            player.set_stat(STAT_DROPS, line.drops);
            player.set_stat(STAT_THROWAWAYS, line.throwaways);
            player.set_stat(STAT_DS, line.ds);
            if let Some(number) = summaries
                .iter()
                .find(|s| s.name == line.name.trim())
                .and_then(|s| s.number)
            {
                player.number = number;
            }
            players.push(player);
        }
        self.players = players;
    }

    // Known players get their number; new names are appended with no stats.
    pub fn add_roster(&mut self, raw: &[RawRosterEntry]) -> LeagueResult<usize> {
        let entries = normalize_roster(raw)?;
        let full_name = self.full_name();

        let mut added = 0;
        for entry in entries.iter().filter(|e| e.team == full_name) {
            let candidate = Player::new(&entry.first_name, &entry.last_name);
            let name = candidate.full_name();
            match self.players.iter_mut().find(|p| p.full_name() == name) {
                Some(existing) => {
                    if entry.number != 0 {
                        existing.number = entry.number;
                    }
                }
                None => {
                    self.players.push(Player {
                        number: entry.number,
                        ..candidate
                    });
                    added += 1;
                }
            }
        }
        Ok(added)
    }

    pub fn player(&self, full_name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.full_name() == full_name)
    }

    /// Up to five players by `stat`, highest first; ties keep roster order.
    pub fn top_five(&self, stat: &str) -> Vec<StatEntry> {
        let mut list: Vec<StatEntry> = self
            .players
            .iter()
            .map(|p| StatEntry {
                player: p.full_name(),
                value: p.stat(stat),
            })
            .collect();
        list.sort_by(|a, b| b.value.cmp(&a.value));
        list.truncate(TOP_N);
        list
    }

    pub fn populate_team_stats(&mut self) {
        self.top_fives = TRACKED_STATS
            .iter()
            .map(|stat| StatLeaders {
                stat: (*stat).to_string(),
                leaders: self.top_five(stat),
            })
            .collect();
    }

    pub fn record(&self, registry: &GameRegistry) -> TeamRecord {
        let full_name = self.full_name();
        let mut record = TeamRecord::default();
        for game in self.iter_games(registry) {
            let Some((ours, theirs)) = game.score_for(&full_name) else {
                continue;
            };
            if ours > theirs {
                record.wins += 1;
            } else if ours < theirs {
                record.losses += 1;
            }
            record.point_differential += i64::from(ours) - i64::from(theirs);
        }
        record
    }

    /// Current streak such as "W3" or "L1"; empty before any scored game.
    pub fn streak(&self, registry: &GameRegistry) -> String {
        let full_name = self.full_name();
        let mut results: Vec<(NaiveDate, bool)> = self
            .iter_games(registry)
            .filter_map(|g| {
                let (ours, theirs) = g.score_for(&full_name)?;
                (ours != theirs).then_some((g.date, ours > theirs))
            })
            .collect();
        results.sort_by_key(|(date, _)| *date);

        let Some(&(_, last_won)) = results.last() else {
            return String::new();
        };
        let run = results
            .iter()
            .rev()
            .take_while(|(_, won)| *won == last_won)
            .count();
        format!("{}{run}", if last_won { "W" } else { "L" })
    }

    pub fn roster(&self) -> RosterView {
        RosterView {
            city: self.city.clone(),
            name: self.name.clone(),
            id: self.id,
            players: self
                .players
                .iter()
                .filter(|p| !p.is_anonymous())
                .map(|p| (p.full_name(), p.number))
                .collect(),
        }
    }

    pub fn return_schedule(&self, registry: &GameRegistry) -> Vec<ScheduleRow> {
        let full_name = self.full_name();
        self.iter_games(registry)
            .map(|g| ScheduleRow {
                date: g.date,
                time: g.time.clone(),
                opponent: g.opponent_of(&full_name).to_string(),
            })
            .collect()
    }

    pub fn return_scores(&self, registry: &GameRegistry) -> Vec<ScoreRow> {
        let full_name = self.full_name();
        self.iter_games(registry)
            .map(|g| ScoreRow {
                date: g.date,
                opponent: g.opponent_of(&full_name).to_string(),
                score: g.score_label(),
            })
            .collect()
    }

    pub fn iter_games<'a>(&'a self, registry: &'a GameRegistry) -> impl Iterator<Item = &'a Game> {
        self.games.iter().filter_map(|id| registry.get(*id))
    }
}
