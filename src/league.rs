use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{LeagueError, LeagueResult};
use crate::game_match::{DEFAULT_LIVE_WINDOW_HOURS, match_game};
use crate::model::{Article, Game, GameId, GameRegistry, TRACKED_STATS, TeamInfo};
use crate::news::NewsSource;
use crate::sources::{RawRosterEntry, RawScheduleEntry};
use crate::stats_fetch::StatsProvider;
use crate::team::{TOP_N, Team};
use crate::team_directory::TeamDirectory;

pub const NEWS_HEADER: &str = "AUDL News";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub games: bool,
    pub players: bool,
    pub stats: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            games: true,
            players: true,
            stats: true,
        }
    }
}

impl LoadOptions {
    pub fn teams_only() -> Self {
        Self {
            games: false,
            players: false,
            stats: false,
        }
    }
}

#[derive(Clone, Copy, Default)]
pub struct LeagueSources<'a> {
    pub teams: &'a [TeamInfo],
    pub schedule: &'a [RawScheduleEntry],
    pub roster: &'a [RawRosterEntry],
    pub stats: Option<&'a dyn StatsProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Division {
    pub name: String,
    pub team_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingRow {
    pub team_id: u32,
    pub name: String,
    pub city: String,
    pub wins: u32,
    pub losses: u32,
    pub point_differential: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivisionStandings {
    pub division: String,
    pub teams: Vec<StandingRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueStatEntry {
    pub player: String,
    pub value: i64,
    pub team_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueStatLeaders {
    pub stat: String,
    pub leaders: Vec<LeagueStatEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingGame {
    pub home: String,
    pub home_id: Option<u32>,
    pub away: String,
    pub away_id: Option<u32>,
    pub date: NaiveDate,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamListing {
    pub name: String,
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsPage {
    pub header: String,
    pub articles: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct League {
    pub name: String,
    teams: BTreeMap<u32, Team>,
    divisions: Vec<Division>,
    games: GameRegistry,
    news: Vec<Article>,
    top_fives: Vec<LeagueStatLeaders>,
    live_window: Duration,
    upcoming_days: i64,
}

impl League {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            teams: BTreeMap::new(),
            divisions: Vec::new(),
            games: GameRegistry::new(),
            news: Vec::new(),
            top_fives: Vec::new(),
            live_window: Duration::hours(DEFAULT_LIVE_WINDOW_HOURS),
            upcoming_days: 7,
        }
    }

    pub fn with_settings(name: &str, settings: &Settings) -> Self {
        let mut league = Self::new(name);
        league.live_window = Duration::hours(settings.live_window_hours);
        league.upcoming_days = settings.upcoming_days;
        league
    }

    fn empty_like(&self) -> Self {
        let mut league = Self::new(&self.name);
        league.live_window = self.live_window;
        league.upcoming_days = self.upcoming_days;
        league
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn team(&self, id: u32) -> Option<&Team> {
        self.teams.get(&id)
    }

    pub fn games(&self) -> &GameRegistry {
        &self.games
    }

    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.get(id)
    }

    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    pub fn news(&self) -> &[Article] {
        &self.news
    }

    pub fn top_fives(&self) -> &[LeagueStatLeaders] {
        &self.top_fives
    }

    pub fn insert_team(&mut self, info: &TeamInfo) -> LeagueResult<()> {
        if self.teams.contains_key(&info.id) {
            return Err(LeagueError::DuplicateTeam(info.id));
        }
        let mut team = Team::new(info);
        team.league = Some(self.name.clone());

        if let Some(division) = info.division.as_deref() {
            match self.divisions.iter_mut().find(|d| d.name == division) {
                Some(existing) => existing.team_ids.push(info.id),
                None => self.divisions.push(Division {
                    name: division.to_string(),
                    team_ids: vec![info.id],
                }),
            }
        }
        self.teams.insert(info.id, team);
        Ok(())
    }

    /// Rebuild teams, divisions and games into a fresh league, swapped in only
    /// if every step succeeds. News is kept.
    pub fn add_teams(&mut self, sources: &LeagueSources, opts: LoadOptions) -> LeagueResult<()> {
        let mut staged = self.empty_like();
        for info in sources.teams {
            staged.insert_team(info)?;
        }
        if opts.games {
            staged.load_schedule(sources.schedule)?;
        }
        if opts.players {
            staged.load_players(sources.roster, sources.stats)?;
        }
        if opts.stats {
            staged.populate_league_stats();
        }

        info!(
            teams = staged.teams.len(),
            divisions = staged.divisions.len(),
            games = staged.games.len(),
            "league teams loaded"
        );
        self.teams = staged.teams;
        self.divisions = staged.divisions;
        self.games = staged.games;
        self.top_fives = staged.top_fives;
        Ok(())
    }

    pub fn load_schedule(&mut self, raw: &[RawScheduleEntry]) -> LeagueResult<usize> {
        for team in self.teams.values_mut() {
            let count = team.add_games(raw, &mut self.games)?;
            if count == 0 {
                warn!(team = %team.full_name(), "no scheduled games found");
            } else {
                debug!(team = %team.full_name(), games = count, "schedule merged");
            }
        }
        Ok(self.games.len())
    }

    pub fn load_players(
        &mut self,
        roster: &[RawRosterEntry],
        provider: Option<&dyn StatsProvider>,
    ) -> LeagueResult<()> {
        if let Some(provider) = provider {
            // Fetch everything before touching any team.
            let mut fetched = Vec::with_capacity(self.teams.len());
            for id in self.teams.keys() {
                let summaries = provider.player_summaries(*id)?;
                let lines = provider.player_stats(*id)?;
                fetched.push((*id, summaries, lines));
            }
            for (id, summaries, lines) in fetched {
                if let Some(team) = self.teams.get_mut(&id) {
                    team.add_players(&summaries, &lines);
                }
            }
        }
        for team in self.teams.values_mut() {
            let added = team.add_roster(roster)?;
            debug!(team = %team.full_name(), players = team.players.len(), added, "players loaded");
        }
        Ok(())
    }

    pub fn populate_league_stats(&mut self) {
        for team in self.teams.values_mut() {
            team.populate_team_stats();
        }
        self.top_fives = TRACKED_STATS
            .iter()
            .map(|stat| LeagueStatLeaders {
                stat: (*stat).to_string(),
                leaders: self.top_five_league(stat),
            })
            .collect();
    }

    pub fn update_games(
        &mut self,
        provider: &dyn StatsProvider,
        now: NaiveDateTime,
    ) -> LeagueResult<usize> {
        let mut fetched = Vec::with_capacity(self.teams.len());
        for id in self.teams.keys() {
            fetched.push((*id, provider.game_snapshots(*id)?));
        }

        let mut changed = 0;
        for (team_id, snapshots) in &fetched {
            let Some(team) = self.teams.get(team_id) else {
                continue;
            };
            let full_name = team.full_name();
            for id in &team.games {
                let Some(game) = self.games.get_mut(*id) else {
                    continue;
                };
                let is_home = game.is_home(&full_name);
                if match_game(game, snapshots, is_home, now, self.live_window) {
                    changed += 1;
                }
            }
        }
        info!(changed, "game scores updated");
        Ok(changed)
    }

    pub fn get_news(&mut self, sources: &[&dyn NewsSource]) -> LeagueResult<usize> {
        let mut news = Vec::new();
        for source in sources {
            news.extend(source.articles()?);
        }
        info!(articles = news.len(), "news refreshed");
        self.news = news;
        Ok(self.news.len())
    }

    pub fn refresh_league(
        &mut self,
        sources: &LeagueSources,
        opts: LoadOptions,
        news: &[&dyn NewsSource],
    ) -> LeagueResult<()> {
        self.add_teams(sources, opts)?;
        self.get_news(news)?;
        Ok(())
    }

    pub fn team_list(&self) -> Vec<TeamListing> {
        self.teams
            .values()
            .map(|t| TeamListing {
                name: t.name.clone(),
                id: t.id,
            })
            .collect()
    }

    pub fn news_page_info(&self) -> NewsPage {
        NewsPage {
            header: NEWS_HEADER.to_string(),
            articles: self
                .news
                .iter()
                .map(|a| (a.title.clone(), a.link.clone()))
                .collect(),
        }
    }

    pub fn directory(&self) -> TeamDirectory {
        let mut dir = TeamDirectory::builtin();
        for team in self.teams.values() {
            dir.insert(&team.full_name(), team.id);
        }
        dir
    }

    // Descending on the raw (wins, losses, differential) tuple, losses
    // included, to match the published standings. Not a win-percentage sort.
    pub fn standings(&self) -> Vec<DivisionStandings> {
        self.divisions
            .iter()
            .map(|div| {
                let mut rows: Vec<(StandingRow, (u32, u32, i64))> = div
                    .team_ids
                    .iter()
                    .filter_map(|id| self.teams.get(id))
                    .map(|team| {
                        let record = team.record(&self.games);
                        let row = StandingRow {
                            team_id: team.id,
                            name: team.name.clone(),
                            city: team.city.clone(),
                            wins: record.wins,
                            losses: record.losses,
                            point_differential: record.point_differential,
                        };
                        (row, record.sort_key())
                    })
                    .collect();
                rows.sort_by(|a, b| b.1.cmp(&a.1));
                DivisionStandings {
                    division: div.name.clone(),
                    teams: rows.into_iter().map(|(row, _)| row).collect(),
                }
            })
            .collect()
    }

    pub fn top_five_league(&self, stat: &str) -> Vec<LeagueStatEntry> {
        let mut pool: Vec<LeagueStatEntry> = self
            .teams
            .values()
            .flat_map(|team| {
                team.top_five(stat)
                    .into_iter()
                    .map(move |entry| LeagueStatEntry {
                        player: entry.player,
                        value: entry.value,
                        team_id: team.id,
                    })
            })
            .collect();
        pool.sort_by(|a, b| b.value.cmp(&a.value));
        pool.truncate(TOP_N);
        pool
    }

    /// Games for `team_ids` (all teams when `None`) dated within
    /// `[as_of, as_of + days_ahead]`, each listed once, earliest first.
    pub fn return_upcoming_games(
        &self,
        team_ids: Option<&[u32]>,
        days_ahead: i64,
        include_scores: bool,
        as_of: NaiveDate,
    ) -> Vec<UpcomingGame> {
        let end = as_of
            .checked_add_signed(Duration::days(days_ahead.max(0)))
            .unwrap_or(NaiveDate::MAX);
        let teams: Vec<&Team> = match team_ids {
            Some(ids) => ids.iter().filter_map(|id| self.teams.get(id)).collect(),
            None => self.teams.values().collect(),
        };

        let mut seen = HashSet::new();
        let mut games: Vec<&Game> = Vec::new();
        for team in teams {
            for id in &team.games {
                if !seen.insert(*id) {
                    continue;
                }
                if let Some(game) = self.games.get(*id)
                    && game.date >= as_of
                    && game.date <= end
                {
                    games.push(game);
                }
            }
        }
        games.sort_by_key(|g| g.date);

        let directory = self.directory();
        games
            .into_iter()
            .map(|g| UpcomingGame {
                home: g.home_team.clone(),
                home_id: directory.id_for(&g.home_team),
                away: g.away_team.clone(),
                away_id: directory.id_for(&g.away_team),
                date: g.date,
                time: g.time.clone(),
                score: include_scores.then(|| g.score_label()),
            })
            .collect()
    }

    pub fn this_week(&self, as_of: NaiveDate) -> Vec<UpcomingGame> {
        self.return_upcoming_games(None, self.upcoming_days, true, as_of)
    }
}
