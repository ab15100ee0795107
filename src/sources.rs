use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{LeagueError, LeagueResult};
use crate::model::TeamInfo;

/// A schedule row as it appears in the schedule file, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScheduleEntry {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(rename = "Year", alias = "year", default)]
    pub year: Option<Value>,
    #[serde(rename = "home/away", alias = "home_away", default)]
    pub home_away: Option<String>,
}

/// A validated schedule row, normalized to home/away orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub time: String,
    pub year: String,
    pub home_team: String,
    pub away_team: String,
}

impl ScheduleEntry {
    pub fn names(&self, team_name: &str) -> bool {
        self.home_team == team_name || self.away_team == team_name
    }

    pub fn opponent_of(&self, team_name: &str) -> &str {
        if self.home_team == team_name {
            &self.away_team
        } else {
            &self.home_team
        }
    }
}

impl RawScheduleEntry {
    pub fn normalize(&self, index: usize) -> LeagueResult<ScheduleEntry> {
        let bad = |reason: String| LeagueError::MalformedSchedule { index, reason };

        let team = required(&self.team).ok_or_else(|| bad("missing team".to_string()))?;
        let opponent =
            required(&self.opponent).ok_or_else(|| bad("missing opponent".to_string()))?;
        let raw_date = required(&self.date).ok_or_else(|| bad("missing date".to_string()))?;
        let date = parse_schedule_date(raw_date)
            .ok_or_else(|| bad(format!("unparseable date {raw_date:?}")))?;
        let time = required(&self.time).ok_or_else(|| bad("missing time".to_string()))?;
        let year = match self.year.as_ref() {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(bad("missing Year".to_string())),
        };
        let flag =
            required(&self.home_away).ok_or_else(|| bad("missing home/away".to_string()))?;
        let is_home = if flag.eq_ignore_ascii_case("home") {
            true
        } else if flag.eq_ignore_ascii_case("away") {
            false
        } else {
            return Err(bad(format!("home/away flag {flag:?} is neither Home nor Away")));
        };

        let (home_team, away_team) = if is_home {
            (team, opponent)
        } else {
            (opponent, team)
        };
        Ok(ScheduleEntry {
            date,
            time: time.to_string(),
            year,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
        })
    }
}

/// Validate every row; the first malformed row fails the whole batch.
pub fn normalize_schedule(raw: &[RawScheduleEntry]) -> LeagueResult<Vec<ScheduleEntry>> {
    raw.iter()
        .enumerate()
        .map(|(index, entry)| entry.normalize(index))
        .collect()
}

/// Accepts "4/12/14", "4/12/2014" and "2014-04-12".
pub fn parse_schedule_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    // Two-digit years must be tried first: %Y would read "14" as year 14.
    ["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRosterEntry {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub number: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub team: String,
    pub first_name: String,
    pub last_name: String,
    pub number: u32,
}

impl RawRosterEntry {
    pub fn normalize(&self, index: usize) -> LeagueResult<RosterEntry> {
        let bad = |reason: String| LeagueError::MalformedRoster { index, reason };

        let team = required(&self.team).ok_or_else(|| bad("missing team".to_string()))?;
        let first_name =
            required(&self.first_name).ok_or_else(|| bad("missing first_name".to_string()))?;
        let last_name = self.last_name.as_deref().unwrap_or_default().trim();
        let number = match self.number.as_ref() {
            None | Some(Value::Null) => 0,
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| bad(format!("invalid number {n}")))?,
            Some(Value::String(s)) if s.trim().is_empty() => 0,
            Some(Value::String(s)) => s
                .trim()
                .parse::<u32>()
                .map_err(|_| bad(format!("invalid number {s:?}")))?,
            Some(other) => return Err(bad(format!("invalid number {other}"))),
        };

        Ok(RosterEntry {
            team: team.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            number,
        })
    }
}

pub fn normalize_roster(raw: &[RawRosterEntry]) -> LeagueResult<Vec<RosterEntry>> {
    raw.iter()
        .enumerate()
        .map(|(index, entry)| entry.normalize(index))
        .collect()
}

/// Parse the teams info text: blocks of `Key: value` lines, each opened by `ID:`.
///
/// ```text
/// ID: 224002
/// Name: Radicals
/// City: Madison
/// Coach: Tim DeByl
/// Division: Midwest
/// ```
pub fn parse_teams_info(raw: &str) -> LeagueResult<Vec<TeamInfo>> {
    let mut out = Vec::new();
    let mut block: Option<InfoBlock> = None;

    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            return Err(LeagueError::MalformedTeamsInfo {
                line: line_no,
                reason: format!("expected `Key: value`, got {trimmed:?}"),
            });
        };
        let key = key.trim();
        let value = value.trim();

        if key.eq_ignore_ascii_case("ID") {
            if let Some(done) = block.take() {
                out.push(done.finish()?);
            }
            let id = value
                .parse::<u32>()
                .map_err(|_| LeagueError::MalformedTeamsInfo {
                    line: line_no,
                    reason: format!("team id {value:?} is not a number"),
                })?;
            block = Some(InfoBlock {
                line: line_no,
                id,
                ..InfoBlock::default()
            });
            continue;
        }

        let Some(current) = block.as_mut() else {
            return Err(LeagueError::MalformedTeamsInfo {
                line: line_no,
                reason: format!("{key:?} appears before any ID line"),
            });
        };
        let value = (!value.is_empty()).then(|| value.to_string());
        match key.to_ascii_lowercase().as_str() {
            "name" => current.name = value,
            "city" => current.city = value,
            "coach" => current.coach = value,
            "division" => current.division = value,
            _ => {}
        }
    }

    if let Some(done) = block.take() {
        out.push(done.finish()?);
    }
    Ok(out)
}

#[derive(Debug, Default)]
struct InfoBlock {
    line: usize,
    id: u32,
    name: Option<String>,
    city: Option<String>,
    coach: Option<String>,
    division: Option<String>,
}

impl InfoBlock {
    fn finish(self) -> LeagueResult<TeamInfo> {
        let missing = |field: &str| LeagueError::MalformedTeamsInfo {
            line: self.line,
            reason: format!("team {} has no {field}", self.id),
        };
        let name = self.name.clone().ok_or_else(|| missing("Name"))?;
        let city = self.city.clone().ok_or_else(|| missing("City"))?;
        Ok(TeamInfo {
            id: self.id,
            name,
            city,
            coach: self.coach,
            division: self.division,
        })
    }
}

pub fn load_teams_info(path: &Path) -> LeagueResult<Vec<TeamInfo>> {
    parse_teams_info(&read_file(path)?)
}

pub fn parse_schedule_json(raw: &str) -> LeagueResult<Vec<RawScheduleEntry>> {
    parse_json_array(raw, "schedule")
}

pub fn load_schedule(path: &Path) -> LeagueResult<Vec<RawScheduleEntry>> {
    parse_schedule_json(&read_file(path)?)
}

pub fn parse_roster_json(raw: &str) -> LeagueResult<Vec<RawRosterEntry>> {
    parse_json_array(raw, "roster")
}

pub fn load_roster(path: &Path) -> LeagueResult<Vec<RawRosterEntry>> {
    parse_roster_json(&read_file(path)?)
}

fn parse_json_array<T: for<'de> Deserialize<'de>>(raw: &str, what: &str) -> LeagueResult<Vec<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).map_err(|source| LeagueError::Json {
        what: what.to_string(),
        source,
    })
}

fn read_file(path: &Path) -> LeagueResult<String> {
    fs::read_to_string(path).map_err(|source| LeagueError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn required(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
