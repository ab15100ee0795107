use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::http_client::{fetch_text, http_client_with_timeout};
use crate::model::ScoreSnapshot;

/// Player identity as listed on a team's roster endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSummary {
    pub name: String,
    pub number: Option<u32>,
}

/// Season totals for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlayerStatLine {
    #[serde(rename = "playerName")]
    pub name: String,
    #[serde(default, deserialize_with = "count_or_default")]
    pub assists: i64,
    #[serde(default, deserialize_with = "count_or_default")]
    pub goals: i64,
    #[serde(rename = "plusMinusCount", default, deserialize_with = "count_or_default")]
    pub plus_minus: i64,
    #[serde(default, deserialize_with = "count_or_default")]
    pub drops: i64,
    #[serde(default, deserialize_with = "count_or_default")]
    pub throwaways: i64,
    #[serde(default, deserialize_with = "count_or_default")]
    pub ds: i64,
}

// null, blank and non-numeric counts read as 0.
fn count_or_default<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    })
}

/// Source of per-team players, stats and score snapshots.
pub trait StatsProvider {
    fn player_summaries(&self, team_id: u32) -> Result<Vec<PlayerSummary>>;
    fn player_stats(&self, team_id: u32) -> Result<Vec<PlayerStatLine>>;
    fn game_snapshots(&self, team_id: u32) -> Result<Vec<ScoreSnapshot>>;
}

/// REST client for the ultimate-numbers stats server.
#[derive(Debug, Clone)]
pub struct UltimateNumbersClient {
    base_url: String,
    timeout_secs: u64,
}

impl UltimateNumbersClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        }
    }

    fn get(&self, path: &str) -> Result<String> {
        let client = http_client_with_timeout(self.timeout_secs)?;
        let url = format!("{}{path}", self.base_url);
        fetch_text(client, &url)
    }
}

impl StatsProvider for UltimateNumbersClient {
    fn player_summaries(&self, team_id: u32) -> Result<Vec<PlayerSummary>> {
        let body = self
            .get(&format!("/team/{team_id}/players/"))
            .with_context(|| format!("players request failed for team {team_id}"))?;
        parse_players_json(&body)
    }

    fn player_stats(&self, team_id: u32) -> Result<Vec<PlayerStatLine>> {
        let body = self
            .get(&format!("/team/{team_id}/stats/player"))
            .with_context(|| format!("player stats request failed for team {team_id}"))?;
        parse_player_stats_json(&body)
    }

    fn game_snapshots(&self, team_id: u32) -> Result<Vec<ScoreSnapshot>> {
        let body = self
            .get(&format!("/team/{team_id}/games"))
            .with_context(|| format!("games request failed for team {team_id}"))?;
        parse_game_snapshots_json(&body)
    }
}

pub fn parse_player_stats_json(raw: &str) -> Result<Vec<PlayerStatLine>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid player stats json")
}

pub fn parse_players_json(raw: &str) -> Result<Vec<PlayerSummary>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid players json")?;
    let Some(arr) = v.as_array() else {
        return Err(anyhow::anyhow!("players json is not an array"));
    };

    let mut out = Vec::new();
    for item in arr {
        let Some(name) = item.get("name").and_then(|x| x.as_str()) else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        out.push(PlayerSummary {
            name: name.to_string(),
            number: pick_number(item.get("number")),
        });
    }
    Ok(out)
}

pub fn parse_game_snapshots_json(raw: &str) -> Result<Vec<ScoreSnapshot>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid games json")?;
    let Some(arr) = v.as_array() else {
        return Err(anyhow::anyhow!("games json is not an array"));
    };
    Ok(arr.iter().filter_map(parse_snapshot).collect())
}

// Entries without a usable timestamp or both scores carry nothing to match.
fn parse_snapshot(v: &Value) -> Option<ScoreSnapshot> {
    let timestamp = v
        .get("timestamp")
        .and_then(|x| x.as_str())
        .and_then(parse_snapshot_timestamp)
        .or_else(|| {
            v.get("msSinceEpoch")
                .and_then(|x| x.as_i64())
                .and_then(DateTime::from_timestamp_millis)
                .map(|dt| dt.naive_utc())
        })?;
    let opponent = v
        .get("opponentName")
        .and_then(|x| x.as_str())
        .unwrap_or_default()
        .trim()
        .to_string();
    let points_for = pick_number(v.get("ours"))?;
    let points_against = pick_number(v.get("theirs"))?;

    Some(ScoreSnapshot {
        opponent,
        timestamp,
        date: timestamp.date(),
        points_for,
        points_against,
    })
}

/// Provider timestamps look like "2014-04-12 19:26".
pub fn parse_snapshot_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

// Numbers arrive as JSON numbers or strings depending on the endpoint.
fn pick_number(value: Option<&Value>) -> Option<u32> {
    let v = value?;
    if let Some(num) = v.as_u64() {
        return u32::try_from(num).ok();
    }
    v.as_str().and_then(|s| s.trim().parse::<u32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_timestamp_formats() {
        let ts = parse_snapshot_timestamp("2014-04-12 19:26").unwrap();
        assert_eq!(ts.to_string(), "2014-04-12 19:26:00");
        assert!(parse_snapshot_timestamp("Sat, 4/12").is_none());
    }

    #[test]
    fn string_and_numeric_numbers() {
        assert_eq!(pick_number(Some(&Value::from(7))), Some(7));
        assert_eq!(pick_number(Some(&Value::from("12"))), Some(12));
        assert_eq!(pick_number(Some(&Value::from("x"))), None);
        assert_eq!(pick_number(None), None);
    }
}
