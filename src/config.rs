use std::env;
use std::path::PathBuf;

use crate::game_match::DEFAULT_LIVE_WINDOW_HOURS;

pub const DEFAULT_STATS_BASE_URL: &str = "http://www.ultimate-numbers.com/rest/view";
pub const DEFAULT_RSS_FEED: &str = "http://www.theaudl.com/appfeed.xml";
const DEFAULT_TEAMS_INFO: &str = "Teams_Info";
const DEFAULT_SCHEDULE: &str = "2014_AUDL_Schedule.json";

#[derive(Debug, Clone)]
pub struct Settings {
    pub stats_base_url: String,
    pub teams_info: PathBuf,
    pub schedule: PathBuf,
    pub roster: Option<PathBuf>,
    pub rss_feeds: Vec<String>,
    pub live_window_hours: i64,
    pub upcoming_days: i64,
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stats_base_url: DEFAULT_STATS_BASE_URL.to_string(),
            teams_info: PathBuf::from(DEFAULT_TEAMS_INFO),
            schedule: PathBuf::from(DEFAULT_SCHEDULE),
            roster: None,
            rss_feeds: vec![DEFAULT_RSS_FEED.to_string()],
            live_window_hours: DEFAULT_LIVE_WINDOW_HOURS,
            upcoming_days: 7,
            http_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let stats_base_url = opt_env("AUDL_STATS_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.stats_base_url);
        let teams_info = opt_env("AUDL_TEAMS_INFO")
            .map(PathBuf::from)
            .unwrap_or(defaults.teams_info);
        let schedule = opt_env("AUDL_SCHEDULE")
            .map(PathBuf::from)
            .unwrap_or(defaults.schedule);
        let roster = opt_env("AUDL_ROSTER").map(PathBuf::from);
        let rss_feeds = match env::var("AUDL_RSS_FEEDS") {
            Ok(raw) => parse_list(&raw),
            Err(_) => defaults.rss_feeds,
        };
        let live_window_hours = env::var("AUDL_LIVE_WINDOW_HOURS")
            .ok()
            .and_then(|val| val.trim().parse::<i64>().ok())
            .unwrap_or(defaults.live_window_hours)
            .clamp(1, 12);
        let upcoming_days = env::var("AUDL_UPCOMING_DAYS")
            .ok()
            .and_then(|val| val.trim().parse::<i64>().ok())
            .unwrap_or(defaults.upcoming_days)
            .clamp(1, 60);
        let http_timeout_secs = env::var("AUDL_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(defaults.http_timeout_secs)
            .max(1);

        Self {
            stats_base_url,
            teams_info,
            schedule,
            roster,
            rss_feeds,
            live_window_hours,
            upcoming_days,
            http_timeout_secs,
        }
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|val| {
        if val.trim().is_empty() {
            None
        } else {
            Some(val.trim().to_string())
        }
    })
}

fn parse_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split([',', ';', ' ']) {
        let trimmed = part.trim();
        if trimmed.is_empty() || out.iter().any(|seen| seen == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}
