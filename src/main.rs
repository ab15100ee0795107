use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use audl_cache::config::Settings;
use audl_cache::league::{
    DivisionStandings, League, LeagueSources, LeagueStatLeaders, LoadOptions, NewsPage,
    TeamListing, UpcomingGame,
};
use audl_cache::model::GameStatus;
use audl_cache::news::{NewsSource, RssFeed};
use audl_cache::sources;
use audl_cache::stats_fetch::{StatsProvider, UltimateNumbersClient};

const LEAGUE_NAME: &str = "AUDL";

#[derive(Debug, Serialize)]
struct Snapshot {
    generated_at: String,
    teams: Vec<TeamListing>,
    standings: Vec<DivisionStandings>,
    top_fives: Vec<LeagueStatLeaders>,
    this_week: Vec<UpcomingGame>,
    news: NewsPage,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = Settings::from_env();
    if let Some(path) = parse_path_arg("teams") {
        settings.teams_info = path;
    }
    if let Some(path) = parse_path_arg("schedule") {
        settings.schedule = path;
    }
    if let Some(path) = parse_path_arg("roster") {
        settings.roster = Some(path);
    }
    let offline = has_flag("--offline");

    let teams = sources::load_teams_info(&settings.teams_info)
        .with_context(|| format!("loading {}", settings.teams_info.display()))?;
    let schedule = sources::load_schedule(&settings.schedule)
        .with_context(|| format!("loading {}", settings.schedule.display()))?;
    let roster = match settings.roster.as_deref() {
        Some(path) => sources::load_roster(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Vec::new(),
    };

    let client = UltimateNumbersClient::new(&settings.stats_base_url, settings.http_timeout_secs);
    let provider: Option<&dyn StatsProvider> = if offline { None } else { Some(&client) };
    let feeds: Vec<RssFeed> = if offline {
        Vec::new()
    } else {
        settings
            .rss_feeds
            .iter()
            .map(|url| RssFeed::new(url, settings.http_timeout_secs))
            .collect()
    };
    let news_sources: Vec<&dyn NewsSource> = feeds.iter().map(|f| f as &dyn NewsSource).collect();

    let mut league = League::with_settings(LEAGUE_NAME, &settings);
    let inputs = LeagueSources {
        teams: &teams,
        schedule: &schedule,
        roster: &roster,
        stats: provider,
    };
    league
        .refresh_league(&inputs, LoadOptions::default(), &news_sources)
        .context("league refresh failed")?;

    let now = Local::now().naive_local();
    match provider {
        Some(provider) => {
            league
                .update_games(provider, now)
                .context("score update failed")?;
        }
        None => warn!("offline mode: scores not updated"),
    }

    let snapshot = Snapshot {
        generated_at: now.format("%Y-%m-%d %H:%M").to_string(),
        teams: league.team_list(),
        standings: league.standings(),
        top_fives: league.top_fives().to_vec(),
        this_week: league.this_week(now.date()),
        news: league.news_page_info(),
    };
    let json = serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?;
    println!("{json}");
    let live = league
        .games()
        .iter()
        .filter(|(_, game)| game.status == Some(GameStatus::Live))
        .count();
    info!(games = league.games().len(), live, "snapshot written");

    Ok(())
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}

fn parse_path_arg(name: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("--{name}=");
    let bare = format!("--{name}");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if *arg == bare
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}
