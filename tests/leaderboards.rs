use std::fs;
use std::path::PathBuf;

use audl_cache::league::{League, LeagueSources, LoadOptions};
use audl_cache::model::{
    Player, STAT_ASSISTS, STAT_GOALS, ScoreSnapshot, TRACKED_STATS, TeamInfo,
};
use audl_cache::stats_fetch::{
    PlayerStatLine, PlayerSummary, StatsProvider, parse_player_stats_json, parse_players_json,
};
use audl_cache::team::Team;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn info(id: u32, city: &str, name: &str) -> TeamInfo {
    TeamInfo {
        id,
        name: name.to_string(),
        city: city.to_string(),
        coach: None,
        division: Some("Midwest".to_string()),
    }
}

fn player(name: &str, goals: i64) -> Player {
    let mut p = Player::from_full_name(name);
    p.set_stat(STAT_GOALS, goals);
    p
}

#[test]
fn team_top_five_from_provider_records() {
    let lines = parse_player_stats_json(&read_fixture("player_stats.json")).unwrap();
    let summaries = parse_players_json(&read_fixture("players.json")).unwrap();
    let mut team = Team::new(&info(224002, "Madison", "Radicals"));
    team.add_players(&summaries, &lines);

    let goals = team.top_five(STAT_GOALS);
    let names: Vec<&str> = goals.iter().map(|e| e.player.as_str()).collect();
    assert_eq!(names, vec!["Peter Graffy", "Andrew Meshnick", "Anonymous"]);
    assert_eq!(goals[0].value, 41);

    assert_eq!(team.player("Peter Graffy").unwrap().number, 7);
    assert_eq!(team.player("Andrew Meshnick").unwrap().number, 11);
    assert_eq!(team.player("Anonymous").unwrap().number, 0);
}

#[test]
fn top_five_caps_sorts_and_keeps_roster_order_on_ties() {
    let mut team = Team::new(&info(1, "Toronto", "Rush"));
    team.players = vec![
        player("A One", 3),
        player("B Two", 9),
        player("C Three", 3),
        player("D Four", 12),
        player("E Five", 3),
        player("F Six", 3),
        player("G Seven", 1),
    ];

    let top = team.top_five(STAT_GOALS);
    assert_eq!(top.len(), 5);
    let names: Vec<&str> = top.iter().map(|e| e.player.as_str()).collect();
    assert_eq!(names, vec!["D Four", "B Two", "A One", "C Three", "E Five"]);
    assert!(top.windows(2).all(|w| w[0].value >= w[1].value));
}

#[test]
fn absent_stat_counts_as_zero() {
    let mut team = Team::new(&info(1, "Toronto", "Rush"));
    team.players = vec![player("A One", 3), Player::from_full_name("B Two")];

    let assists = team.top_five(STAT_ASSISTS);
    assert_eq!(assists.len(), 2);
    assert!(assists.iter().all(|e| e.value == 0));
    assert_eq!(assists[0].player, "A One");
    // Reading a missing stat must not create it.
    assert!(team.players[1].stats.is_empty());
}

#[test]
fn league_top_five_merges_without_touching_team_lists() {
    let rush_lines = parse_player_stats_json(
        r#"[{"playerName": "Mark Lloyd", "goals": 50},
            {"playerName": "Cam Harris", "goals": 20},
            {"playerName": "Thomas Edwards", "goals": 5}]"#,
    )
    .unwrap();
    let radicals_lines = parse_player_stats_json(&read_fixture("player_stats.json")).unwrap();
    let provider = LinesProvider(vec![(1, rush_lines), (2, radicals_lines)]);

    let infos = vec![info(1, "Toronto", "Rush"), info(2, "Madison", "Radicals")];
    let mut league = League::new("AUDL");
    let inputs = LeagueSources {
        teams: &infos,
        stats: Some(&provider),
        ..LeagueSources::default()
    };
    league
        .add_teams(&inputs, LoadOptions::default())
        .expect("league should load");

    let before: Vec<_> = league.teams().map(|t| t.top_fives.clone()).collect();
    let top = league.top_five_league(STAT_GOALS);
    let after: Vec<_> = league.teams().map(|t| t.top_fives.clone()).collect();
    assert_eq!(before, after);
    assert_eq!(league.team(1).unwrap().top_fives[0].leaders.len(), 3);

    let got: Vec<(&str, i64, u32)> = top
        .iter()
        .map(|e| (e.player.as_str(), e.value, e.team_id))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Mark Lloyd", 50, 1),
            ("Peter Graffy", 41, 2),
            ("Cam Harris", 20, 1),
            ("Andrew Meshnick", 19, 2),
            ("Thomas Edwards", 5, 1),
        ]
    );

    assert_eq!(league.top_fives().len(), TRACKED_STATS.len());
    assert_eq!(league.top_fives()[0].stat, STAT_GOALS);
    assert_eq!(league.top_fives()[0].leaders, top);
}

struct LinesProvider(Vec<(u32, Vec<PlayerStatLine>)>);

impl StatsProvider for LinesProvider {
    fn player_summaries(&self, _team_id: u32) -> anyhow::Result<Vec<PlayerSummary>> {
        Ok(Vec::new())
    }

    fn player_stats(&self, team_id: u32) -> anyhow::Result<Vec<PlayerStatLine>> {
        Ok(self
            .0
            .iter()
            .find(|(id, _)| *id == team_id)
            .map(|(_, lines)| lines.clone())
            .unwrap_or_default())
    }

    fn game_snapshots(&self, _team_id: u32) -> anyhow::Result<Vec<ScoreSnapshot>> {
        Ok(Vec::new())
    }
}
