pub mod config;
pub mod error;
pub mod game_match;
pub mod http_client;
pub mod league;
pub mod model;
pub mod news;
pub mod sources;
pub mod stats_fetch;
pub mod team;
pub mod team_directory;
