mod common;
mod player_repository_tests;
