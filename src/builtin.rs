//! The go-game schema shipped with the crate.

use crate::model::Schema;
use crate::parser::{ParseError, parse_schema};

pub const GO_GAME_SOURCE: &str = include_str!("../schemas/go_game.erd");

pub fn go_game() -> Result<Schema, ParseError> {
    parse_schema(GO_GAME_SOURCE)
}

/// Parse `source`, or the go-game schema when none is given.
pub fn load(source: Option<&str>) -> Result<Schema, ParseError> {
    match source {
        Some(src) => parse_schema(src),
        None => go_game(),
    }
}
