//! Upstream endpoint paths.
//!
//! Paths, query parameter names and page sizes are part of the upstream
//! contract and must not drift.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::domain::{Cursor, Page};

use super::pagination::PagedEndpoint;

/// Characters escaped inside a query component, matching what browsers
/// leave untouched in `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Catalog category searched for user assets.
pub const ASSET_CATEGORY: u32 = 3;
pub const GAMES_PAGE_SIZE: u32 = 50;
pub const GAME_PASSES_PAGE_SIZE: u32 = 100;

pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Single-page catalog search for assets created by `username`.
pub fn catalog_search(username: &str) -> String {
    format!(
        "/v1/search/items/details?Category={ASSET_CATEGORY}&CreatorName={}",
        encode_component(username)
    )
}

/// A user's public games, `{ data: [...], nextPageCursor }`.
#[derive(Debug, Clone)]
pub struct UserGames<'a> {
    user_id: &'a str,
}

impl<'a> UserGames<'a> {
    pub fn new(user_id: &'a str) -> Self {
        Self { user_id }
    }
}

impl PagedEndpoint for UserGames<'_> {
    fn endpoint(&self, cursor: &Cursor) -> String {
        format!(
            "/v2/users/{}/games?accessFilter=Public&limit={GAMES_PAGE_SIZE}&cursor={}",
            encode_component(self.user_id),
            encode_component(cursor.as_str())
        )
    }

    fn parse(&self, body: Value) -> Page {
        Page::parse_data(body)
    }
}

/// Passes sold in one universe, `{ data: { gamePasses: [...] }, nextPageCursor }`.
#[derive(Debug, Clone, Copy)]
pub struct UniverseGamePasses {
    universe_id: u64,
}

impl UniverseGamePasses {
    pub fn new(universe_id: u64) -> Self {
        Self { universe_id }
    }
}

impl PagedEndpoint for UniverseGamePasses {
    fn endpoint(&self, cursor: &Cursor) -> String {
        format!(
            "/v1/games/{}/game-passes?limit={GAME_PASSES_PAGE_SIZE}&cursor={}",
            self.universe_id,
            encode_component(cursor.as_str())
        )
    }

    fn parse(&self, body: Value) -> Page {
        Page::parse_game_passes(body)
    }
}
