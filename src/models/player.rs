//! Player Entity
//!
//! The cached and persisted domain record.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier carried by a player that has not been persisted yet.
pub const NEW_PLAYER_ID: i64 = -1;

// == Entity ==
/// A record the service can cache and persist, keyed by a signed identifier.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Store-assigned identifier, or a negative sentinel while unassigned.
    fn id(&self) -> i64;

    /// Returns the same record carrying `id`.
    fn with_id(self, id: i64) -> Self;
}

// == Hand ==
/// Dominant hand of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Right,
    Left,
    Other,
}

impl FromStr for Hand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right" => Ok(Hand::Right),
            "left" => Ok(Hand::Left),
            "other" => Ok(Hand::Other),
            other => Err(format!("unknown hand '{other}'")),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hand::Right => "right",
            Hand::Left => "left",
            Hand::Other => "other",
        };
        f.write_str(name)
    }
}

// == Player ==
/// A tennis player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub height_cm: i32,
    pub weight_kg: i32,
    pub points: i32,
    pub hand: Hand,
    pub birth_date: NaiveDate,
}

impl Player {
    /// Creates an unsaved player (id = [`NEW_PLAYER_ID`]).
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        height_cm: i32,
        weight_kg: i32,
        points: i32,
        hand: Hand,
        birth_date: NaiveDate,
    ) -> Self {
        Self {
            id: NEW_PLAYER_ID,
            name: name.into(),
            country: country.into(),
            height_cm,
            weight_kg,
            points,
            hand,
            birth_date,
        }
    }
}

impl Entity for Player {
    fn id(&self) -> i64 {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}
