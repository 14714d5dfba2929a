//! Request DTOs for the player API
//!
//! Defines the structure of incoming HTTP request bodies.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{Hand, Player, NEW_PLAYER_ID};

/// Request body for creating (POST /players) or updating (PUT /players/:id) a player.
///
/// Any id sent by the client is ignored: creation lets the store assign one
/// and updates take it from the path.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRequest {
    pub name: String,
    pub country: String,
    pub height_cm: i32,
    pub weight_kg: i32,
    #[serde(default)]
    pub points: i32,
    pub hand: Hand,
    pub birth_date: NaiveDate,
}

impl PlayerRequest {
    /// Builds an unsaved player from the request.
    pub fn into_player(self) -> Player {
        self.into_player_with_id(NEW_PLAYER_ID)
    }

    /// Builds a player carrying `id`.
    pub fn into_player_with_id(self, id: i64) -> Player {
        Player {
            id,
            name: self.name,
            country: self.country,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            points: self.points,
            hand: self.hand,
            birth_date: self.birth_date,
        }
    }
}

/// Request body for bulk import/export (POST /players/import, POST /players/export)
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    /// Path of the file to read from or write to
    pub path: String,
}
