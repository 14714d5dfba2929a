//! Validator Module
//!
//! Pure checks run on candidates before any create or update reaches the store.

use chrono::{NaiveDate, Utc};

use crate::models::{Hand, Player};

// == Validator ==
/// Accepts or rejects a candidate entity without side effects.
pub trait Validator<E>: Send + Sync {
    /// Returns `Err(reason)` when the candidate must not be persisted.
    fn validate(&self, candidate: &E) -> Result<(), String>;
}

impl<E, F> Validator<E> for F
where
    F: Fn(&E) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, candidate: &E) -> Result<(), String> {
        self(candidate)
    }
}

// == Player Validator ==
/// Field rules for [`Player`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerValidator;

impl PlayerValidator {
    pub fn new() -> Self {
        Self
    }

    /// Same as [`Validator::validate`] with an explicit "today", for dates.
    pub fn validate_on(&self, player: &Player, today: NaiveDate) -> Result<(), String> {
        if player.name.trim().is_empty() {
            return Err("player name cannot be blank".to_string());
        }
        if player.country.trim().is_empty() {
            return Err("player country cannot be blank".to_string());
        }
        if player.height_cm <= 0 {
            return Err("height must be greater than 0".to_string());
        }
        if player.weight_kg <= 0 {
            return Err("weight must be greater than 0".to_string());
        }
        if player.points < 0 {
            return Err("points cannot be negative".to_string());
        }
        if player.hand == Hand::Other {
            return Err("hand must be either right or left".to_string());
        }
        if player.birth_date > today {
            return Err("birth date cannot be in the future".to_string());
        }
        Ok(())
    }
}

impl Validator<Player> for PlayerValidator {
    fn validate(&self, player: &Player) -> Result<(), String> {
        self.validate_on(player, Utc::now().date_naive())
    }
}
