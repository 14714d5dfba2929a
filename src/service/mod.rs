//! Service Module
//!
//! The cached CRUD + bulk import/export contract, implemented once for any
//! entity type.

mod entity;
mod import;

pub use entity::EntityService;
pub use import::{ImportPolicy, ImportReport};

use crate::models::Player;
use crate::store::MemoryStore;
use crate::validator::PlayerValidator;

/// The player service as wired by the server binary.
pub type PlayerService<S = MemoryStore<Player>> = EntityService<Player, S, PlayerValidator>;
