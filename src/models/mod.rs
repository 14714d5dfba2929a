//! Domain and transfer models
//!
//! The `Player` entity plus the DTOs used to serialize HTTP request and
//! response bodies.

pub mod player;
pub mod requests;
pub mod responses;

pub use player::{Entity, Hand, Player, NEW_PLAYER_ID};
pub use requests::{PlayerRequest, TransferRequest};
pub use responses::{
    DeleteResponse, ErrorResponse, ExportResponse, HealthResponse, ImportResponse, StatsResponse,
};
