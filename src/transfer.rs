//! Bulk Transfer Module
//!
//! Sources that feed bulk imports and sinks that receive bulk exports, with
//! CSV and JSON file implementations for players.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::models::{Entity, Hand, Player};

// == Import Source ==
/// Produces the candidates of a bulk import.
#[async_trait]
pub trait ImportSource<E>: Send + Sync {
    async fn load(&self) -> Result<Vec<E>, StoreError>;
}

// == Export Sink ==
/// Receives the full entity list of a bulk export.
#[async_trait]
pub trait ExportSink<E>: Send + Sync {
    /// Writes `entities` and returns how many records were written.
    async fn write(&self, entities: &[E]) -> Result<usize, StoreError>;
}

#[async_trait]
impl<E: Entity> ImportSource<E> for Vec<E> {
    async fn load(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.clone())
    }
}

fn check_extension(path: &Path, expected: &str) -> Result<(), StoreError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(expected) => Ok(()),
        _ => Err(StoreError::Malformed(format!(
            "{} is not a .{} file",
            path.display(),
            expected
        ))),
    }
}

// == CSV File Source ==
/// Reads players from a CSV file with a header line and the columns
/// `id,name,country,height_cm,weight_kg,points,hand,birth_date`.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parses one data line. `line_no` is 1-based and only used in messages.
fn parse_player_line(line: &str, line_no: usize) -> Result<Player, StoreError> {
    let malformed = |what: &str| StoreError::Malformed(format!("line {line_no}: {what}"));

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 8 {
        return Err(malformed(&format!("expected 8 columns, found {}", fields.len())));
    }

    let int = |idx: usize, name: &str| {
        fields[idx]
            .parse::<i32>()
            .map_err(|_| malformed(&format!("invalid {name} '{}'", fields[idx])))
    };

    let id = fields[0]
        .parse::<i64>()
        .map_err(|_| malformed(&format!("invalid id '{}'", fields[0])))?;
    let hand = fields[6].parse::<Hand>().map_err(|e| malformed(&e))?;
    let birth_date = NaiveDate::parse_from_str(fields[7], "%Y-%m-%d")
        .map_err(|_| malformed(&format!("invalid birth_date '{}'", fields[7])))?;

    Ok(Player {
        id,
        name: fields[1].to_string(),
        country: fields[2].to_string(),
        height_cm: int(3, "height_cm")?,
        weight_kg: int(4, "weight_kg")?,
        points: int(5, "points")?,
        hand,
        birth_date,
    })
}

#[async_trait]
impl ImportSource<Player> for CsvFileSource {
    async fn load(&self) -> Result<Vec<Player>, StoreError> {
        check_extension(&self.path, "csv")?;

        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to read CSV file");
            StoreError::Io(e)
        })?;

        let players = content
            .lines()
            .enumerate()
            .skip(1)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| parse_player_line(line, idx + 1))
            .collect::<Result<Vec<_>, _>>()?;

        info!(path = %self.path.display(), count = players.len(), "Players loaded from CSV");
        Ok(players)
    }
}

// == JSON File Sink ==
/// Writes entities as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<E: Serialize + Sync> ExportSink<E> for JsonFileSink {
    async fn write(&self, entities: &[E]) -> Result<usize, StoreError> {
        check_extension(&self.path, "json")?;

        let json = serde_json::to_vec_pretty(entities)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        tokio::fs::write(&self.path, json).await?;

        info!(path = %self.path.display(), count = entities.len(), "Entities written to JSON");
        Ok(entities.len())
    }
}
