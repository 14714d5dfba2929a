//! Response DTOs for the player API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::service::ImportReport;

/// Response body for DELETE /players/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: i64,
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(id: i64) -> Self {
        Self {
            message: format!("Player {} deleted successfully", id),
            id,
            deleted: true,
        }
    }
}

/// Response body for POST /players/import
#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub path: String,
    pub imported: usize,
    pub skipped: usize,
}

impl ImportResponse {
    pub fn new(path: impl Into<String>, report: ImportReport) -> Self {
        Self {
            path: path.into(),
            imported: report.imported,
            skipped: report.skipped,
        }
    }
}

/// Response body for POST /players/export
#[derive(Debug, Clone, Serialize)]
pub struct ExportResponse {
    pub path: String,
    pub exported: usize,
}

impl ExportResponse {
    pub fn new(path: impl Into<String>, exported: usize) -> Self {
        Self {
            path: path.into(),
            exported,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of reads served from the cache
    pub hits: u64,
    /// Number of reads that went to the store
    pub misses: u64,
    /// Number of capacity evictions
    pub evictions: u64,
    /// Number of write invalidations that removed an entry
    pub invalidations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_response_serialize() {
        let json = serde_json::to_value(DeleteResponse::new(4)).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["deleted"], true);
        assert!(json["message"].as_str().unwrap().contains("deleted"));
    }

    #[test]
    fn test_import_response_from_report() {
        let resp = ImportResponse::new(
            "players.csv",
            ImportReport {
                imported: 3,
                skipped: 1,
            },
        );
        assert_eq!(resp.imported, 3);
        assert_eq!(resp.skipped, 1);
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            evictions: 5,
            invalidations: 2,
            total_entries: 5,
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.invalidations, 2);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::from(CacheStats::default());
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_string(&ErrorResponse::new("Something went wrong")).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
