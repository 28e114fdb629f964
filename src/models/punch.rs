use super::punch_kind::PunchKind;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a punch was taken, when the device reported it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> AppResult<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(AppError::InvalidGeo(format!("lat={lat}, lon={lon}")));
        }
        Ok(Self { lat, lon })
    }
}

/// A recorded punch. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PunchEvent {
    pub id: i64,                  // ⇔ punches.id
    pub employee_id: String,      // ⇔ punches.employee_id
    pub kind: PunchKind,          // ⇔ punches.kind
    pub timestamp: DateTime<Utc>, // ⇔ punches.ts (RFC 3339, UTC)
    pub geo: Option<GeoPoint>,    // ⇔ punches.lat / punches.lon
}

impl PunchEvent {
    pub fn new(
        id: i64,
        employee_id: &str,
        kind: PunchKind,
        timestamp: DateTime<Utc>,
        geo: Option<GeoPoint>,
    ) -> Self {
        Self {
            id,
            employee_id: employee_id.to_string(),
            kind,
            timestamp,
            geo,
        }
    }
}

/// Input of `PunchRecorder::record_punch`: a punch that has no id yet.
#[derive(Debug, Clone)]
pub struct NewPunch {
    pub employee_id: String,
    pub kind: PunchKind,
    pub timestamp: DateTime<Utc>,
    pub geo: Option<GeoPoint>,
}
