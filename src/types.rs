use crate::error::{DecodeError, ParseCoordsError, ParseKindError};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// A map location. Persisted as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and on the globe: latitude in [-90, 90], longitude in [-180, 180].
    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

/// Parses `LAT,LNG` as typed on the command line.
impl FromStr for Coords {
    type Err = ParseCoordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordsError(s.to_string());
        let (lat, lng) = s.split_once(',').ok_or_else(err)?;
        let lat: f64 = lat.trim().parse().map_err(|_| err())?;
        let lng: f64 = lng.trim().parse().map_err(|_| err())?;
        let coords = Self { lat, lng };
        if !coords.is_valid() {
            return Err(err());
        }
        Ok(coords)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(pub u64);

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for WorkoutId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}

/// Kind-specific payload. The `kind` key doubles as the snapshot tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkoutDetails {
    Running {
        /// min/km
        pace: f64,
        #[serde(rename = "cadenceStepsPerMin")]
        cadence_steps_per_min: f64,
    },
    Cycling {
        /// km/h
        speed: f64,
        #[serde(rename = "elevationGainM")]
        elevation_gain_m: f64,
    },
}

/// A single logged session.
///
/// Fields are private: a workout is fixed once built, so the derived metric
/// and description always match the values they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    id: WorkoutId,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    timestamp: DateTime<Utc>,
    description: String,
    #[serde(flatten)]
    details: WorkoutDetails,
}

impl Workout {
    /// Build a running workout; `pace = duration / distance`.
    ///
    /// Positivity of the inputs is checked by the caller.
    pub fn running(
        id: WorkoutId,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        cadence_steps_per_min: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        debug_assert!(distance_km > 0.0 && duration_min > 0.0);
        let details = WorkoutDetails::Running {
            pace: duration_min / distance_km,
            cadence_steps_per_min,
        };
        Self::build(id, coords, distance_km, duration_min, timestamp, details)
    }

    /// Build a cycling workout; `speed = distance / (duration / 60)`.
    pub fn cycling(
        id: WorkoutId,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        debug_assert!(distance_km > 0.0 && duration_min > 0.0);
        let details = WorkoutDetails::Cycling {
            speed: distance_km / (duration_min / 60.0),
            elevation_gain_m,
        };
        Self::build(id, coords, distance_km, duration_min, timestamp, details)
    }

    fn build(
        id: WorkoutId,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        timestamp: Option<DateTime<Utc>>,
        details: WorkoutDetails,
    ) -> Self {
        let timestamp = timestamp.unwrap_or_else(Utc::now);
        let description = describe(details.kind(), timestamp);
        Self {
            id,
            coords,
            distance_km,
            duration_min,
            timestamp,
            description,
            details,
        }
    }

    /// Rebuild a workout from one persisted record.
    ///
    /// Every stored field is taken as-is, including id, timestamp,
    /// description and the derived metric.
    pub fn from_snapshot(snapshot: JsonValue) -> Result<Self, DecodeError> {
        let kind = match snapshot.get("kind") {
            None | Some(JsonValue::Null) => return Err(DecodeError::MissingKind),
            Some(JsonValue::String(s)) => s
                .parse::<WorkoutKind>()
                .map_err(|e| DecodeError::UnknownKind(e.0))?,
            Some(other) => return Err(DecodeError::UnknownKind(other.to_string())),
        };

        serde_json::from_value(snapshot).map_err(|source| DecodeError::Malformed { kind, source })
    }

    pub fn to_snapshot(&self) -> serde_json::Result<JsonValue> {
        serde_json::to_value(self)
    }

    pub const fn id(&self) -> WorkoutId {
        self.id
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub const fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn details(&self) -> &WorkoutDetails {
        &self.details
    }

    pub const fn kind(&self) -> WorkoutKind {
        self.details.kind()
    }

    pub const fn pace(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Running { pace, .. } => Some(pace),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    pub const fn speed(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling { speed, .. } => Some(speed),
            WorkoutDetails::Running { .. } => None,
        }
    }
}

impl WorkoutDetails {
    pub const fn kind(&self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// "<Kind> on <Month> <Day>", using the local calendar date.
pub fn describe(kind: WorkoutKind, timestamp: DateTime<Utc>) -> String {
    let local = timestamp.with_timezone(&Local);
    format!("{} on {}", kind.label(), local.format("%B %-d"))
}

/// Hands out strictly increasing ids, starting from the wall clock in ms.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// `None` once the id space is used up.
    pub fn next_id(&mut self) -> Option<WorkoutId> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = now.max(self.last.checked_add(1)?);
        Some(WorkoutId(self.last))
    }

    /// Record an id issued elsewhere (e.g. restored from disk).
    ///
    /// Returns `false`, leaving the generator untouched, for an id with no
    /// successor; accepting it would leave nothing to hand out.
    pub fn observe(&mut self, id: WorkoutId) -> bool {
        if id.0 == u64::MAX {
            return false;
        }
        self.last = self.last.max(id.0);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
    }

    fn here() -> Coords {
        Coords::new(31.4, 34.9)
    }

    #[test]
    fn running_pace_is_duration_over_distance() {
        let w = Workout::running(WorkoutId(1), here(), 5.0, 30.0, 180.0, Some(ts()));
        assert_eq!(w.pace(), Some(6.0));
        assert_eq!(w.speed(), None);
        assert_eq!(w.kind(), WorkoutKind::Running);

        let w = Workout::running(WorkoutId(2), here(), 3.3, 17.2, 170.0, Some(ts()));
        assert_eq!(w.pace(), Some(17.2 / 3.3));
    }

    #[test]
    fn cycling_speed_is_km_per_hour() {
        let w = Workout::cycling(WorkoutId(1), here(), 20.0, 60.0, 150.0, Some(ts()));
        assert_eq!(w.speed(), Some(20.0));
        assert_eq!(w.pace(), None);

        let w = Workout::cycling(WorkoutId(2), here(), 27.0, 95.0, -12.0, Some(ts()));
        assert_eq!(w.speed(), Some(27.0 / (95.0 / 60.0)));
    }

    #[test]
    fn description_uses_capitalized_kind_and_full_month() {
        let d = describe(WorkoutKind::Cycling, ts());
        // Noon UTC lands on the 5th or 6th depending on the local offset.
        assert!(
            d == "Cycling on March 5" || d == "Cycling on March 6",
            "unexpected description {d:?}"
        );

        let w = Workout::running(WorkoutId(1), here(), 5.0, 30.0, 180.0, Some(ts()));
        assert_eq!(w.description(), describe(WorkoutKind::Running, ts()));
    }

    #[test]
    fn missing_timestamp_defaults_to_now() {
        let before = Utc::now();
        let w = Workout::running(WorkoutId(1), here(), 5.0, 30.0, 180.0, None);
        assert!(w.timestamp() >= before);
        assert!(w.timestamp() <= Utc::now());
    }

    #[test]
    fn snapshot_has_documented_keys() {
        let w = Workout::running(WorkoutId(42), here(), 5.0, 30.0, 180.0, Some(ts()));
        let v = w.to_snapshot().unwrap();
        assert_eq!(v["kind"], "running");
        assert_eq!(v["id"], 42);
        assert_eq!(v["coords"], json!([31.4, 34.9]));
        assert_eq!(v["distanceKm"], 5.0);
        assert_eq!(v["durationMin"], 30.0);
        assert_eq!(v["pace"], 6.0);
        assert_eq!(v["cadenceStepsPerMin"], 180.0);
        assert_eq!(v["timestamp"], "2024-03-05T12:00:00Z");
        assert!(v.get("speed").is_none());

        let c = Workout::cycling(WorkoutId(43), here(), 20.0, 60.0, 150.0, Some(ts()));
        let v = c.to_snapshot().unwrap();
        assert_eq!(v["kind"], "cycling");
        assert_eq!(v["speed"], 20.0);
        assert_eq!(v["elevationGainM"], 150.0);
        assert!(v.get("pace").is_none());
    }

    #[test]
    fn snapshot_round_trip_preserves_every_field() {
        let run = Workout::running(WorkoutId(7), here(), 4.2, 25.5, 172.0, None);
        let ride = Workout::cycling(WorkoutId(8), here(), 31.7, 83.0, 0.0, None);
        for w in [run, ride] {
            let back = Workout::from_snapshot(w.to_snapshot().unwrap()).unwrap();
            assert_eq!(back, w);
        }
    }

    #[test]
    fn from_snapshot_copies_stored_fields_verbatim() {
        let v = json!({
            "kind": "running",
            "id": 99,
            "coords": [1.0, 2.0],
            "distanceKm": 10,
            "durationMin": 50,
            "timestamp": "2023-01-02T08:00:00Z",
            "description": "Running on January 2",
            "pace": 4.0,
            "cadenceStepsPerMin": 160
        });
        let w = Workout::from_snapshot(v).unwrap();
        assert_eq!(w.id(), WorkoutId(99));
        assert_eq!(w.coords(), Coords::new(1.0, 2.0));
        // stored pace is trusted, not recomputed from 50 / 10
        assert_eq!(w.pace(), Some(4.0));
        assert_eq!(w.description(), "Running on January 2");
    }

    #[test]
    fn from_snapshot_rejects_bad_kinds() {
        let missing = Workout::from_snapshot(json!({ "id": 1 }));
        assert!(matches!(missing, Err(DecodeError::MissingKind)));

        let unknown = Workout::from_snapshot(json!({ "kind": "swimming", "id": 1 }));
        assert!(matches!(unknown, Err(DecodeError::UnknownKind(k)) if k == "swimming"));

        let not_string = Workout::from_snapshot(json!({ "kind": 3 }));
        assert!(matches!(not_string, Err(DecodeError::UnknownKind(_))));
    }

    #[test]
    fn from_snapshot_reports_malformed_fields() {
        let v = json!({ "kind": "cycling", "id": 1, "coords": [0.0, 0.0] });
        let err = Workout::from_snapshot(v).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Malformed {
                kind: WorkoutKind::Cycling,
                ..
            }
        ));
    }

    #[test]
    fn id_generator_is_strictly_increasing() {
        let mut ids = IdGenerator::default();
        let a = ids.next_id().unwrap();
        let b = ids.next_id().unwrap();
        let c = ids.next_id().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn id_generator_skips_past_observed_ids() {
        let mut ids = IdGenerator::default();
        let far = WorkoutId(u64::try_from(Utc::now().timestamp_millis()).unwrap() + 1_000_000);
        assert!(ids.observe(far));
        assert_eq!(ids.next_id(), Some(WorkoutId(far.0 + 1)));
    }

    #[test]
    fn parses_coords_and_kinds() {
        assert_eq!("31.4, 34.9".parse::<Coords>().unwrap(), here());
        assert!("31.4".parse::<Coords>().is_err());
        assert!("95,0".parse::<Coords>().is_err());
        assert_eq!("cycling".parse::<WorkoutKind>().unwrap(), WorkoutKind::Cycling);
        assert!("Running".parse::<WorkoutKind>().is_err());
    }

    #[test]
    fn id_generator_refuses_ids_without_successor() {
        let mut ids = IdGenerator::default();
        assert!(!ids.observe(WorkoutId(u64::MAX)));
        let a = ids.next_id().unwrap();
        let b = ids.next_id().unwrap();
        assert!(a < b);

        assert!(ids.observe(WorkoutId(u64::MAX - 1)));
        assert_eq!(ids.next_id(), Some(WorkoutId(u64::MAX)));
        assert_eq!(ids.next_id(), None);
    }

    #[test]
    fn coords_validity_covers_range_and_non_finite_values() {
        assert!(here().is_valid());
        assert!(Coords::new(-90.0, 180.0).is_valid());
        assert!(!Coords::new(f64::NAN, 2.0).is_valid());
        assert!(!Coords::new(1.0, f64::INFINITY).is_valid());
        assert!(!Coords::new(91.0, 0.0).is_valid());
        assert!("NaN,1".parse::<Coords>().is_err());
    }
}
