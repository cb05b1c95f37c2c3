use crate::dlog;
use crate::error::{INVALID_INPUT_MESSAGE, SessionError, ValidationError};
use crate::render::marker_popup_text;
use crate::storage::SnapshotStorage;
use crate::store::WorkoutStore;
use crate::types::{Coords, IdGenerator, Workout, WorkoutId, WorkoutKind};
use crate::ui::{
    FALLBACK_POSITION, Geolocation, MapView, MarkerStyle, RawFields, Ui, ZOOM_IN, ZOOM_OUT,
};
use chrono::{DateTime, Utc};

const GEOLOCATION_FAILED_MESSAGE: &str = "Could not get your position";
const PERSIST_FAILED_MESSAGE: &str = "Could not save your workouts";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    Idle,
    AwaitingForm { pending: Coords },
}

/// Form input that passed validation, ready to become a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidatedInput {
    Running {
        distance_km: f64,
        duration_min: f64,
        cadence_steps_per_min: f64,
    },
    Cycling {
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    },
}

impl ValidatedInput {
    /// Pace (min/km) for runs, speed (km/h) for rides.
    pub fn derived_metric(self) -> (&'static str, f64) {
        match self {
            Self::Running {
                distance_km,
                duration_min,
                ..
            } => ("pace", duration_min / distance_km),
            Self::Cycling {
                distance_km,
                duration_min,
                ..
            } => ("speed", distance_km / (duration_min / 60.0)),
        }
    }

    pub fn into_workout(
        self,
        id: WorkoutId,
        coords: Coords,
        timestamp: Option<DateTime<Utc>>,
    ) -> Workout {
        match self {
            Self::Running {
                distance_km,
                duration_min,
                cadence_steps_per_min,
            } => Workout::running(
                id,
                coords,
                distance_km,
                duration_min,
                cadence_steps_per_min,
                timestamp,
            ),
            Self::Cycling {
                distance_km,
                duration_min,
                elevation_gain_m,
            } => Workout::cycling(id, coords, distance_km, duration_min, elevation_gain_m, timestamp),
        }
    }
}

/// Check raw form fields.
///
/// Every number must be finite. Distance and duration must be positive, and
/// so must cadence for runs. Elevation gain may be zero or negative.
/// A blank field reads as zero. The resulting pace or speed must be finite
/// too, or the saved record could not be read back.
pub fn validate(raw: &RawFields) -> Result<ValidatedInput, ValidationError> {
    let kind: WorkoutKind = raw
        .kind
        .trim()
        .parse()
        .map_err(|_| ValidationError::UnknownKind(raw.kind.clone()))?;

    let distance_km = positive("distance", parse_number("distance", &raw.distance)?)?;
    let duration_min = positive("duration", parse_number("duration", &raw.duration)?)?;

    let input = match kind {
        WorkoutKind::Running => ValidatedInput::Running {
            distance_km,
            duration_min,
            cadence_steps_per_min: positive("cadence", parse_number("cadence", &raw.cadence)?)?,
        },
        WorkoutKind::Cycling => ValidatedInput::Cycling {
            distance_km,
            duration_min,
            elevation_gain_m: parse_number("elevation", &raw.elevation)?,
        },
    };

    let (metric, value) = input.derived_metric();
    if !value.is_finite() {
        return Err(ValidationError::DerivedNotFinite { metric });
    }
    Ok(input)
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let not_finite = || ValidationError::NotFinite {
        field,
        raw: raw.to_string(),
    };

    let value = if trimmed.is_empty() {
        0.0
    } else {
        trimmed.parse::<f64>().map_err(|_| not_finite())?
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(not_finite())
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NotPositive { field, value })
    }
}

/// Mediates between UI events, the in-memory store and persistent storage.
pub struct Session<S: SnapshotStorage> {
    store: WorkoutStore,
    storage: S,
    ui: Ui,
    ids: IdGenerator,
    pending: Option<Coords>,
    map_ready: bool,
}

impl<S: SnapshotStorage> Session<S> {
    /// Restore saved workouts and list them.
    ///
    /// Markers wait for `load_map`, since the map does not exist yet.
    pub fn start(storage: S, mut ui: Ui) -> Self {
        let mut store = WorkoutStore::new();
        let mut ids = IdGenerator::default();

        for workout in WorkoutStore::restore(&storage) {
            if !ids.observe(workout.id()) {
                tracing::warn!(id = %workout.id(), "skipping saved workout with unusable id");
                continue;
            }
            ui.list.append_workout_item(&workout);
            store.append(workout);
        }

        tracing::info!(workouts = store.len(), "session started");

        Self {
            store,
            storage,
            ui,
            ids,
            pending: None,
            map_ready: false,
        }
    }

    /// Center the map on the current position, or on the fallback when the
    /// position is unavailable, then draw every known workout.
    ///
    /// Returns the center used.
    pub fn load_map(&mut self, geolocation: &mut dyn Geolocation) -> Coords {
        let (center, zoom) = match geolocation.current_position() {
            Ok(position) => (position, ZOOM_IN),
            Err(e) => {
                tracing::warn!(err = %e, "geolocation failed; using fallback position");
                self.ui.notifier.alert(GEOLOCATION_FAILED_MESSAGE);
                (FALLBACK_POSITION, ZOOM_OUT)
            }
        };

        let map = self.ui.map.as_mut();
        map.initialize(center, zoom);
        for workout in self.store.all() {
            render_marker(map, workout);
        }
        map.add_marker(center, "Current Position", &MarkerStyle::pinned());
        self.map_ready = true;

        tracing::info!(center = %center, zoom, markers = self.store.len(), "map loaded");
        center
    }

    /// Remember where the user clicked and open the form.
    ///
    /// Returns `false` and changes nothing for coordinates that are not
    /// finite or lie off the globe.
    pub fn on_map_clicked(&mut self, coords: Coords) -> bool {
        if !coords.is_valid() {
            tracing::warn!(lat = coords.lat, lng = coords.lng, "ignoring click at invalid location");
            return false;
        }
        dlog!("map clicked at {coords}");
        self.pending = Some(coords);
        self.ui.map.place_pending_marker(coords);
        self.ui.form.show();
        self.ui.form.focus_first_field();
        true
    }

    /// Turn the submitted form into a workout at the pending location.
    ///
    /// Invalid input leaves the form open and nothing is stored. If saving
    /// fails the workout is still kept and shown, and
    /// `SessionError::Persist` is returned.
    pub fn on_form_submitted(&mut self, raw: &RawFields) -> Result<WorkoutId, SessionError> {
        let Some(coords) = self.pending else {
            return Err(SessionError::NoPendingLocation);
        };

        let input = match validate(raw) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(err = %e, "rejected workout input");
                self.ui.notifier.alert(INVALID_INPUT_MESSAGE);
                return Err(e.into());
            }
        };

        let Some(next) = self.ids.next_id() else {
            tracing::error!("workout id space exhausted");
            return Err(SessionError::IdsExhausted);
        };
        let workout = input.into_workout(next, coords, None);
        let id = workout.id();
        tracing::info!(id = %id, kind = %workout.kind(), "workout logged");

        self.store.append(workout.clone());
        let persisted = self.store.persist(&mut self.storage);

        if self.map_ready {
            render_marker(self.ui.map.as_mut(), &workout);
        }
        self.ui.list.append_workout_item(&workout);
        self.ui.map.remove_pending_marker();
        self.pending = None;
        self.ui.form.hide();
        self.ui.form.clear();

        persisted.map_err(|source| {
            tracing::error!(id = %id, err = %format!("{source:#}"), "failed to save workouts");
            self.ui.notifier.alert(PERSIST_FAILED_MESSAGE);
            SessionError::Persist { id, source }
        })?;

        Ok(id)
    }

    /// Submit whatever the form currently holds.
    pub fn submit_form(&mut self) -> Result<WorkoutId, SessionError> {
        let raw = self.ui.form.read_fields();
        self.on_form_submitted(&raw)
    }

    pub fn on_type_toggled(&mut self) {
        self.ui.form.toggle_field_set();
    }

    /// Fly to the clicked workout. Returns `false` if the id is unknown or
    /// the map is not loaded yet.
    pub fn on_workout_list_item_clicked(&mut self, id: WorkoutId) -> bool {
        let Some(workout) = self.store.find_by_id(id) else {
            dlog!("list click on unknown workout id={id}");
            return false;
        };
        if !self.map_ready {
            dlog!("list click before map loaded id={id}");
            return false;
        }
        self.ui.map.recenter(workout.coords(), ZOOM_IN);
        true
    }

    /// Drop every saved workout and reload. Cannot be undone.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.storage.clear_snapshot().map_err(SessionError::Reset)?;
        tracing::warn!(discarded = self.store.len(), "saved workouts cleared");
        self.ui.reload.reload_environment();
        Ok(())
    }

    pub const fn state(&self) -> SessionState {
        match self.pending {
            Some(pending) => SessionState::AwaitingForm { pending },
            None => SessionState::Idle,
        }
    }

    pub const fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn render_marker(map: &mut dyn MapView, workout: &Workout) {
    map.add_marker(
        workout.coords(),
        &marker_popup_text(workout),
        &MarkerStyle::for_kind(workout.kind()),
    );
}
