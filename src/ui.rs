//! Interfaces the session drives. A front end (browser bindings, the
//! terminal driver in `terminal`, test recorders) implements these and
//! forwards its own events to `Session`'s handlers.

use crate::error::GeolocationError;
use crate::types::{Coords, Workout, WorkoutKind};

/// Zoom used when focusing on a position or a logged workout.
pub const ZOOM_IN: u8 = 14;
/// Zoom used when the current position is unknown.
pub const ZOOM_OUT: u8 = 8;

/// Center used when geolocation fails.
pub const FALLBACK_POSITION: Coords = Coords::new(31.412_716_150_952_58, 34.968_578_517_436_99);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerStyle {
    /// CSS class for the popup, e.g. `running-popup`.
    pub class_name: Option<String>,
    /// Keep the popup open after other popups open.
    pub pinned: bool,
}

impl MarkerStyle {
    pub fn for_kind(kind: WorkoutKind) -> Self {
        Self {
            class_name: Some(format!("{kind}-popup")),
            pinned: false,
        }
    }

    pub const fn pinned() -> Self {
        Self {
            class_name: None,
            pinned: true,
        }
    }
}

pub trait MapView {
    fn initialize(&mut self, center: Coords, zoom: u8);
    fn add_marker(&mut self, coords: Coords, popup_text: &str, style: &MarkerStyle);
    fn recenter(&mut self, coords: Coords, zoom: u8);
    /// Show (or move) the temporary "Chosen location" marker.
    fn place_pending_marker(&mut self, coords: Coords);
    fn remove_pending_marker(&mut self);
}

pub trait Geolocation {
    /// Resolves exactly once: a fix, or the reason there is none.
    fn current_position(&mut self) -> Result<Coords, GeolocationError>;
}

/// Field values exactly as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub kind: String,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

pub trait WorkoutForm {
    fn show(&mut self);
    fn hide(&mut self);
    fn read_fields(&self) -> RawFields;
    /// Swap which of cadence / elevation is visible.
    fn toggle_field_set(&mut self);
    fn clear(&mut self);
    fn focus_first_field(&mut self);
}

pub trait WorkoutList {
    fn append_workout_item(&mut self, workout: &Workout);
}

pub trait Notifier {
    fn alert(&mut self, message: &str);
}

pub trait Reload {
    fn reload_environment(&mut self);
}

/// Every collaborator a `Session` talks to besides storage.
pub struct Ui {
    pub map: Box<dyn MapView>,
    pub form: Box<dyn WorkoutForm>,
    pub list: Box<dyn WorkoutList>,
    pub notifier: Box<dyn Notifier>,
    pub reload: Box<dyn Reload>,
}
