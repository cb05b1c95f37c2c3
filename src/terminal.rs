//! Collaborators backing the `mapty` binary. There is no real map or form
//! on a terminal; these stand-ins take their input from command-line
//! arguments and print what a browser would display.

use crate::dlog;
use crate::error::GeolocationError;
use crate::render::{workout_list_item_html, workout_summary_line};
use crate::types::{Coords, Workout};
use crate::ui::{
    Geolocation, MapView, MarkerStyle, Notifier, RawFields, Reload, WorkoutForm, WorkoutList,
};

/// Prints recenter requests; everything else is logged.
#[derive(Debug, Default)]
pub struct TerminalMap;

impl MapView for TerminalMap {
    fn initialize(&mut self, center: Coords, zoom: u8) {
        dlog!("map initialized center={center} zoom={zoom}");
    }

    fn add_marker(&mut self, coords: Coords, popup_text: &str, style: &MarkerStyle) {
        dlog!(
            "marker at {coords} popup={popup_text:?} class={:?}",
            style.class_name
        );
    }

    fn recenter(&mut self, coords: Coords, zoom: u8) {
        println!("{coords}\tzoom={zoom}");
    }

    fn place_pending_marker(&mut self, coords: Coords) {
        dlog!("pending marker at {coords}");
    }

    fn remove_pending_marker(&mut self) {
        dlog!("pending marker removed");
    }
}

/// A position given up front, or none at all.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Option<Coords>);

impl Geolocation for FixedPosition {
    fn current_position(&mut self) -> Result<Coords, GeolocationError> {
        self.0.ok_or(GeolocationError::Unavailable)
    }
}

/// Form pre-filled from command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct ArgsForm {
    fields: RawFields,
    visible: bool,
    showing_elevation: bool,
}

impl ArgsForm {
    /// Starts out showing cadence, like a fresh running form.
    pub fn new(fields: RawFields) -> Self {
        Self {
            fields,
            visible: false,
            showing_elevation: false,
        }
    }
}

impl WorkoutForm for ArgsForm {
    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn read_fields(&self) -> RawFields {
        self.fields.clone()
    }

    fn toggle_field_set(&mut self) {
        self.showing_elevation = !self.showing_elevation;
        dlog!("form shows elevation={}", self.showing_elevation);
    }

    fn clear(&mut self) {
        let kind = std::mem::take(&mut self.fields.kind);
        self.fields = RawFields {
            kind,
            ..RawFields::default()
        };
    }

    fn focus_first_field(&mut self) {
        dlog!("form focus distance visible={}", self.visible);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// Print nothing.
    Silent,
    Summary { details: bool },
    Html,
}

/// Writes each listed workout to stdout.
#[derive(Debug, Clone, Copy)]
pub struct StdoutList {
    pub format: ListFormat,
}

impl WorkoutList for StdoutList {
    fn append_workout_item(&mut self, workout: &Workout) {
        match self.format {
            ListFormat::Silent => {}
            ListFormat::Summary { details } => {
                println!("{}", workout_summary_line(workout, details));
            }
            ListFormat::Html => print!("{}", workout_list_item_html(workout)),
        }
    }
}

#[derive(Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// The process exits after each command, which is as good as a reload.
#[derive(Debug, Default)]
pub struct ExitReload;

impl Reload for ExitReload {
    fn reload_environment(&mut self) {
        tracing::info!("state cleared; next run starts empty");
    }
}
