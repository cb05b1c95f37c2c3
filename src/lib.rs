pub mod cli;
pub mod error;
pub mod render;
pub mod session;
pub mod storage;
pub mod store;
pub mod terminal;
pub mod types;
pub mod ui;
pub mod utils;

pub use error::{DecodeError, GeolocationError, SessionError, ValidationError};
pub use session::{Session, SessionState};
pub use store::WorkoutStore;
pub use types::{Coords, Workout, WorkoutDetails, WorkoutId, WorkoutKind};
