#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

use anyhow::{Result, bail};
use clap::Parser;
use mapty::cli::{self, Cmd, CommonFields, LogCmd};
use mapty::storage::FileStorage;
use mapty::terminal::{
    ArgsForm, ExitReload, FixedPosition, ListFormat, StderrNotifier, StdoutList, TerminalMap,
};
use mapty::ui::{RawFields, Ui};
use mapty::{Coords, Session, utils};

#[macro_use]
extern crate mapty;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let storage = FileStorage::new(&cli.store);
    dlog!("store={}", storage.path().display());
    let mut geolocation = FixedPosition(cli.home);

    match cli.cmd {
        Cmd::Log { workout } => {
            let (coords, fields, cycling) = log_fields(workout);
            let ui = terminal_ui(ArgsForm::new(fields), ListFormat::Silent);
            let mut session = Session::start(storage, ui);
            session.load_map(&mut geolocation);

            if !session.on_map_clicked(coords) {
                bail!("Invalid location: {coords}");
            }
            if cycling {
                session.on_type_toggled();
            }
            let id = session.submit_form()?;
            println!("{id}");
            Ok(())
        }
        Cmd::List { details } => {
            let ui = terminal_ui(ArgsForm::default(), ListFormat::Summary { details });
            let session = Session::start(storage, ui);
            if session.store().is_empty() {
                tracing::info!("no workouts saved yet");
            }
            Ok(())
        }
        Cmd::Show { id } => {
            let ui = terminal_ui(ArgsForm::default(), ListFormat::Silent);
            let mut session = Session::start(storage, ui);
            session.load_map(&mut geolocation);
            if !session.on_workout_list_item_clicked(id) {
                bail!("No workout with id {id}");
            }
            Ok(())
        }
        Cmd::Html => {
            let ui = terminal_ui(ArgsForm::default(), ListFormat::Html);
            Session::start(storage, ui);
            Ok(())
        }
        Cmd::Reset => {
            let ui = terminal_ui(ArgsForm::default(), ListFormat::Silent);
            let mut session = Session::start(storage, ui);
            session.reset()?;
            Ok(())
        }
    }
}

fn log_fields(cmd: LogCmd) -> (Coords, RawFields, bool) {
    match cmd {
        LogCmd::Running { common, cadence } => {
            let (coords, fields) = common_fields(common, "running");
            (coords, RawFields { cadence, ..fields }, false)
        }
        LogCmd::Cycling { common, elevation } => {
            let (coords, fields) = common_fields(common, "cycling");
            (coords, RawFields { elevation, ..fields }, true)
        }
    }
}

fn common_fields(common: CommonFields, kind: &str) -> (Coords, RawFields) {
    let CommonFields {
        lat,
        lng,
        distance,
        duration,
    } = common;
    let fields = RawFields {
        kind: kind.to_string(),
        distance,
        duration,
        ..RawFields::default()
    };
    (Coords::new(lat, lng), fields)
}

fn terminal_ui(form: ArgsForm, format: ListFormat) -> Ui {
    Ui {
        map: Box::new(TerminalMap),
        form: Box::new(form),
        list: Box::new(StdoutList { format }),
        notifier: Box::new(StderrNotifier),
        reload: Box::new(ExitReload),
    }
}
