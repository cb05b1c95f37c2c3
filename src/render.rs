use crate::types::{Workout, WorkoutDetails};
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Popup shown on a workout's map marker.
pub fn marker_popup_text(workout: &Workout) -> String {
    format!("{} {}", workout.kind().icon(), workout.description())
}

/// One `<li>` for the workout sidebar.
pub fn workout_list_item_html(workout: &Workout) -> String {
    let kind = workout.kind();
    let mut html = String::new();

    html.push_str(&format!(
        "<li class=\"workout workout--{kind}\" data-id=\"{id}\">\n",
        id = encode_double_quoted_attribute(&workout.id().to_string()),
    ));
    html.push_str(&format!(
        "  <h2 class=\"workout__title\">{}</h2>\n",
        encode_text(workout.description())
    ));
    push_detail(&mut html, kind.icon(), &workout.distance_km().to_string(), "km");
    push_detail(&mut html, "⏱", &workout.duration_min().to_string(), "min");

    match *workout.details() {
        WorkoutDetails::Running {
            pace,
            cadence_steps_per_min,
        } => {
            push_detail(&mut html, "⚡️", &format!("{pace:.1}"), "min/km");
            push_detail(&mut html, "🦶🏼", &cadence_steps_per_min.to_string(), "spm");
        }
        WorkoutDetails::Cycling {
            speed,
            elevation_gain_m,
        } => {
            push_detail(&mut html, "⚡️", &format!("{speed:.1}"), "km/h");
            push_detail(&mut html, "⛰", &elevation_gain_m.to_string(), "m");
        }
    }

    html.push_str("</li>\n");
    html
}

fn push_detail(html: &mut String, icon: &str, value: &str, unit: &str) {
    html.push_str(&format!(
        r#"  <div class="workout__details">
    <span class="workout__icon">{icon}</span>
    <span class="workout__value">{value}</span>
    <span class="workout__unit">{unit}</span>
  </div>
"#
    ));
}

/// Tab-separated line for terminal listings.
pub fn workout_summary_line(workout: &Workout, details: bool) -> String {
    let metric = match *workout.details() {
        WorkoutDetails::Running {
            pace,
            cadence_steps_per_min,
        } => format!("{pace:.1} min/km\t{cadence_steps_per_min} spm"),
        WorkoutDetails::Cycling {
            speed,
            elevation_gain_m,
        } => format!("{speed:.1} km/h\t{elevation_gain_m} m"),
    };

    let base = format!(
        "{}\t{} {}\t{} km\t{} min\t{metric}",
        workout.id(),
        workout.kind().icon(),
        workout.description(),
        workout.distance_km(),
        workout.duration_min(),
    );

    if details {
        format!(
            "{base}\t{}\t{}",
            workout.coords(),
            workout.timestamp().to_rfc3339()
        )
    } else {
        base
    }
}
