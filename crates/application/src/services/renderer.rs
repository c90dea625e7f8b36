//! Reply renderer
//!
//! Pure functions turning timetables, nearest-stop rankings and errors into
//! display text. The transport decides how each [`RenderMode`] is presented.

use domain::{DomainError, LineTimetable, NearbyStop, StopTimetable};

use crate::error::ApplicationError;

pub const NO_TRANSIT: &str = "No transit";
pub const NO_SUCH_LINE: &str = "No such line";
pub const INVALID_CODE: &str = "Invalid code";
pub const INVALID_LOCATION: &str = "Invalid location";
pub const SERVICE_UNAVAILABLE: &str = "Timetable service unavailable, please try again later";
pub const UNEXPECTED_ANSWER: &str = "Unexpected answer from the timetable service";
pub const INTERNAL_FAILURE: &str = "Something went wrong, please try again";
pub const SETTINGS_SAVED: &str = "Settings saved";
pub const SETTINGS_NOT_SAVED: &str = "Settings not saved";

/// Width of the label column in the stop timetable
const LABEL_WIDTH: usize = 17;

const HELP_TEXT: &str = "Get information about AMT bus stops in Genoa.\n\n\
Send a stop code (4 digits) to receive the next departures from that stop.\n\
Send a line number to receive today's departures from its terminals.\n\
Send your location to find the nearest stops.\n\n\
/stops sets how many nearby stops are listed.\n\
/cancel aborts a pending setting.";

/// How the transport should present a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Unformatted text
    PlainText,
    /// Fixed-width block; column alignment must be preserved
    MonospaceBlock,
}

/// Rendered reply text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    pub text: String,
    pub mode: RenderMode,
}

impl DisplayText {
    /// Plain text
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: RenderMode::PlainText,
        }
    }

    /// Monospace block
    pub fn monospace(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: RenderMode::MonospaceBlock,
        }
    }
}

fn labelled(label: &str, value: &str) -> String {
    format!("{label:<width$}: {value}\n", width = LABEL_WIDTH)
}

/// Departures from a stop, or [`NO_TRANSIT`] when there are none
pub fn render_stop_timetable(timetable: &StopTimetable) -> DisplayText {
    if timetable.is_empty() {
        return DisplayText::plain(NO_TRANSIT);
    }

    let mut text = labelled("Stop", &timetable.stop_name);
    text.push('\n');
    for departure in &timetable.departures {
        text.push_str(&labelled("Line", &departure.line));
        text.push_str(&labelled("Destination", &departure.destination));
        text.push_str(&labelled("Scheduled time", &departure.scheduled_time));
        text.push_str(&labelled("Time remaining", &departure.estimated_arrival));
        text.push('\n');
    }

    DisplayText::monospace(text)
}

/// Departure times per direction, or [`NO_SUCH_LINE`] when there are none
pub fn render_line_timetable(timetable: &LineTimetable) -> DisplayText {
    if timetable.is_empty() {
        return DisplayText::plain(NO_SUCH_LINE);
    }

    let mut text = String::new();
    if let Some(title) = &timetable.title {
        text.push_str(title);
        text.push_str("\n\n");
    }
    for direction in &timetable.directions {
        text.push_str(&direction.label);
        text.push('\n');
        text.push_str(&direction.times.join(", "));
        text.push_str("\n\n");
    }

    DisplayText::monospace(text)
}

/// Ranked nearest stops with their distance in whole meters
pub fn render_nearest(nearest: &[NearbyStop]) -> DisplayText {
    let mut text = String::from(if nearest.len() == 1 {
        "Nearest stop:\n"
    } else {
        "Nearest stops:\n"
    });

    for entry in nearest {
        text.push_str(&format!(
            "Name : {}\nCode : {}\nDistance : {} meters\n\n",
            entry.stop.display_name(),
            entry.stop.code,
            entry.distance_meters()
        ));
    }

    DisplayText::plain(text)
}

/// Collapse an error into the short string shown to the user
pub fn render_error(error: &ApplicationError) -> DisplayText {
    let text = match error {
        ApplicationError::Domain(
            DomainError::InvalidStopCode(_) | DomainError::InvalidLineNumber(_),
        ) => INVALID_CODE.to_string(),
        ApplicationError::Domain(DomainError::InvalidCoordinate(_)) => {
            INVALID_LOCATION.to_string()
        },
        ApplicationError::Domain(DomainError::InvalidStopCount { max, .. }) => {
            stop_count_prompt(*max)
        },
        ApplicationError::Retrieval(_) => SERVICE_UNAVAILABLE.to_string(),
        ApplicationError::Parse(_) => UNEXPECTED_ANSWER.to_string(),
        ApplicationError::Configuration(_) | ApplicationError::Internal(_) => {
            INTERNAL_FAILURE.to_string()
        },
    };

    DisplayText::plain(text)
}

/// Usage text for `/start` and `/help`
pub fn help() -> DisplayText {
    DisplayText::plain(HELP_TEXT)
}

/// Question asked when `/stops` has no argument or a bad one
pub fn stop_count_prompt(max: u32) -> String {
    format!("Please send a number between 1 and {max}")
}

/// Reply for an unrecognised slash command
pub fn unknown_command(name: &str) -> DisplayText {
    DisplayText::plain(format!("Unknown command /{name}, send /help for usage"))
}
