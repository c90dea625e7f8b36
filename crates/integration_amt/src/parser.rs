//! Parser for the AMT timetable pages
//!
//! The vendor pages have no stable ids or classes, so extraction is
//! positional. Every positional access is checked and reported as
//! [`AmtError::Parse`] with what was expected and what was found.

use domain::{Departure, LineDirection};
use scraper::{ElementRef, Html, Selector};

use crate::error::AmtError;

/// Cells per passage row on a stop page: line, destination, time, eta
const CELLS_PER_PASSAGE: usize = 4;

/// Position of the stop name among the `<font>` elements of a stop page
const STOP_NAME_FONT: usize = 1;

/// Structured content of a stop page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStopPage {
    /// Display name of the stop
    pub stop_name: String,
    /// Upcoming passages in document order
    pub departures: Vec<Departure>,
}

/// Structured content of a line page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLinePage {
    /// Page heading starting with `LINEA`, if present
    pub title: Option<String>,
    /// One entry per direction, in document order
    pub directions: Vec<LineDirection>,
}

fn selector(css: &str) -> Result<Selector, AmtError> {
    Selector::parse(css).map_err(|e| AmtError::Parse(format!("invalid selector '{css}': {e}")))
}

/// Element text with surrounding whitespace trimmed; inner text is kept as is
fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse the live passages page of a stop
///
/// The stop name is the second `<font>` element. Every `<tr>` with exactly
/// four descendant `<td>` cells is a passage. A page with a name but no such
/// rows has no upcoming transit and parses to an empty list.
pub fn parse_stop_page(html: &str) -> Result<ParsedStopPage, AmtError> {
    let document = Html::parse_document(html);
    let font = selector("font")?;
    let row = selector("tr")?;
    let cell = selector("td")?;

    let fonts: Vec<ElementRef<'_>> = document.select(&font).collect();
    let stop_name = fonts
        .get(STOP_NAME_FONT)
        .map(|element| trimmed_text(*element))
        .ok_or_else(|| {
            AmtError::Parse(format!(
                "missing title: expected at least {} <font> elements, found {}",
                STOP_NAME_FONT + 1,
                fonts.len()
            ))
        })?;

    let departures = document
        .select(&row)
        .filter_map(|tr| {
            let cells: Vec<String> = tr.select(&cell).map(trimmed_text).collect();
            <[String; CELLS_PER_PASSAGE]>::try_from(cells).ok()
        })
        .map(
            |[line, destination, scheduled_time, estimated_arrival]| Departure {
                line,
                destination,
                scheduled_time,
                estimated_arrival,
            },
        )
        .collect();

    Ok(ParsedStopPage {
        stop_name,
        departures,
    })
}

/// Parse the daily schedule page of a line
///
/// Direction headers are the `<font>` elements not starting with `Orari` or
/// `LINEA`; the first `LINEA` header is the page title. Each table holding at
/// least one `<td>` is paired with the direction header at the same position.
pub fn parse_line_page(html: &str) -> Result<ParsedLinePage, AmtError> {
    let document = Html::parse_document(html);
    let font = selector("font")?;
    let table = selector("table")?;
    let cell = selector("td")?;

    let mut title = None;
    let mut headers = Vec::new();
    for text in document.select(&font).map(trimmed_text) {
        if text.starts_with("LINEA") {
            if title.is_none() {
                title = Some(text);
            }
        } else if !text.starts_with("Orari") {
            headers.push(text);
        }
    }

    let tables: Vec<Vec<String>> = document
        .select(&table)
        .map(|t| t.select(&cell).map(trimmed_text).collect::<Vec<_>>())
        .filter(|times| !times.is_empty())
        .collect();

    if tables.len() > headers.len() {
        return Err(AmtError::Parse(format!(
            "missing direction header: found {} timetables but only {} headers",
            tables.len(),
            headers.len()
        )));
    }

    let directions = headers
        .into_iter()
        .zip(tables)
        .map(|(label, times)| LineDirection { label, times })
        .collect();

    Ok(ParsedLinePage { title, directions })
}
