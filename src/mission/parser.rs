//! Mission text parser
//!
//! Decodes a human-writable mission description into a staging [`Mission`].
//! The grammar is whitespace-separated ASCII tokens:
//!
//! - initial pose: a 2-character coordinate followed by a heading letter,
//!   e.g. `B1N`
//! - waypoints: a coordinate, the letter `T`, and 1-5 decimal digits of
//!   deciseconds, e.g. `E1T150`
//!
//! A coordinate is one column letter `A`..`I` and one row digit `1`..`9` in
//! either order, case-insensitive. Digit-first order sets the waypoint's
//! row-first bit, which tells the plan engine to align rows before columns.
//!
//! Parsing is all-or-nothing: the first violated rule aborts with a
//! [`ParseError`] and the caller's previously active mission stays intact
//! (the staging/commit dance lives in [`super::store`]).

use crate::geometry::{Cell, Heading, Pose};

use super::codec::{Waypoint, MAX_TIME_DS};
use super::{Mission, MAX_WAYPOINTS};

/// Why a mission text was rejected. The first violated rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Initial heading letter not one of N/E/S/W
    InvalidOrient,
    /// Column outside A..I or row outside 1..9, or a malformed coordinate
    InvalidCoords,
    /// Time field missing digits, zero, non-numeric or over 15 bits
    InvalidTime,
    /// Input ended in the middle of a token
    UnexpectedEnd,
    /// More waypoints than the slot capacity (64)
    PlanTooLong,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::InvalidOrient => write!(f, "invalid heading letter"),
            ParseError::InvalidCoords => write!(f, "invalid grid coordinate"),
            ParseError::InvalidTime => write!(f, "invalid time point"),
            ParseError::UnexpectedEnd => write!(f, "unexpected end of input"),
            ParseError::PlanTooLong => write!(f, "too many waypoints"),
        }
    }
}

/// Parse mission text into `staging`, replacing its previous contents.
///
/// On error the staging mission is left cleared, never half-filled with a
/// mix of old and new waypoints.
pub fn parse_mission(text: &str, staging: &mut Mission) -> Result<(), ParseError> {
    staging.clear();

    let mut tokens = text.split_ascii_whitespace();

    let init = tokens.next().ok_or(ParseError::UnexpectedEnd)?;
    staging.set_start(parse_init_pose(init)?);

    for token in tokens {
        if staging.len() == MAX_WAYPOINTS {
            staging.clear();
            return Err(ParseError::PlanTooLong);
        }
        match parse_waypoint(token) {
            Ok(wp) => {
                // Capacity was checked above
                let _ = staging.push(wp);
            }
            Err(e) => {
                staging.clear();
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Parse an initial-pose token: coordinate + heading letter, exactly 3 chars.
fn parse_init_pose(token: &str) -> Result<Pose, ParseError> {
    let bytes = token.as_bytes();
    if bytes.len() < 3 {
        return Err(ParseError::UnexpectedEnd);
    }

    let (cell, _) = parse_coord(bytes[0], bytes[1])?;
    if bytes.len() > 3 {
        // Trailing characters after the heading letter
        return Err(ParseError::InvalidOrient);
    }
    let heading = parse_heading(bytes[2])?;

    Ok(Pose::new(cell, heading))
}

/// Parse a waypoint token: coordinate + `T` + 1-5 digits.
fn parse_waypoint(token: &str) -> Result<Waypoint, ParseError> {
    let bytes = token.as_bytes();
    if bytes.len() < 3 {
        return Err(ParseError::UnexpectedEnd);
    }

    let (cell, row_first) = parse_coord(bytes[0], bytes[1])?;

    if !bytes[2].eq_ignore_ascii_case(&b't') {
        return Err(ParseError::InvalidCoords);
    }

    let digits = &bytes[3..];
    if digits.is_empty() {
        return Err(ParseError::UnexpectedEnd);
    }
    if digits.len() > 5 {
        return Err(ParseError::InvalidTime);
    }

    let mut time: u32 = 0;
    for &d in digits {
        if !d.is_ascii_digit() {
            return Err(ParseError::InvalidTime);
        }
        time = time * 10 + u32::from(d - b'0');
    }
    if time == 0 || time > u32::from(MAX_TIME_DS) {
        return Err(ParseError::InvalidTime);
    }

    Ok(Waypoint {
        col: cell.col,
        row: cell.row,
        row_first,
        time_ds: time as u16,
    })
}

/// Parse a 2-character coordinate in either letter/digit order.
///
/// Returns the cell and the row-first flag (true when the row digit came
/// before the column letter).
fn parse_coord(a: u8, b: u8) -> Result<(Cell, bool), ParseError> {
    match (coord_char(a), coord_char(b)) {
        (CoordChar::Col(col), CoordChar::Row(row)) => Ok((Cell::new(col, row), false)),
        (CoordChar::Row(row), CoordChar::Col(col)) => Ok((Cell::new(col, row), true)),
        _ => Err(ParseError::InvalidCoords),
    }
}

enum CoordChar {
    Col(u8),
    Row(u8),
    Other,
}

fn coord_char(c: u8) -> CoordChar {
    match c.to_ascii_lowercase() {
        l @ b'a'..=b'i' => CoordChar::Col(l - b'a' + 1),
        d @ b'1'..=b'9' => CoordChar::Row(d - b'0'),
        _ => CoordChar::Other,
    }
}

fn parse_heading(c: u8) -> Result<Heading, ParseError> {
    match c.to_ascii_lowercase() {
        b'n' => Ok(Heading::North),
        b'e' => Ok(Heading::East),
        b's' => Ok(Heading::South),
        b'w' => Ok(Heading::West),
        _ => Err(ParseError::InvalidOrient),
    }
}
