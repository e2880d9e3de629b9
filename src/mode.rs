//! MODE-string expansion.

use crate::error::{MessageParseError, ModeParseError};

/// One expanded mode change: a direction and the mode letter it applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeChange {
    /// `true` for `+`, `false` for `-`.
    pub is_add: bool,
    /// The mode letter.
    pub mode: char,
}

impl ModeChange {
    /// An added mode.
    pub fn add(mode: char) -> Self {
        ModeChange { is_add: true, mode }
    }

    /// A removed mode.
    pub fn remove(mode: char) -> Self {
        ModeChange {
            is_add: false,
            mode,
        }
    }
}

/// Expand a MODE string like `+ab-c` into one [`ModeChange`] per letter.
///
/// Each `+`/`-` sets the current direction, which applies to every following
/// letter until the next sign. The string must begin with a sign; an empty
/// string expands to no changes.
///
/// # Example
///
/// ```
/// use ircline::{parse_mode_string, ModeChange};
///
/// let changes = parse_mode_string("+ab-c").unwrap();
/// assert_eq!(
///     changes,
///     vec![
///         ModeChange::add('a'),
///         ModeChange::add('b'),
///         ModeChange::remove('c'),
///     ]
/// );
/// ```
pub fn parse_mode_string(s: &str) -> Result<Vec<ModeChange>, MessageParseError> {
    let mut chars = s.chars();

    let mut is_add = match chars.next() {
        Some('+') => true,
        Some('-') => false,
        Some(_) => {
            return Err(MessageParseError::InvalidModeString {
                string: s.to_owned(),
                cause: ModeParseError::MissingModeModifier,
            })
        }
        None => return Ok(Vec::new()),
    };

    let mut changes = Vec::new();
    for c in chars {
        match c {
            '+' => is_add = true,
            '-' => is_add = false,
            mode => changes.push(ModeChange { is_add, mode }),
        }
    }

    Ok(changes)
}
