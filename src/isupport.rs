//! ISUPPORT (RPL_ISUPPORT, numeric 005) value parsing.
//!
//! Servers advertise features and limits as `KEY` or `KEY=value` tokens,
//! where a value is a comma-separated list of `atom` or `atom:atom` items.

use std::collections::BTreeMap;

use crate::error::MessageParseError;

/// A classified ISUPPORT value.
///
/// Classification of the comma-separated item list:
/// - every item is a `key:value` pair → [`IsupportValue::Map`];
/// - no item is a pair → [`IsupportValue::List`];
/// - a mixture → [`IsupportValue::Mixed`], preserving original order with
///   unpaired items keyed by `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IsupportValue {
    /// A bare key with no `=`, advertising a feature flag.
    Flag,
    /// Plain atoms, in wire order.
    List(Vec<String>),
    /// All items were `key:value` pairs.
    Map(BTreeMap<String, String>),
    /// A mixture of pairs and plain atoms, in wire order.
    Mixed(Vec<(Option<String>, String)>),
}

/// Parse one ISUPPORT token into its key and classified value.
///
/// # Example
///
/// ```
/// use ircline::{parse_isupport, IsupportValue};
///
/// let (key, value) = parse_isupport("CHANTYPES=#&").unwrap();
/// assert_eq!(key, "CHANTYPES");
/// assert_eq!(value, IsupportValue::List(vec!["#&".to_owned()]));
///
/// assert_eq!(parse_isupport("EXCEPTS").unwrap().1, IsupportValue::Flag);
/// ```
pub fn parse_isupport(token: &str) -> Result<(String, IsupportValue), MessageParseError> {
    let (key, raw) = match token.split_once('=') {
        Some((key, raw)) => (key, Some(raw)),
        None => (token, None),
    };
    if key.is_empty() || key.contains(' ') {
        return Err(MessageParseError::InvalidIsupport(token.to_owned()));
    }

    let Some(raw) = raw else {
        return Ok((key.to_owned(), IsupportValue::Flag));
    };

    let items: Vec<(Option<&str>, &str)> = raw
        .split(',')
        .map(|item| match item.split_once(':') {
            Some((k, v)) => (Some(k), v),
            None => (None, item),
        })
        .collect();

    let value = if items.iter().all(|(k, _)| k.is_some()) {
        IsupportValue::Map(
            items
                .into_iter()
                .map(|(k, v)| (k.unwrap_or_default().to_owned(), v.to_owned()))
                .collect(),
        )
    } else if items.iter().all(|(k, _)| k.is_none()) {
        IsupportValue::List(items.into_iter().map(|(_, v)| v.to_owned()).collect())
    } else {
        IsupportValue::Mixed(
            items
                .into_iter()
                .map(|(k, v)| (k.map(str::to_owned), v.to_owned()))
                .collect(),
        )
    };

    Ok((key.to_owned(), value))
}

/// Accumulated ISUPPORT advertisements from one or more 005 lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Isupport {
    entries: BTreeMap<String, IsupportValue>,
}

impl Isupport {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one classified entry. A repeated key is overwritten.
    pub fn insert(&mut self, key: String, value: IsupportValue) {
        self.entries.insert(key, value);
    }

    /// Get the classified value for a key.
    pub fn get(&self, key: &str) -> Option<&IsupportValue> {
        self.entries.get(key)
    }

    /// Check whether a key has been advertised at all.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IsupportValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Mapping from channel-privilege symbols to the mode letters they signify,
/// parsed from the ISUPPORT `PREFIX` value.
///
/// # Example
///
/// ```
/// use ircline::PrefixMap;
///
/// let map = PrefixMap::parse("(ov)@+").unwrap();
/// assert_eq!(map.mode_for_symbol('@'), Some('o'));
/// assert_eq!(map.symbol_for_mode('v'), Some('+'));
/// assert!(map.is_symbol('+'));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixMap {
    modes: String,
    symbols: String,
}

impl PrefixMap {
    /// Parse a `PREFIX` value of the form `(letters)symbols`.
    ///
    /// The two segments are zipped positionally and must be of equal length.
    pub fn parse(s: &str) -> Result<Self, MessageParseError> {
        let invalid = || MessageParseError::InvalidPrefixSpec(s.to_owned());

        let rest = s.strip_prefix('(').ok_or_else(invalid)?;
        let (modes, symbols) = rest.split_once(')').ok_or_else(invalid)?;

        let mode_count = modes.chars().count();
        let symbol_count = symbols.chars().count();
        if mode_count != symbol_count {
            return Err(MessageParseError::PrefixLengthMismatch {
                modes: mode_count,
                symbols: symbol_count,
            });
        }

        Ok(PrefixMap {
            modes: modes.to_owned(),
            symbols: symbols.to_owned(),
        })
    }

    /// The mode letters, in advertisement order.
    pub fn modes(&self) -> &str {
        &self.modes
    }

    /// The privilege symbols, in advertisement order.
    pub fn symbols(&self) -> &str {
        &self.symbols
    }

    /// Whether the character is a recognized privilege symbol.
    pub fn is_symbol(&self, symbol: char) -> bool {
        self.symbols.contains(symbol)
    }

    /// The mode letter a privilege symbol signifies.
    pub fn mode_for_symbol(&self, symbol: char) -> Option<char> {
        self.symbols
            .chars()
            .position(|c| c == symbol)
            .and_then(|i| self.modes.chars().nth(i))
    }

    /// The privilege symbol for a mode letter.
    pub fn symbol_for_mode(&self, mode: char) -> Option<char> {
        self.modes
            .chars()
            .position(|c| c == mode)
            .and_then(|i| self.symbols.chars().nth(i))
    }

    /// Iterate over `(symbol, mode)` pairs in advertisement order.
    pub fn iter(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.symbols.chars().zip(self.modes.chars())
    }
}
