//! Owned IRC message type and parsing entry point.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::ProtocolError;
use crate::user::User;

mod parser;

pub(crate) use parser::ParsedLine;

/// Message tags: unique keys mapped to optional values.
///
/// A tag that appears on the wire without `=` maps to `None` — present but
/// valueless, which is distinct from absent. When a key is repeated, the last
/// occurrence wins.
pub type Tags = BTreeMap<String, Option<String>>;

/// An owned IRC message.
///
/// Produced by parsing one wire line (without its CRLF terminator) and never
/// mutated afterwards.
///
/// # Example
///
/// ```
/// use ircline::Message;
///
/// let msg: Message = ":nick!user@host PRIVMSG #channel :Hello!".parse().unwrap();
/// assert_eq!(msg.command, "PRIVMSG");
/// assert_eq!(msg.params, vec!["#channel", "Hello!"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// IRCv3 message tags.
    pub tags: Tags,
    /// Source prefix (server name or `nick!user@host`), if present.
    pub prefix: Option<String>,
    /// The command name. Never empty; contains no space, CR, or LF.
    pub command: String,
    /// Parameters in wire order. Only the final parameter may contain a
    /// space or be empty.
    pub params: Vec<String>,
}

impl Message {
    /// Get the value of a tag by key.
    ///
    /// Returns `None` both when the tag is absent and when it is present
    /// without a value; use [`Message::has_tag`] to distinguish.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags.get(key).and_then(|v| v.as_deref())
    }

    /// Check whether a tag is present, with or without a value.
    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// Decode the message prefix as a [`User`].
    ///
    /// `symbols` is the privilege-symbol alphabet to strip from the nick
    /// segment, typically taken from the server's `PREFIX` advertisement.
    pub fn source_user(&self, symbols: Option<&str>) -> Option<User> {
        self.prefix.as_deref().map(|p| User::parse(p, symbols))
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let parsed = ParsedLine::parse(s).map_err(|cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        })?;

        let mut tags = Tags::new();
        for (key, value) in parsed.tags {
            tags.insert(key.to_owned(), value.map(str::to_owned));
        }

        Ok(Message {
            tags,
            prefix: parsed.prefix.map(str::to_owned),
            command: parsed.command.to_owned(),
            params: parsed.params.iter().map(|p| (*p).to_owned()).collect(),
        })
    }
}
