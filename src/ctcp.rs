//! CTCP (Client-to-Client Protocol) framing.
//!
//! CTCP messages are carried inside `PRIVMSG` bodies, wrapped in the `\x01`
//! delimiter at both ends: a leading whitespace-delimited sub-command token
//! followed by optional parameters.

use std::fmt;

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIMITER: char = '\x01';

/// A CTCP payload split into its sub-command and parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctcp<'a> {
    /// The sub-command token.
    pub command: &'a str,
    /// Everything after the sub-command, if non-empty.
    pub params: Option<&'a str>,
}

impl<'a> Ctcp<'a> {
    /// Parse a message body as CTCP.
    ///
    /// Returns `None` unless the body is wrapped in the delimiter at both
    /// ends and carries a sub-command token.
    ///
    /// # Example
    ///
    /// ```
    /// use ircline::Ctcp;
    ///
    /// let ctcp = Ctcp::parse("\x01ACTION waves hello\x01").unwrap();
    /// assert_eq!(ctcp.command, "ACTION");
    /// assert_eq!(ctcp.params, Some("waves hello"));
    /// ```
    pub fn parse(body: &'a str) -> Option<Self> {
        let inner = body
            .strip_prefix(CTCP_DELIMITER)?
            .strip_suffix(CTCP_DELIMITER)?;

        let (command, params) = match inner.split_once(' ') {
            Some((command, rest)) => (command, (!rest.is_empty()).then_some(rest)),
            None => (inner, None),
        };
        if command.is_empty() {
            return None;
        }

        Some(Ctcp { command, params })
    }

    /// Whether a message body looks like a CTCP payload.
    #[inline]
    pub fn is_ctcp(body: &str) -> bool {
        body.starts_with(CTCP_DELIMITER) && body.ends_with(CTCP_DELIMITER) && body.len() >= 2
    }

    /// Build a CTCP payload from a sub-command and optional parameters.
    pub fn new(command: &'a str, params: Option<&'a str>) -> Self {
        Ctcp { command, params }
    }
}

impl fmt::Display for Ctcp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CTCP_DELIMITER, self.command)?;
        if let Some(params) = self.params {
            write!(f, " {}", params)?;
        }
        write!(f, "{}", CTCP_DELIMITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_params() {
        let ctcp = Ctcp::parse("\x01ACTION waves hello\x01").unwrap();
        assert_eq!(ctcp.command, "ACTION");
        assert_eq!(ctcp.params, Some("waves hello"));
    }

    #[test]
    fn test_parse_bare_command() {
        let ctcp = Ctcp::parse("\x01VERSION\x01").unwrap();
        assert_eq!(ctcp.command, "VERSION");
        assert_eq!(ctcp.params, None);
    }

    #[test]
    fn test_both_delimiters_required() {
        assert!(Ctcp::parse("\x01ACTION waves").is_none());
        assert!(Ctcp::parse("ACTION waves\x01").is_none());
        assert!(Ctcp::parse("hello world").is_none());
    }

    #[test]
    fn test_empty_payload() {
        assert!(Ctcp::parse("\x01\x01").is_none());
        assert!(Ctcp::parse("\x01 \x01").is_none());
        assert!(Ctcp::parse("").is_none());
    }

    #[test]
    fn test_display_round_trip() {
        let original = "\x01PING 1234567890\x01";
        let parsed = Ctcp::parse(original).unwrap();
        assert_eq!(parsed.to_string(), original);

        let bare = Ctcp::new("VERSION", None);
        assert_eq!(bare.to_string(), "\x01VERSION\x01");
    }

    #[test]
    fn test_is_ctcp() {
        assert!(Ctcp::is_ctcp("\x01ACTION waves\x01"));
        assert!(!Ctcp::is_ctcp("\x01unterminated"));
        assert!(!Ctcp::is_ctcp("plain text"));
        assert!(!Ctcp::is_ctcp("\x01"));
    }
}
