//! Hostmask decoding.
//!
//! Decomposes a message prefix of the form `[prefixes]nick!user@host` into
//! its parts, optionally stripping channel-privilege symbols off the nick.

/// A decoded user identity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    /// Privilege symbols stripped from the front of the nick, in original
    /// order. Empty when no alphabet was supplied or none matched.
    pub prefixes: Vec<char>,
    /// The nickname, after any privilege symbols.
    pub nick: String,
    /// The username (ident); empty when absent.
    pub user: String,
    /// The hostname; empty when absent.
    pub host: String,
    /// The input string, verbatim.
    pub full: String,
}

impl User {
    /// Decode a prefix string.
    ///
    /// Splits on the first `!` for the nick segment and on the first `@` of
    /// the remainder for user and host; missing segments default to empty
    /// strings. When `symbols` is supplied, leading characters of the nick
    /// segment belonging to that alphabet are stripped into `prefixes`;
    /// without it the entire leading text is the nick.
    ///
    /// # Example
    ///
    /// ```
    /// use ircline::User;
    ///
    /// let user = User::parse("@+foo!bar@baz", Some("@+"));
    /// assert_eq!(user.prefixes, vec!['@', '+']);
    /// assert_eq!(user.nick, "foo");
    /// assert_eq!(user.user, "bar");
    /// assert_eq!(user.host, "baz");
    /// ```
    pub fn parse(full: &str, symbols: Option<&str>) -> User {
        let (head, tail) = match full.split_once('!') {
            Some((head, tail)) => (head, Some(tail)),
            None => (full, None),
        };
        let (user, host) = match tail {
            Some(tail) => tail.split_once('@').unwrap_or((tail, "")),
            None => ("", ""),
        };

        let mut prefixes = Vec::new();
        let mut nick = head;
        if let Some(alphabet) = symbols {
            while let Some(c) = nick.chars().next() {
                if !alphabet.contains(c) {
                    break;
                }
                prefixes.push(c);
                nick = &nick[c.len_utf8()..];
            }
        }

        User {
            prefixes,
            nick: nick.to_owned(),
            user: user.to_owned(),
            host: host.to_owned(),
            full: full.to_owned(),
        }
    }
}
