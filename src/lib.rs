//! # ircline
//!
//! A client-side IRC protocol engine: wire-grammar parsing, command
//! formatting, and a layered dispatch chain, with no I/O of its own.
//!
//! ## Features
//!
//! - IRC message parsing with IRCv3 tags, prefixes, commands, and parameters
//! - Round-trip-safe command formatting
//! - ISUPPORT (RPL_ISUPPORT) value classification and `PREFIX` mapping
//! - MODE-string expansion and hostmask decoding
//! - CTCP framing and sub-dispatch
//! - An ordered dispatch chain: CAP negotiation, base client behavior,
//!   CTCP routing, and terminal command routing

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ### Parsing IRC Messages
//!
//! ```rust
//! use ircline::Message;
//!
//! let raw = "@time=2023-01-01T12:00:00Z :nick!user@host PRIVMSG #channel :Hello!";
//! let message: Message = raw.parse().expect("valid IRC message");
//!
//! assert_eq!(message.command, "PRIVMSG");
//! assert_eq!(message.params, vec!["#channel", "Hello!"]);
//! assert_eq!(message.tag_value("time"), Some("2023-01-01T12:00:00Z"));
//! ```
//!
//! ### Running the Dispatch Chain
//!
//! ```rust
//! use ircline::chain::{standard_chain, Client, ClientConfig, CommandRouter, CtcpDispatcher};
//! # use ircline::chain::Transport;
//! # use ircline::Result;
//! # struct NullTransport;
//! # impl Transport for NullTransport {
//! #     fn send_line(&mut self, _line: &str) -> Result<()> { Ok(()) }
//! # }
//!
//! let mut router = CommandRouter::new();
//! router.on("PRIVMSG", |_sender, msg| {
//!     println!("<{}> {}", msg.prefix.as_deref().unwrap_or("?"), msg.params[1]);
//!     Ok(())
//! });
//!
//! let chain = standard_chain(ClientConfig::new("mybot"), CtcpDispatcher::new(router));
//! let mut client = Client::new(NullTransport, chain);
//! client.connected().expect("connect events dispatch");
//! client
//!     .data_received(b":wiz!u@h PRIVMSG #chan :hello\r\n")
//!     .expect("inbound line dispatches");
//! ```

pub mod chain;
pub mod ctcp;
pub mod error;
pub mod format;
pub mod isupport;
pub mod line;
pub mod message;
pub mod mode;
pub mod user;

pub use chain::{
    BaseLayer, CapNegotiator, CapState, Client, ClientConfig, CommandRouter, CtcpDispatcher,
    CtcpQuery, Event, Layer, MembershipEvent, MembershipKind, Sender, StandardChain, Transport,
};
pub use ctcp::{Ctcp, CTCP_DELIMITER};
pub use error::{FormatError, MessageParseError, ModeParseError, ProtocolError, Result};
pub use format::format_command;
pub use isupport::{parse_isupport, Isupport, IsupportValue, PrefixMap};
pub use line::{LineBuffer, DEFAULT_MAX_LINE_LEN};
pub use message::{Message, Tags};
pub use mode::{parse_mode_string, ModeChange};
pub use user::User;
