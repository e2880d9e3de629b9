//! The dispatch chain.
//!
//! Inbound messages and lifecycle events travel through an ordered sequence
//! of layers. Each layer owns the next one and may handle an event itself,
//! forward it unchanged, or forward a transformed event; side effects are
//! produced by calling back into the [`Sender`]. The terminal layer is the
//! [`CommandRouter`], which looks up a handler by command name.
//!
//! The standard chain, outermost first:
//! [`CapNegotiator`] → [`BaseLayer`] → [`CtcpDispatcher`] → [`CommandRouter`].
//!
//! Processing is single-threaded and line-oriented: one event runs through
//! the whole chain to completion before the next is accepted.

mod base;
mod caps;
mod ctcp;
mod router;

pub use base::BaseLayer;
pub use caps::{CapNegotiator, CapState};
pub use ctcp::{CtcpDispatcher, CtcpQuery};
pub use router::CommandRouter;

use crate::error::Result;
use crate::format::format_command;
use crate::line::LineBuffer;
use crate::message::Message;
use crate::user::User;

/// The transport collaborator: the chain hands it complete wire lines,
/// CRLF terminator included. Socket lifecycle lives outside this crate.
pub trait Transport {
    /// Deliver one complete wire line to the peer.
    fn send_line(&mut self, line: &str) -> Result<()>;
}

/// Formats outbound commands and hands them to the transport.
///
/// Layers receive a `Sender` with every event; pure routing layers never
/// touch it.
pub struct Sender<'a> {
    transport: &'a mut dyn Transport,
}

impl<'a> Sender<'a> {
    /// Wrap a transport.
    pub fn new(transport: &'a mut dyn Transport) -> Self {
        Sender { transport }
    }

    /// Format a command and send it, appending the CRLF terminator.
    pub fn send_command(&mut self, command: &str, args: &[&str]) -> Result<()> {
        let mut line = format_command(command, args)?;
        tracing::trace!(command, "sending");
        line.push_str("\r\n");
        self.transport.send_line(&line)
    }

    /// Send a pre-formatted line, appending the CRLF terminator.
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        let mut line = line.to_owned();
        line.push_str("\r\n");
        self.transport.send_line(&line)
    }
}

/// An event travelling through the chain.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The transport connection has been established.
    Connected,
    /// The transport connection has been lost or closed.
    Disconnected,
    /// A parsed inbound message.
    Message(Message),
    /// Sign-on confirmed by the server (numeric 001).
    SignedOn,
    /// A decoded channel-membership change (JOIN/PART/NICK/QUIT).
    Membership(MembershipEvent),
}

/// A membership change decoded by [`BaseLayer`].
#[derive(Clone, Debug, PartialEq)]
pub struct MembershipEvent {
    /// What happened.
    pub kind: MembershipKind,
    /// The acting user, decoded from the message prefix.
    pub user: User,
    /// Whether the acting user is this client, judged against the tracked
    /// nickname.
    pub is_self: bool,
}

/// The kinds of membership change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MembershipKind {
    /// A user joined a channel.
    Join {
        /// The channel joined.
        channel: String,
    },
    /// A user left a channel.
    Part {
        /// The channel left.
        channel: String,
        /// The part message, if any.
        reason: Option<String>,
    },
    /// A user changed nickname.
    Nick {
        /// The new nickname.
        new_nick: String,
    },
    /// A user disconnected from the network.
    Quit {
        /// The quit message, if any.
        reason: Option<String>,
    },
}

/// One layer of the dispatch chain.
///
/// Implementations own their successor and forward explicitly; nothing is
/// resolved by fallthrough.
pub trait Layer {
    /// Process one event, possibly sending replies through `sender` and
    /// possibly forwarding to the next layer.
    fn handle(&mut self, sender: &mut Sender<'_>, event: Event) -> Result<()>;
}

/// Connection credentials and negotiation wish-list.
///
/// Passed explicitly into chain construction; there are no global defaults.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Desired nickname.
    pub nickname: String,
    /// Username (ident).
    pub username: String,
    /// Real name / GECOS.
    pub realname: String,
    /// Server password, sent as `PASS` before registration when present.
    pub password: Option<String>,
    /// Capabilities to request during CAP negotiation.
    pub request_caps: Vec<String>,
}

impl ClientConfig {
    /// Config with the given nickname, reused as username and realname.
    pub fn new(nickname: impl Into<String>) -> Self {
        let nickname = nickname.into();
        ClientConfig {
            username: nickname.clone(),
            realname: nickname.clone(),
            nickname,
            password: None,
            request_caps: Vec::new(),
        }
    }
}

/// The standard chain type built by [`standard_chain`].
pub type StandardChain = CapNegotiator<BaseLayer<CtcpDispatcher<CommandRouter>>>;

/// Build the standard chain around a configured router:
/// CAP negotiation, base client behavior, CTCP sub-dispatch, then command
/// routing. Register CTCP handlers via the dispatcher before calling this,
/// or reach it afterwards through the layers' `next_mut` accessors.
pub fn standard_chain(config: ClientConfig, ctcp: CtcpDispatcher<CommandRouter>) -> StandardChain {
    let request_caps = config.request_caps.clone();
    CapNegotiator::new(request_caps, BaseLayer::new(config, ctcp))
}

/// Drives one connection: buffers transport bytes into lines, parses each
/// line, and dispatches it through the chain to completion before the next.
pub struct Client<T, L> {
    transport: T,
    chain: L,
    buffer: LineBuffer,
}

impl<T: Transport, L: Layer> Client<T, L> {
    /// Create a client from a transport and a fully-built chain.
    pub fn new(transport: T, chain: L) -> Self {
        Client {
            transport,
            chain,
            buffer: LineBuffer::new(),
        }
    }

    /// Inject the connection-established event.
    pub fn connected(&mut self) -> Result<()> {
        self.chain
            .handle(&mut Sender::new(&mut self.transport), Event::Connected)
    }

    /// Inject the connection-lost event.
    pub fn disconnected(&mut self) -> Result<()> {
        self.chain
            .handle(&mut Sender::new(&mut self.transport), Event::Disconnected)
    }

    /// Feed raw transport bytes; every complete buffered line is parsed and
    /// dispatched, in order.
    ///
    /// A parse failure stops at the offending line and returns its error;
    /// the caller decides whether that is fatal to the connection. Lines
    /// already consumed stay consumed, so processing may resume with the
    /// next call.
    pub fn data_received(&mut self, data: &[u8]) -> Result<()> {
        self.buffer.extend(data);
        while let Some(line) = self.buffer.next_line()? {
            self.line_received(&line)?;
        }
        Ok(())
    }

    /// Parse and dispatch one line, excluding its CRLF terminator.
    pub fn line_received(&mut self, line: &str) -> Result<()> {
        let message: Message = line.parse()?;
        tracing::trace!(command = %message.command, "dispatching");
        self.chain.handle(
            &mut Sender::new(&mut self.transport),
            Event::Message(message),
        )
    }

    /// A sender for emitting commands outside of event handling.
    pub fn sender(&mut self) -> Sender<'_> {
        Sender::new(&mut self.transport)
    }

    /// The chain, for inspecting layer state.
    pub fn chain(&self) -> &L {
        &self.chain
    }

    /// The chain, mutably, e.g. for registering handlers after construction.
    pub fn chain_mut(&mut self) -> &mut L {
        &mut self.chain
    }

    /// The transport, for inspection in tests or teardown.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
