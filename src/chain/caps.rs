//! IRCv3 capability negotiation.

use crate::error::Result;
use crate::message::Message;

use super::{Event, Layer, Sender};

/// Where capability negotiation stands, for observation only; replies are
/// acted on whenever they arrive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapState {
    /// Nothing sent yet.
    Start,
    /// `CAP LS` sent, waiting for the server's list.
    AwaitingList,
    /// `CAP END` sent; the registration pipeline may complete.
    Negotiated,
}

/// The outermost layer: runs IRCv3 `CAP` negotiation around registration.
///
/// On connect it sends `CAP LS` before the registration commands go out.
/// When the server's list arrives it requests the intersection with the
/// wish-list, or ends negotiation immediately when the intersection is
/// empty. An `ACK` ends negotiation unconditionally, without diffing the
/// acknowledged capabilities against the requested ones. `LS` and `ACK` are
/// consumed here; other `CAP` subcommands and all other events are
/// forwarded.
pub struct CapNegotiator<N> {
    wanted: Vec<String>,
    requested: Vec<String>,
    state: CapState,
    next: N,
}

impl<N> CapNegotiator<N> {
    /// A negotiator that will request the given capabilities, around the
    /// next layer.
    pub fn new(wanted: Vec<String>, next: N) -> Self {
        CapNegotiator {
            wanted,
            requested: Vec::new(),
            state: CapState::Start,
            next,
        }
    }

    /// The current negotiation state.
    pub fn state(&self) -> CapState {
        self.state
    }

    /// The capabilities requested from the server so far.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// The next layer.
    pub fn next(&self) -> &N {
        &self.next
    }

    /// The next layer, mutably.
    pub fn next_mut(&mut self) -> &mut N {
        &mut self.next
    }

    fn on_cap(&mut self, sender: &mut Sender<'_>, message: &Message) -> Result<()> {
        // params[1] is the subcommand; params[0] is the target ("*" before
        // registration).
        let subcommand = message.params.get(1).map(String::as_str);
        match subcommand {
            Some("LS") => {
                let available = message.params.get(2).map(String::as_str).unwrap_or("");
                let offered: Vec<&str> = available.split_whitespace().collect();
                let request: Vec<&str> = self
                    .wanted
                    .iter()
                    .map(String::as_str)
                    .filter(|cap| offered.contains(cap))
                    .collect();

                if request.is_empty() {
                    tracing::debug!("no wanted capabilities offered, ending negotiation");
                    self.state = CapState::Negotiated;
                    sender.send_command("CAP", &["END"])
                } else {
                    tracing::debug!(caps = ?request, "requesting capabilities");
                    self.requested = request.iter().map(|s| (*s).to_owned()).collect();
                    sender.send_command("CAP", &["REQ", &request.join(" ")])
                }
            }
            Some("ACK") => {
                tracing::debug!("capabilities acknowledged, ending negotiation");
                self.state = CapState::Negotiated;
                sender.send_command("CAP", &["END"])
            }
            _ => Ok(()),
        }
    }
}

impl<N: Layer> Layer for CapNegotiator<N> {
    fn handle(&mut self, sender: &mut Sender<'_>, event: Event) -> Result<()> {
        match event {
            Event::Connected => {
                sender.send_command("CAP", &["LS"])?;
                self.state = CapState::AwaitingList;
                self.next.handle(sender, Event::Connected)
            }
            Event::Message(message)
                if message.command == "CAP"
                    && matches!(
                        message.params.get(1).map(String::as_str),
                        Some("LS") | Some("ACK")
                    ) =>
            {
                self.on_cap(sender, &message)
            }
            other => self.next.handle(sender, other),
        }
    }
}
