//! CTCP sub-dispatch.

use std::collections::HashMap;

use crate::ctcp::Ctcp;
use crate::error::Result;
use crate::user::User;

use super::{Event, Layer, Sender};

/// A registered CTCP handler.
pub type CtcpHandler = Box<dyn FnMut(&mut Sender<'_>, &CtcpQuery) -> Result<()> + Send>;

/// A decoded CTCP query, as delivered to handlers.
#[derive(Clone, Debug, PartialEq)]
pub struct CtcpQuery {
    /// The sending user, decoded from the message prefix when present.
    pub source: Option<User>,
    /// The PRIVMSG target: this client's nick or a channel.
    pub target: String,
    /// The CTCP sub-command.
    pub command: String,
    /// Everything after the sub-command, if non-empty.
    pub params: Option<String>,
}

impl CtcpQuery {
    /// Send a CTCP reply to the querying user, as a `NOTICE` per convention.
    ///
    /// Does nothing when the query carried no source prefix.
    pub fn reply(&self, sender: &mut Sender<'_>, command: &str, params: Option<&str>) -> Result<()> {
        let Some(source) = &self.source else {
            return Ok(());
        };
        let body = Ctcp::new(command, params).to_string();
        sender.send_command("NOTICE", &[&source.nick, &body])
    }
}

/// Intercepts `PRIVMSG` events whose body is a CTCP payload and routes them
/// to per-sub-command handlers. Everything else, including non-CTCP
/// `PRIVMSG`s, is forwarded to the next layer untouched.
///
/// Sub-command lookup is exact and case-sensitive; conventional CTCP
/// sub-commands (`VERSION`, `PING`, `ACTION`, ...) are upper-case on the
/// wire.
pub struct CtcpDispatcher<N> {
    handlers: HashMap<String, CtcpHandler>,
    fallback: Option<CtcpHandler>,
    next: N,
}

impl<N> CtcpDispatcher<N> {
    /// A dispatcher with no handlers registered, around the next layer.
    pub fn new(next: N) -> Self {
        CtcpDispatcher {
            handlers: HashMap::new(),
            fallback: None,
            next,
        }
    }

    /// Register a handler for a CTCP sub-command, replacing any previous
    /// registration for the same name.
    pub fn on(
        &mut self,
        command: impl Into<String>,
        handler: impl FnMut(&mut Sender<'_>, &CtcpQuery) -> Result<()> + Send + 'static,
    ) -> &mut Self {
        self.handlers.insert(command.into(), Box::new(handler));
        self
    }

    /// Register the fallback, invoked once per CTCP query that matches no
    /// registered sub-command.
    pub fn on_unhandled(
        &mut self,
        handler: impl FnMut(&mut Sender<'_>, &CtcpQuery) -> Result<()> + Send + 'static,
    ) -> &mut Self {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// The next layer.
    pub fn next(&self) -> &N {
        &self.next
    }

    /// The next layer, mutably.
    pub fn next_mut(&mut self) -> &mut N {
        &mut self.next
    }
}

impl<N: Layer> Layer for CtcpDispatcher<N> {
    fn handle(&mut self, sender: &mut Sender<'_>, event: Event) -> Result<()> {
        let query = match &event {
            Event::Message(message) if message.command == "PRIVMSG" => {
                match message.params.as_slice() {
                    [target, body, ..] => Ctcp::parse(body).map(|ctcp| CtcpQuery {
                        source: message.prefix.as_deref().map(|p| User::parse(p, None)),
                        target: target.clone(),
                        command: ctcp.command.to_owned(),
                        params: ctcp.params.map(str::to_owned),
                    }),
                    _ => None,
                }
            }
            _ => None,
        };

        let Some(query) = query else {
            return self.next.handle(sender, event);
        };

        tracing::debug!(command = %query.command, target = %query.target, "ctcp query");
        if let Some(handler) = self.handlers.get_mut(&query.command) {
            handler(sender, &query)
        } else if let Some(fallback) = self.fallback.as_mut() {
            fallback(sender, &query)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::super::testing::RecordingTransport;
    use super::super::CommandRouter;
    use super::*;
    use crate::message::Message;

    fn dispatch(layer: &mut CtcpDispatcher<CommandRouter>, line: &str) -> RecordingTransport {
        let mut transport = RecordingTransport::default();
        let message: Message = line.parse().unwrap();
        layer
            .handle(&mut Sender::new(&mut transport), Event::Message(message))
            .unwrap();
        transport
    }

    #[test]
    fn test_ctcp_routed_to_subcommand_handler() {
        let mut layer = CtcpDispatcher::new(CommandRouter::new());
        layer.on("VERSION", |sender, query| {
            query.reply(sender, "VERSION", Some("ircline"))
        });

        let transport = dispatch(&mut layer, ":wiz!u@h PRIVMSG bot :\x01VERSION\x01");
        assert_eq!(transport.lines, vec!["NOTICE wiz :\x01VERSION ircline\x01\r\n"]);
    }

    #[test]
    fn test_query_fields() {
        let mut layer = CtcpDispatcher::new(CommandRouter::new());
        layer.on("PING", |_, query| {
            assert_eq!(query.source.as_ref().unwrap().nick, "wiz");
            assert_eq!(query.target, "#chan");
            assert_eq!(query.command, "PING");
            assert_eq!(query.params.as_deref(), Some("12345"));
            Ok(())
        });
        dispatch(&mut layer, ":wiz!u@h PRIVMSG #chan :\x01PING 12345\x01");
    }

    #[test]
    fn test_unknown_ctcp_falls_back() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut layer = CtcpDispatcher::new(CommandRouter::new());
        {
            let hits = hits.clone();
            layer.on_unhandled(move |_, query| {
                assert_eq!(query.command, "CLIENTINFO");
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        dispatch(&mut layer, ":wiz!u@h PRIVMSG bot :\x01CLIENTINFO\x01");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_plain_privmsg_forwarded() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut router = CommandRouter::new();
        {
            let hits = hits.clone();
            router.on("PRIVMSG", move |_, msg| {
                assert_eq!(msg.params[1], "just text");
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        let mut layer = CtcpDispatcher::new(router);
        layer.on("ACTION", |_, _| panic!("not a ctcp message"));

        dispatch(&mut layer, ":wiz!u@h PRIVMSG #chan :just text");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unterminated_ctcp_forwarded_as_plain_text() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut router = CommandRouter::new();
        {
            let hits = hits.clone();
            router.on("PRIVMSG", move |_, _| {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        let mut layer = CtcpDispatcher::new(router);
        layer.on("ACTION", |_, _| panic!("delimiter missing at the end"));

        dispatch(&mut layer, ":wiz!u@h PRIVMSG #chan :\x01ACTION waves");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_non_privmsg_events_forwarded() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut router = CommandRouter::new();
        {
            let hits = hits.clone();
            router.on("NOTICE", move |_, _| {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        let mut layer = CtcpDispatcher::new(router);

        dispatch(&mut layer, ":srv NOTICE bot :\x01VERSION reply\x01");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reply_without_source_is_dropped() {
        let mut layer = CtcpDispatcher::new(CommandRouter::new());
        layer.on("VERSION", |sender, query| {
            query.reply(sender, "VERSION", Some("ircline"))
        });

        let transport = dispatch(&mut layer, "PRIVMSG bot :\x01VERSION\x01");
        assert!(transport.lines.is_empty());
    }
}
