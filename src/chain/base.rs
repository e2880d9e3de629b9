//! Base client behavior.

use crate::error::Result;
use crate::isupport::{parse_isupport, Isupport, PrefixMap};
use crate::message::Message;
use crate::user::User;

use super::{ClientConfig, Event, Layer, MembershipEvent, MembershipKind, Sender};

/// The base layer: registers on connect, answers `PING`, ingests `005`
/// ISUPPORT advertisements, and decodes membership changes into
/// [`MembershipEvent`]s for the layers below.
///
/// `PING` is answered here and never forwarded. `001` is forwarded as
/// [`Event::SignedOn`] in place of the raw message. `005` is ingested and
/// the raw message forwarded. `JOIN`/`PART`/`NICK`/`QUIT` carrying a prefix
/// are forwarded as [`Event::Membership`]; without a prefix the raw message
/// passes through unchanged.
pub struct BaseLayer<N> {
    config: ClientConfig,
    nickname: String,
    isupport: Isupport,
    prefix_map: Option<PrefixMap>,
    next: N,
}

impl<N> BaseLayer<N> {
    /// A base layer for the given connection config, around the next layer.
    pub fn new(config: ClientConfig, next: N) -> Self {
        BaseLayer {
            nickname: config.nickname.clone(),
            config,
            isupport: Isupport::new(),
            prefix_map: None,
            next,
        }
    }

    /// The nickname this client currently holds, as tracked from `001` and
    /// self `NICK` changes.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// The ISUPPORT table accumulated from `005` advertisements.
    pub fn isupport(&self) -> &Isupport {
        &self.isupport
    }

    /// The server's `PREFIX` mapping, once advertised.
    pub fn prefix_map(&self) -> Option<&PrefixMap> {
        self.prefix_map.as_ref()
    }

    /// The next layer.
    pub fn next(&self) -> &N {
        &self.next
    }

    /// The next layer, mutably.
    pub fn next_mut(&mut self) -> &mut N {
        &mut self.next
    }

    fn register(&self, sender: &mut Sender<'_>) -> Result<()> {
        if let Some(password) = &self.config.password {
            sender.send_command("PASS", &[password])?;
        }
        sender.send_command("NICK", &[&self.config.nickname])?;
        sender.send_command(
            "USER",
            &[&self.config.username, "0", "*", &self.config.realname],
        )
    }

    fn ingest_isupport(&mut self, message: &Message) {
        // params[0] is our nick; a trailing param with spaces is the
        // human-readable "are supported by this server" suffix.
        for token in message.params.iter().skip(1) {
            if token.contains(' ') {
                continue;
            }
            if let Some(raw) = token.strip_prefix("PREFIX=") {
                match PrefixMap::parse(raw) {
                    Ok(map) => self.prefix_map = Some(map),
                    Err(error) => {
                        tracing::warn!(%token, %error, "ignoring malformed PREFIX");
                    }
                }
                continue;
            }
            match parse_isupport(token) {
                Ok((key, value)) => {
                    self.isupport.insert(key, value);
                }
                Err(error) => {
                    tracing::warn!(%token, %error, "ignoring malformed isupport token");
                }
            }
        }
    }

    fn source_user(&self, message: &Message) -> Option<User> {
        let prefix = message.prefix.as_deref()?;
        let symbols = self.prefix_map.as_ref().map(PrefixMap::symbols);
        Some(User::parse(prefix, symbols))
    }

    fn membership(&self, message: &Message) -> Option<MembershipEvent> {
        let user = self.source_user(message)?;
        let kind = match message.command.as_str() {
            "JOIN" => MembershipKind::Join {
                channel: message.params.first()?.clone(),
            },
            "PART" => MembershipKind::Part {
                channel: message.params.first()?.clone(),
                reason: message.params.get(1).cloned(),
            },
            "NICK" => MembershipKind::Nick {
                new_nick: message.params.first()?.clone(),
            },
            "QUIT" => MembershipKind::Quit {
                reason: message.params.first().cloned(),
            },
            _ => return None,
        };
        let is_self = user.nick == self.nickname;
        Some(MembershipEvent {
            kind,
            user,
            is_self,
        })
    }
}

impl<N: Layer> Layer for BaseLayer<N> {
    fn handle(&mut self, sender: &mut Sender<'_>, event: Event) -> Result<()> {
        let message = match event {
            Event::Connected => {
                self.register(sender)?;
                return self.next.handle(sender, Event::Connected);
            }
            Event::Message(message) => message,
            other => return self.next.handle(sender, other),
        };

        match message.command.as_str() {
            "PING" => {
                let args: Vec<&str> = message.params.iter().map(String::as_str).collect();
                sender.send_command("PONG", &args)
            }
            "001" => {
                // The server has the final say on our nick.
                if let Some(nick) = message.params.first() {
                    self.nickname = nick.clone();
                }
                tracing::debug!(nick = %self.nickname, "signed on");
                self.next.handle(sender, Event::SignedOn)
            }
            "005" => {
                self.ingest_isupport(&message);
                self.next.handle(sender, Event::Message(message))
            }
            "JOIN" | "PART" | "NICK" | "QUIT" => match self.membership(&message) {
                Some(membership) => {
                    if membership.is_self {
                        if let MembershipKind::Nick { new_nick } = &membership.kind {
                            self.nickname = new_nick.clone();
                        }
                    }
                    self.next.handle(sender, Event::Membership(membership))
                }
                None => self.next.handle(sender, Event::Message(message)),
            },
            _ => self.next.handle(sender, Event::Message(message)),
        }
    }
}
