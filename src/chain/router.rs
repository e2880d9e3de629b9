//! Terminal command routing.

use std::collections::HashMap;

use crate::error::Result;
use crate::message::Message;

use super::{Event, Layer, Sender};

/// A registered command or fallback handler.
pub type Handler = Box<dyn FnMut(&mut Sender<'_>, &Message) -> Result<()> + Send>;

/// The terminal layer: routes each message to the handler registered for its
/// command, or to the fallback when no handler matches.
///
/// Command lookup is exact and case-sensitive; servers send commands and
/// numerics in their canonical upper-case form. Non-message events are
/// dropped silently, as are messages with neither a matching handler nor a
/// fallback.
#[derive(Default)]
pub struct CommandRouter {
    handlers: HashMap<String, Handler>,
    fallback: Option<Handler>,
}

impl CommandRouter {
    /// An empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a command or numeric, replacing any previous
    /// registration for the same name.
    pub fn on(
        &mut self,
        command: impl Into<String>,
        handler: impl FnMut(&mut Sender<'_>, &Message) -> Result<()> + Send + 'static,
    ) -> &mut Self {
        self.handlers.insert(command.into(), Box::new(handler));
        self
    }

    /// Register the fallback, invoked once per message that matches no
    /// registered command.
    pub fn on_unhandled(
        &mut self,
        handler: impl FnMut(&mut Sender<'_>, &Message) -> Result<()> + Send + 'static,
    ) -> &mut Self {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// Remove the handler for a command, returning whether one was present.
    pub fn remove(&mut self, command: &str) -> bool {
        self.handlers.remove(command).is_some()
    }
}

impl Layer for CommandRouter {
    fn handle(&mut self, sender: &mut Sender<'_>, event: Event) -> Result<()> {
        let message = match event {
            Event::Message(message) => message,
            _ => return Ok(()),
        };

        if let Some(handler) = self.handlers.get_mut(&message.command) {
            handler(sender, &message)
        } else if let Some(fallback) = self.fallback.as_mut() {
            fallback(sender, &message)
        } else {
            tracing::trace!(command = %message.command, "unrouted message");
            Ok(())
        }
    }
}
