use stake_pool_types::event::{Attribute, Event};
use stake_pool_types::msg::OutboundMessage;

/// What a handler hands back to the host: messages queued for later delivery plus the audit trail
/// for this invocation. A chained builder (`.add_message(...).add_attribute(...)`) over this
/// crate's own `OutboundMessage`, rather than a bare struct literal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandlerOutput {
    pub messages: Vec<OutboundMessage>,
    pub attributes: Vec<Attribute>,
    pub events: Vec<Event>,
}

impl HandlerOutput {
    pub fn new() -> Self {
        HandlerOutput::default()
    }

    pub fn add_message(mut self, message: OutboundMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn add_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push(stake_pool_types::event::attr(key, value));
        self
    }

    pub fn add_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }
}
