//! Send targets for particle packets.
//!
//! The catalog never owns connections. It is handed a [`Recipient`] for
//! unicast sends and a [`RecipientDirectory`] when it needs to reach
//! everyone currently connected.

use std::cell::RefCell;

use crate::packets::EffectPacket;

/// Something that can receive a unicast particle packet.
pub trait Recipient {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// Delivers one packet. Delivery failures are the recipient's concern.
    fn send(&self, packet: &EffectPacket);
}

/// Enumerates every recipient currently known to the server.
pub trait RecipientDirectory {
    /// Calls `visit` once per recipient.
    fn for_each_recipient(&self, visit: &mut dyn FnMut(&dyn Recipient));
}

impl<R: Recipient> RecipientDirectory for [R] {
    fn for_each_recipient(&self, visit: &mut dyn FnMut(&dyn Recipient)) {
        for recipient in self {
            visit(recipient);
        }
    }
}

impl<R: Recipient> RecipientDirectory for Vec<R> {
    fn for_each_recipient(&self, visit: &mut dyn FnMut(&dyn Recipient)) {
        self.as_slice().for_each_recipient(visit);
    }
}

/// Directory with nobody in it, for loading before any client connects.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecipients;

impl RecipientDirectory for NoRecipients {
    fn for_each_recipient(&self, _visit: &mut dyn FnMut(&dyn Recipient)) {}
}

/// Recipient that keeps every packet it is sent.
///
/// Used by tests and tooling to observe catalog output.
#[derive(Debug, Default)]
pub struct RecordingRecipient {
    name: String,
    packets: RefCell<Vec<EffectPacket>>,
}

impl RecordingRecipient {
    /// Creates a new recording recipient.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            packets: RefCell::new(Vec::new()),
        }
    }

    /// Returns a copy of every packet received so far.
    #[must_use]
    pub fn packets(&self) -> Vec<EffectPacket> {
        self.packets.borrow().clone()
    }

    /// Number of packets received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packets.borrow().len()
    }

    /// Returns true if nothing has been received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packets.borrow().is_empty()
    }

    /// Removes and returns everything received so far.
    pub fn take(&self) -> Vec<EffectPacket> {
        self.packets.take()
    }
}

impl Recipient for RecordingRecipient {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, packet: &EffectPacket) {
        self.packets.borrow_mut().push(*packet);
    }
}
