//! Connected players as packet recipients.
//!
//! Each player owns the sending half of an outbound queue. Whatever drives
//! the socket drains the receiving half; packets are queued already encoded.

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use cinder_particles::{EffectPacket, Recipient, RecipientDirectory};

/// A player connected to the server.
#[derive(Debug, Clone)]
pub struct ConnectedPlayer {
    name: String,
    outbound: Sender<Vec<u8>>,
}

impl ConnectedPlayer {
    /// Creates a player with a fresh unbounded outbound queue.
    ///
    /// Returns the player and the queue's receiving half.
    #[must_use]
    pub fn new(name: impl Into<String>) -> (Self, Receiver<Vec<u8>>) {
        let (outbound, inbound) = crossbeam_channel::unbounded();
        let player = Self {
            name: name.into(),
            outbound,
        };
        (player, inbound)
    }
}

impl Recipient for ConnectedPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, packet: &EffectPacket) {
        if self.outbound.send(packet.to_bytes()).is_err() {
            warn!("Dropping packet 0x{:02x} for disconnected player {}", packet.opcode(), self.name);
        }
    }
}

/// Players currently connected, in join order.
#[derive(Debug, Default)]
pub struct PlayerList {
    players: Vec<ConnectedPlayer>,
}

impl PlayerList {
    /// Creates an empty player list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player. A player with the same name is replaced.
    pub fn add(&mut self, player: ConnectedPlayer) {
        self.remove(&player.name);
        debug!("Player {} connected", player.name);
        self.players.push(player);
    }

    /// Removes a player by name. Returns whether one was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.name != name);
        self.players.len() != before
    }

    /// Looks up a player by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConnectedPlayer> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Number of connected players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if nobody is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl RecipientDirectory for PlayerList {
    fn for_each_recipient(&self, visit: &mut dyn FnMut(&dyn Recipient)) {
        self.players.for_each_recipient(visit);
    }
}
