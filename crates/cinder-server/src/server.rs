//! Server composition root.
//!
//! Owns the particle catalog and the player list and serializes access to
//! them. Locks are always taken catalog first, then players.

use glam::Vec3;
use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::{debug, info};

use cinder_common::EffectId;
use cinder_particles::{
    LoadSummary, NoRecipients, ParticleCatalog, ParticleDefinition, ParticleResult,
};

use crate::config::ServerConfig;
use crate::players::{ConnectedPlayer, PlayerList};

/// The running server state shared by every subsystem.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    catalog: Mutex<ParticleCatalog>,
    players: RwLock<PlayerList>,
}

impl Server {
    /// Builds a server with an empty catalog and no players.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            catalog: Mutex::new(ParticleCatalog::new()),
            players: RwLock::new(PlayerList::new()),
        }
    }

    /// Builds a server and loads every particle in the configured directory.
    pub fn start(config: ServerConfig) -> ParticleResult<(Self, LoadSummary)> {
        let server = Self::new(config);
        let summary = server.catalog.lock().load_dir(
            &server.config.particles_dir,
            server.config.create_particles_dir,
            &NoRecipients,
        )?;
        info!(
            "Particle catalog ready: {} loaded, {} skipped, {} rejected",
            summary.loaded, summary.failed, summary.rejected
        );
        Ok((server, summary))
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Locks the catalog for direct access.
    ///
    /// # Deadlocks
    ///
    /// The lock is not reentrant. Drop the guard before calling any other
    /// `Server` method that touches the catalog (`join`, `define_effect`,
    /// `release_effect`, `spawn_effect`, `spawn_effect_by_id`).
    pub fn catalog(&self) -> MutexGuard<'_, ParticleCatalog> {
        self.catalog.lock()
    }

    /// Number of connected players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.read().len()
    }

    /// Connects a player and sends them every current effect definition.
    ///
    /// Returns the number of definitions replayed.
    pub fn join(&self, player: ConnectedPlayer) -> usize {
        let catalog = self.catalog.lock();
        let replayed = catalog.replay_to(&player);
        self.players.write().add(player);
        replayed
    }

    /// Disconnects a player by name.
    pub fn leave(&self, name: &str) -> bool {
        let removed = self.players.write().remove(name);
        if removed {
            debug!("Player {} disconnected", name);
        }
        removed
    }

    /// Registers a new effect and broadcasts it to everyone connected.
    pub fn define_effect(&self, definition: ParticleDefinition) -> ParticleResult<EffectId> {
        let mut catalog = self.catalog.lock();
        let players = self.players.read();
        catalog.allocate(definition, &*players)
    }

    /// Frees an effect identifier. Clients are not notified.
    pub fn release_effect(&self, id: EffectId) -> bool {
        self.catalog.lock().release(id)
    }

    /// Spawns a named effect for one player. Unknown players or effects are
    /// a silent no-op.
    pub fn spawn_effect(&self, player: &str, effect: &str, location: Vec3, origin: Vec3) -> bool {
        let catalog = self.catalog.lock();
        let players = self.players.read();
        players
            .get(player)
            .is_some_and(|p| catalog.spawn_by_name(p, effect, location, origin))
    }

    /// Spawns an effect by identifier for one player.
    pub fn spawn_effect_by_id(
        &self,
        player: &str,
        id: EffectId,
        location: Vec3,
        origin: Vec3,
    ) -> bool {
        let catalog = self.catalog.lock();
        let players = self.players.read();
        players
            .get(player)
            .is_some_and(|p| catalog.spawn_by_id(p, id, location, origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_particles::{DefineEffect, SpawnEffect};
    use std::fs;
    use tempfile::TempDir;

    fn server_with(records: &[(&str, &str)]) -> (TempDir, Server) {
        let dir = TempDir::new().expect("tempdir");
        for (name, content) in records {
            fs::write(dir.path().join(format!("{name}.toml")), content).expect("write");
        }
        let config = ServerConfig {
            particles_dir: dir.path().to_path_buf(),
            create_particles_dir: false,
            ..ServerConfig::default()
        };
        let (server, _) = Server::start(config).expect("start");
        (dir, server)
    }

    #[test]
    fn test_start_loads_directory() {
        let (_dir, server) = server_with(&[("fire", "speed = 1"), ("bad", "speed = \"x\"")]);
        assert_eq!(server.catalog().len(), 1);
        assert!(server.catalog().get_by_name("fire").is_some());
    }

    #[test]
    fn test_catalog_guard_dropped_before_define() {
        let (_dir, server) = server_with(&[("fire", "")]);
        let before = server.catalog().len();

        let id = server
            .define_effect(ParticleDefinition::new("spark"))
            .expect("room");
        let catalog = server.catalog();
        assert_eq!(catalog.len(), before + 1);
        assert_eq!(catalog.id_for_name("spark"), Some(id));
    }

    #[test]
    fn test_start_creates_missing_directory() {
        let dir = TempDir::new().expect("tempdir");
        let config = ServerConfig {
            particles_dir: dir.path().join("particles"),
            ..ServerConfig::default()
        };
        let (server, summary) = Server::start(config).expect("start");
        assert_eq!(summary.total(), 0);
        assert!(server.config().particles_dir.is_dir());
    }

    #[test]
    fn test_join_replays_definitions() {
        let (_dir, server) = server_with(&[("fire", ""), ("smoke", "")]);
        let (player, inbound) = ConnectedPlayer::new("alex");

        assert_eq!(server.join(player), 2);
        assert_eq!(server.player_count(), 1);

        let packets: Vec<_> = inbound.try_iter().collect();
        assert_eq!(packets.len(), 2);
        assert!(packets.iter().all(|p| p[0] == DefineEffect::OPCODE));
        assert_eq!(packets[0][1], 0);
        assert_eq!(packets[1][1], 1);
    }

    #[test]
    fn test_define_effect_broadcasts_to_connected() {
        let (_dir, server) = server_with(&[]);
        let (a, rx_a) = ConnectedPlayer::new("a");
        let (b, rx_b) = ConnectedPlayer::new("b");
        server.join(a);
        server.join(b);

        let id = server
            .define_effect(ParticleDefinition::new("spark"))
            .expect("room");
        for rx in [&rx_a, &rx_b] {
            let bytes = rx.try_recv().expect("broadcast");
            assert_eq!(bytes[0], DefineEffect::OPCODE);
            assert_eq!(bytes[1], id.raw());
        }
    }

    #[test]
    fn test_leave_stops_broadcasts() {
        let (_dir, server) = server_with(&[]);
        let (a, rx_a) = ConnectedPlayer::new("a");
        server.join(a);
        assert!(server.leave("a"));
        assert!(!server.leave("a"));

        server
            .define_effect(ParticleDefinition::new("spark"))
            .expect("room");
        assert!(rx_a.try_recv().is_err());
    }

    #[test]
    fn test_spawn_effect_for_one_player() {
        let (_dir, server) = server_with(&[("fire", "")]);
        let (a, rx_a) = ConnectedPlayer::new("a");
        let (b, rx_b) = ConnectedPlayer::new("b");
        server.join(a);
        server.join(b);
        rx_a.try_iter().for_each(drop);
        rx_b.try_iter().for_each(drop);

        assert!(server.spawn_effect("a", "fire", Vec3::new(1.5, 0.0, -2.0), Vec3::ZERO));

        let bytes = rx_a.try_recv().expect("spawn");
        assert_eq!(bytes[0], SpawnEffect::OPCODE);
        assert_eq!(&bytes[2..6], &48i32.to_be_bytes());
        assert_eq!(&bytes[10..14], &(-64i32).to_be_bytes());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_spawn_unknown_is_silent() {
        let (_dir, server) = server_with(&[("fire", "")]);
        let (a, rx_a) = ConnectedPlayer::new("a");
        server.join(a);
        rx_a.try_iter().for_each(drop);

        assert!(!server.spawn_effect("a", "smoke", Vec3::ZERO, Vec3::ZERO));
        assert!(!server.spawn_effect("nobody", "fire", Vec3::ZERO, Vec3::ZERO));
        assert!(!server.spawn_effect_by_id("a", EffectId::new(200), Vec3::ZERO, Vec3::ZERO));
        assert!(rx_a.try_recv().is_err());
    }

    #[test]
    fn test_release_then_spawn_by_id_is_silent() {
        let (_dir, server) = server_with(&[("fire", "")]);
        let (a, rx_a) = ConnectedPlayer::new("a");
        server.join(a);
        rx_a.try_iter().for_each(drop);

        assert!(server.release_effect(EffectId::new(0)));
        assert!(!server.spawn_effect_by_id("a", EffectId::new(0), Vec3::ZERO, Vec3::ZERO));
        assert!(rx_a.try_recv().is_err());
    }
}
