//! The particle catalog.
//!
//! Owns the 256-entry effect identifier table and the name index. Every
//! successful allocation is broadcast to all connected recipients
//! immediately; releasing a slot sends nothing, so clients keep the old
//! definition bound to that identifier until it is reused.
//!
//! The catalog does no locking. Servers that touch it from more than one
//! thread must serialize access themselves.

use std::path::Path;

use ahash::AHashMap;
use cinder_common::{EffectId, FixedPos};
use glam::Vec3;
use tracing::{debug, info, warn};

use crate::definition::ParticleDefinition;
use crate::error::{ParticleError, ParticleResult};
use crate::loader;
use crate::packets::{DefineEffect, EffectPacket, SpawnEffect};
use crate::parser;
use crate::record::ParticleRecord;
use crate::recipient::{Recipient, RecipientDirectory};

/// Maximum number of simultaneously defined effects.
///
/// One of the 256 identifiers always stays free.
pub const MAX_DEFINED_EFFECTS: usize = EffectId::SLOT_COUNT - 1;

/// Outcome of a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records registered in the catalog.
    pub loaded: usize,
    /// Records skipped because they could not be read or parsed.
    pub failed: usize,
    /// Records that parsed but could not be registered.
    pub rejected: usize,
}

impl LoadSummary {
    /// Total records seen.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.loaded + self.failed + self.rejected
    }
}

/// Bounded registry of particle definitions keyed by effect identifier.
#[derive(Debug)]
pub struct ParticleCatalog {
    /// One entry per identifier.
    slots: Vec<Option<ParticleDefinition>>,
    /// Lookup name -> identifier. Never pruned on release.
    by_name: AHashMap<String, EffectId>,
    /// Number of occupied slots.
    occupied: usize,
}

impl Default for ParticleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![None; EffectId::SLOT_COUNT],
            by_name: AHashMap::new(),
            occupied: 0,
        }
    }

    /// Number of defined effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Returns true if no effects are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Maximum number of effects that can be defined at once.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        MAX_DEFINED_EFFECTS
    }

    /// Iterates defined effects in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ParticleDefinition> {
        self.slots.iter().flatten()
    }

    /// Iterates every name in the index, including stale ones.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Registers every record that parses. Bad records are logged and skipped.
    pub fn initialize<I>(&mut self, records: I, recipients: &dyn RecipientDirectory) -> LoadSummary
    where
        I: IntoIterator<Item = ParticleResult<ParticleRecord>>,
    {
        let mut summary = LoadSummary::default();

        for record in records {
            let registered = record.and_then(|r| parser::parse(&r)).and_then(|definition| {
                let name = definition.name.clone();
                self.allocate(definition, recipients).map(|id| (name, id))
            });

            match registered {
                Ok((name, id)) => {
                    info!("Loaded particle: {} (ID: {})", name, id);
                    summary.loaded += 1;
                },
                Err(e) if e.is_record_failure() => {
                    warn!("Skipping particle record: {}", e);
                    summary.failed += 1;
                },
                Err(e) => {
                    warn!("Failed to register particle: {}", e);
                    summary.rejected += 1;
                },
            }
        }

        info!("Loaded {} particles", summary.loaded);
        summary
    }

    /// Discovers and registers every record file in `dir`.
    ///
    /// Only a failure to list the directory itself is returned as an error.
    pub fn load_dir(
        &mut self,
        dir: &Path,
        create_missing: bool,
        recipients: &dyn RecipientDirectory,
    ) -> ParticleResult<LoadSummary> {
        let paths = loader::discover_records(dir, create_missing)?;
        debug!("Found {} particle records in {:?}", paths.len(), dir);
        Ok(self.initialize(
            paths.iter().map(|path| loader::read_record(path)),
            recipients,
        ))
    }

    /// Registers a definition in the lowest free slot and broadcasts it.
    ///
    /// Fails without side effects once [`MAX_DEFINED_EFFECTS`] slots are
    /// occupied.
    pub fn allocate(
        &mut self,
        mut definition: ParticleDefinition,
        recipients: &dyn RecipientDirectory,
    ) -> ParticleResult<EffectId> {
        let free = if self.occupied >= MAX_DEFINED_EFFECTS {
            None
        } else {
            self.slots
                .iter()
                .position(Option::is_none)
                .and_then(|index| EffectId::from_index(index).map(|id| (index, id)))
        };

        let Some((index, id)) = free else {
            return Err(ParticleError::CapacityExceeded {
                name: definition.name,
                occupied: self.occupied,
            });
        };

        definition.assign_id(id);
        self.by_name.insert(definition.name.clone(), id);

        let packet = EffectPacket::Define(DefineEffect::from_definition(&definition, id));
        self.slots[index] = Some(definition);
        self.occupied += 1;

        let sent = broadcast(&packet, recipients);
        debug!("Defined effect {} for {} recipients", id, sent);
        Ok(id)
    }

    /// Empties a slot. Returns whether a definition was present.
    ///
    /// The name index keeps pointing at `id`, and nothing is sent.
    pub fn release(&mut self, id: EffectId) -> bool {
        let present = self.slots[id.index()].take().is_some();
        if present {
            self.occupied -= 1;
            debug!("Released effect {}", id);
        }
        present
    }

    /// Looks up a definition by identifier.
    #[must_use]
    pub fn get(&self, id: EffectId) -> Option<&ParticleDefinition> {
        self.slots[id.index()].as_ref()
    }

    /// Looks up the identifier a name was last registered under.
    ///
    /// The slot may since have been released.
    #[must_use]
    pub fn id_for_name(&self, name: &str) -> Option<EffectId> {
        self.by_name.get(name).copied()
    }

    /// Looks up a definition by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&ParticleDefinition> {
        self.id_for_name(name).and_then(|id| self.get(id))
    }

    /// Sends one spawn command for `definition` to `recipient`.
    ///
    /// Returns false, sending nothing, if the definition was never
    /// registered.
    pub fn spawn_for(
        &self,
        recipient: &dyn Recipient,
        definition: &ParticleDefinition,
        location: Vec3,
        origin: Vec3,
    ) -> bool {
        let Some(effect_id) = definition.effect_id() else {
            debug!("Not spawning unregistered particle {}", definition.name);
            return false;
        };

        let packet = EffectPacket::Spawn(SpawnEffect {
            effect_id,
            position: FixedPos::from_world(location),
            origin: FixedPos::from_world(origin),
        });
        recipient.send(&packet);
        true
    }

    /// Spawns by identifier. Unknown identifiers are a silent no-op.
    pub fn spawn_by_id(
        &self,
        recipient: &dyn Recipient,
        id: EffectId,
        location: Vec3,
        origin: Vec3,
    ) -> bool {
        self.get(id)
            .is_some_and(|definition| self.spawn_for(recipient, definition, location, origin))
    }

    /// Spawns by name. Unknown or released names are a silent no-op.
    pub fn spawn_by_name(
        &self,
        recipient: &dyn Recipient,
        name: &str,
        location: Vec3,
        origin: Vec3,
    ) -> bool {
        self.get_by_name(name)
            .is_some_and(|definition| self.spawn_for(recipient, definition, location, origin))
    }

    /// Sends every current definition to one recipient, lowest identifier
    /// first. Returns the number of packets sent.
    pub fn replay_to(&self, recipient: &dyn Recipient) -> usize {
        let mut sent = 0;
        for definition in self.iter() {
            if let Some(id) = definition.effect_id() {
                recipient.send(&EffectPacket::Define(DefineEffect::from_definition(definition, id)));
                sent += 1;
            }
        }
        debug!("Replayed {} effect definitions to {}", sent, recipient.name());
        sent
    }
}

/// Unicasts `packet` to every recipient. Returns how many were reached.
fn broadcast(packet: &EffectPacket, recipients: &dyn RecipientDirectory) -> usize {
    let mut sent = 0;
    recipients.for_each_recipient(&mut |recipient| {
        recipient.send(packet);
        sent += 1;
    });
    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipient::{NoRecipients, RecordingRecipient};

    fn fill(catalog: &mut ParticleCatalog, count: usize) {
        for i in 0..count {
            catalog
                .allocate(ParticleDefinition::new(format!("p{i}")), &NoRecipients)
                .expect("room left");
        }
    }

    #[test]
    fn test_allocate_lowest_free_slot() {
        let mut catalog = ParticleCatalog::new();

        let a = catalog.allocate(ParticleDefinition::new("a"), &NoRecipients).expect("room");
        let b = catalog.allocate(ParticleDefinition::new("b"), &NoRecipients).expect("room");
        let c = catalog.allocate(ParticleDefinition::new("c"), &NoRecipients).expect("room");
        assert_eq!((a.raw(), b.raw(), c.raw()), (0, 1, 2));

        assert!(catalog.release(EffectId::new(1)));
        let d = catalog.allocate(ParticleDefinition::new("d"), &NoRecipients).expect("room");
        assert_eq!(d, EffectId::new(1));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_allocate_assigns_id_to_definition() {
        let mut catalog = ParticleCatalog::new();
        let id = catalog.allocate(ParticleDefinition::new("fire"), &NoRecipients).expect("room");

        let stored = catalog.get(id).expect("stored");
        assert_eq!(stored.effect_id(), Some(id));
        assert_eq!(stored.name, "fire");
    }

    #[test]
    fn test_capacity_boundary() {
        let mut catalog = ParticleCatalog::new();
        fill(&mut catalog, MAX_DEFINED_EFFECTS);
        assert_eq!(catalog.len(), 255);

        let players = vec![RecordingRecipient::new("watcher")];
        let err = catalog
            .allocate(ParticleDefinition::new("overflow"), &players)
            .unwrap_err();
        assert!(matches!(
            err,
            ParticleError::CapacityExceeded { occupied: 255, .. }
        ));

        assert_eq!(catalog.len(), 255);
        assert!(catalog.get(EffectId::new(255)).is_none());
        assert!(catalog.id_for_name("overflow").is_none());
        assert!(players[0].is_empty());
    }

    #[test]
    fn test_release_after_full_frees_a_slot() {
        let mut catalog = ParticleCatalog::new();
        fill(&mut catalog, MAX_DEFINED_EFFECTS);

        assert!(catalog.release(EffectId::new(42)));
        let id = catalog.allocate(ParticleDefinition::new("late"), &NoRecipients).expect("room");
        assert_eq!(id, EffectId::new(42));
    }

    #[test]
    fn test_release_reports_presence() {
        let mut catalog = ParticleCatalog::new();
        catalog.allocate(ParticleDefinition::new("a"), &NoRecipients).expect("room");

        assert!(catalog.release(EffectId::new(0)));
        assert!(!catalog.release(EffectId::new(0)));
        assert!(!catalog.release(EffectId::new(255)));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_name_survives_release() {
        let mut catalog = ParticleCatalog::new();
        let id = catalog.allocate(ParticleDefinition::new("fire"), &NoRecipients).expect("room");
        assert_eq!(catalog.id_for_name("fire"), Some(id));

        catalog.release(id);
        assert_eq!(catalog.id_for_name("fire"), Some(id));
        assert!(catalog.get_by_name("fire").is_none());
        assert!(catalog.names().any(|n| n == "fire"));
    }

    #[test]
    fn test_stale_name_resolves_to_reused_slot() {
        let mut catalog = ParticleCatalog::new();
        let id = catalog.allocate(ParticleDefinition::new("fire"), &NoRecipients).expect("room");
        catalog.release(id);
        catalog.allocate(ParticleDefinition::new("ice"), &NoRecipients).expect("room");

        let found = catalog.get_by_name("fire").expect("slot reused");
        assert_eq!(found.name, "ice");
    }

    #[test]
    fn test_allocate_broadcasts_to_all() {
        let mut catalog = ParticleCatalog::new();
        let players = vec![RecordingRecipient::new("a"), RecordingRecipient::new("b")];

        let mut def = ParticleDefinition::new("snow");
        def.gravity = 0.01;
        let id = catalog.allocate(def, &players).expect("room");

        for player in &players {
            let packets = player.packets();
            assert_eq!(packets.len(), 1);
            match packets[0] {
                EffectPacket::Define(p) => {
                    assert_eq!(p.effect_id, id);
                    assert_eq!(p.gravity, 100);
                },
                EffectPacket::Spawn(_) => panic!("expected a definition"),
            }
        }
    }

    #[test]
    fn test_release_sends_nothing() {
        let mut catalog = ParticleCatalog::new();
        let players = vec![RecordingRecipient::new("a")];
        let id = catalog.allocate(ParticleDefinition::new("x"), &players).expect("room");
        players[0].take();

        catalog.release(id);
        assert!(players[0].is_empty());
    }

    #[test]
    fn test_spawn_coordinate_conversion() {
        let mut catalog = ParticleCatalog::new();
        catalog.allocate(ParticleDefinition::new("a"), &NoRecipients).expect("room");
        let id = catalog.allocate(ParticleDefinition::new("b"), &NoRecipients).expect("room");
        let player = RecordingRecipient::new("p");

        assert!(catalog.spawn_by_id(&player, id, Vec3::new(1.5, 0.0, -2.0), Vec3::ZERO));

        let packets = player.packets();
        assert_eq!(
            packets,
            [EffectPacket::Spawn(SpawnEffect {
                effect_id: id,
                position: FixedPos::new(48, 0, -64),
                origin: FixedPos::ZERO,
            })]
        );
    }

    #[test]
    fn test_spawn_by_name() {
        let mut catalog = ParticleCatalog::new();
        let id = catalog.allocate(ParticleDefinition::new("fire"), &NoRecipients).expect("room");
        let player = RecordingRecipient::new("p");

        assert!(catalog.spawn_by_name(&player, "fire", Vec3::ONE, Vec3::new(0.0, 0.5, 0.0)));
        match player.packets()[0] {
            EffectPacket::Spawn(p) => {
                assert_eq!(p.effect_id, id);
                assert_eq!(p.position, FixedPos::new(32, 32, 32));
                assert_eq!(p.origin, FixedPos::new(0, 16, 0));
            },
            EffectPacket::Define(_) => panic!("expected a spawn"),
        }
    }

    #[test]
    fn test_unknown_spawns_are_silent() {
        let mut catalog = ParticleCatalog::new();
        let id = catalog.allocate(ParticleDefinition::new("fire"), &NoRecipients).expect("room");
        let player = RecordingRecipient::new("p");

        assert!(!catalog.spawn_by_name(&player, "smoke", Vec3::ZERO, Vec3::ZERO));
        assert!(!catalog.spawn_by_id(&player, EffectId::new(99), Vec3::ZERO, Vec3::ZERO));

        catalog.release(id);
        assert!(!catalog.spawn_by_name(&player, "fire", Vec3::ZERO, Vec3::ZERO));
        assert!(player.is_empty());
    }

    #[test]
    fn test_spawn_unregistered_definition_is_silent() {
        let catalog = ParticleCatalog::new();
        let player = RecordingRecipient::new("p");
        let def = ParticleDefinition::new("loose");

        assert!(!catalog.spawn_for(&player, &def, Vec3::ZERO, Vec3::ZERO));
        assert!(player.is_empty());
    }

    #[test]
    fn test_initialize_skips_bad_records() {
        let mut catalog = ParticleCatalog::new();
        let records = vec![
            Ok(ParticleRecord::new("good").with("speed", "1")),
            Ok(ParticleRecord::new("bad").with("speed", "fast")),
            Err(ParticleError::Read {
                name: "unreadable".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            }),
            Ok(ParticleRecord::new("also_good")),
        ];

        let summary = catalog.initialize(records, &NoRecipients);
        assert_eq!(
            summary,
            LoadSummary {
                loaded: 2,
                failed: 2,
                rejected: 0,
            }
        );
        assert_eq!(catalog.id_for_name("good"), Some(EffectId::new(0)));
        assert_eq!(catalog.id_for_name("also_good"), Some(EffectId::new(1)));
        assert!(catalog.id_for_name("bad").is_none());
    }

    #[test]
    fn test_initialize_counts_rejections() {
        let mut catalog = ParticleCatalog::new();
        let records = (0..MAX_DEFINED_EFFECTS + 3).map(|i| Ok(ParticleRecord::new(format!("r{i}"))));

        let summary = catalog.initialize(records, &NoRecipients);
        assert_eq!(summary.loaded, MAX_DEFINED_EFFECTS);
        assert_eq!(summary.rejected, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.total(), MAX_DEFINED_EFFECTS + 3);
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("fire.toml"), "tintGreen = 64\nfullBright = true\n")
            .expect("write");
        std::fs::write(dir.path().join("broken.toml"), "pixelSize = \"big\"\n").expect("write");
        std::fs::write(dir.path().join("smoke.toml"), "gravity = -0.02\n").expect("write");

        let mut catalog = ParticleCatalog::new();
        let summary = catalog
            .load_dir(dir.path(), false, &NoRecipients)
            .expect("load");

        assert_eq!(summary.loaded, 2);
        assert_eq!(summary.failed, 1);
        // Sorted discovery: fire before smoke.
        assert_eq!(catalog.id_for_name("fire"), Some(EffectId::new(0)));
        assert_eq!(catalog.id_for_name("smoke"), Some(EffectId::new(1)));
        assert!(catalog.get_by_name("fire").expect("fire").full_bright);
    }

    #[test]
    fn test_replay_to_sends_current_definitions_in_order() {
        let mut catalog = ParticleCatalog::new();
        fill(&mut catalog, 3);
        catalog.release(EffectId::new(1));

        let late = RecordingRecipient::new("late");
        assert_eq!(catalog.replay_to(&late), 2);

        let ids: Vec<_> = late.packets().iter().map(|p| p.effect_id().raw()).collect();
        assert_eq!(ids, [0, 2]);
        assert!(late
            .packets()
            .iter()
            .all(|p| p.opcode() == DefineEffect::OPCODE));
    }

    #[test]
    fn test_iter_is_ascending() {
        let mut catalog = ParticleCatalog::new();
        fill(&mut catalog, 4);
        catalog.release(EffectId::new(0));
        catalog.allocate(ParticleDefinition::new("zero"), &NoRecipients).expect("room");

        let names: Vec<_> = catalog.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["zero", "p1", "p2", "p3"]);
    }
}
