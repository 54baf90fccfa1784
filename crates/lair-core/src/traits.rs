//! Seams between the lockstep machinery and the actual game simulation.
//!
//! The engine never touches world state directly. It reads through
//! [`StateView`] (for fingerprinting) and mutates through [`Simulation`]
//! (for dispatched actions). Both are object-safe so the engine can hold
//! `&mut dyn Simulation` without knowing the concrete world type.

use std::ops::ControlFlow;

use crate::id::{EntityId, PlayerId};
use crate::kinds::{DoorKind, PowerKind, RoomKind, TrapKind};
use crate::seed::SeedStream;

/// A map position in slab coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MapCoord {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

impl MapCoord {
    /// Build a coordinate.
    pub fn new(x: u16, y: u16) -> MapCoord {
        MapCoord { x, y }
    }
}

/// Broad classification of a live entity, used to decide what enters
/// the world fingerprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum EntityClass {
    Creature,
    DeadCreature,
    Trap,
    Door,
    Object,
    Shot,
    /// Visual-only effect fragment. Spawn counts vary with graphics
    /// settings, so it never enters the fingerprint.
    EffectElem,
    /// Positional audio emitter. Presence varies with sound settings,
    /// so it never enters the fingerprint.
    AmbientSound,
}

impl EntityClass {
    /// Whether entities of this class are cosmetic and excluded from
    /// the world fingerprint.
    pub fn is_cosmetic(self) -> bool {
        matches!(self, Self::EffectElem | Self::AmbientSound)
    }
}

/// The fingerprint-relevant facts about one live entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityDigest {
    /// The entity's identity.
    pub id: EntityId,
    /// Its class (decides cosmetic exclusion).
    pub class: EntityClass,
    /// Owning player, if any.
    pub owner: Option<PlayerId>,
    /// Current position.
    pub pos: MapCoord,
    /// Facing/heading, in whatever units the simulation uses, as long
    /// as they are identical across participants.
    pub orientation: u16,
}

/// The fingerprint-relevant facts about one player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerDigest {
    /// Camera position. Cameras are lockstep-driven, so they must agree.
    pub camera: MapCoord,
    /// Camera zoom step.
    pub camera_zoom: u16,
    /// The creature instance the player currently has active while
    /// possessing, or zero.
    pub instance: u32,
}

/// Whether a creature can currently be steered by a possessing player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatureStatus {
    /// Alive and accepting control.
    Ready,
    /// Dying; control input is discarded.
    Dying,
    /// Mid-animation or otherwise state-blocked; control input is
    /// discarded this turn.
    Blocked,
    /// No such entity.
    Missing,
}

/// One turn of first-person control input for a possessed creature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Steering {
    /// Forward/backward intent, negative is backward.
    pub forward: i16,
    /// Strafe intent, negative is left.
    pub strafe: i16,
    /// Horizontal aim delta.
    pub aim_dx: i16,
    /// Vertical aim delta.
    pub aim_dy: i16,
}

/// Read-only view of the world, sufficient to fingerprint it.
///
/// Implementations must visit entities in a deterministic order that is
/// identical across participants given identical world state.
pub trait StateView {
    /// Upper bound on live entities. The fingerprint sweep aborts if a
    /// visit exceeds this bound (a corruption signal, not a soft limit).
    fn entity_limit(&self) -> usize;

    /// Visit every live entity. The visitor may break early; the sweep
    /// honors it.
    fn visit_entities(&self, visitor: &mut dyn FnMut(&EntityDigest) -> ControlFlow<()>);

    /// The fingerprint contribution for a player slot, or `None` if the
    /// slot has no player state.
    fn player_digest(&self, player: PlayerId) -> Option<PlayerDigest>;
}

/// The mutation surface the action dispatcher drives.
///
/// Every method is a deterministic, lockstep-applied operation. A `bool`
/// return reports whether the operation applied; `false` is a legal
/// no-op (invalid target, not enough gold, ...) that the dispatcher logs
/// at debug level and otherwise ignores. Implementations must never make
/// the outcome depend on anything outside world state, the arguments,
/// and the shared [`SeedStream`].
pub trait Simulation: StateView {
    /// Advance the world one turn after all intents were applied.
    fn tick(&mut self, seed: &mut SeedStream);

    /// Pan the player's camera. Camera state enters the fingerprint,
    /// so all camera motion is lockstep-applied.
    fn pan_camera(&mut self, player: PlayerId, dx: i16, dy: i16);

    /// Rotate the player's camera by whole steps, negative for
    /// counter-clockwise.
    fn rotate_camera(&mut self, player: PlayerId, steps: i16);

    /// Step the player's camera zoom, negative to zoom out.
    fn zoom_camera(&mut self, player: PlayerId, delta: i16);

    /// Center the player's camera on a map position.
    fn center_camera(&mut self, player: PlayerId, at: MapCoord);

    /// Place a room slab for the player.
    fn build_room(&mut self, player: PlayerId, kind: RoomKind, at: MapCoord) -> bool;

    /// Sell the room slab at the position.
    fn sell_room(&mut self, player: PlayerId, at: MapCoord) -> bool;

    /// Arm a trap at the position.
    fn place_trap(&mut self, player: PlayerId, kind: TrapKind, at: MapCoord) -> bool;

    /// Fit a door at the position.
    fn place_door(&mut self, player: PlayerId, kind: DoorKind, at: MapCoord) -> bool;

    /// Cast a keeper power. `charge` is the accumulated overcharge level
    /// at release, zero for instant casts.
    fn cast_power(
        &mut self,
        player: PlayerId,
        kind: PowerKind,
        at: Option<MapCoord>,
        target: Option<EntityId>,
        charge: u16,
    ) -> bool;

    /// Slap the target creature.
    fn slap(&mut self, player: PlayerId, target: EntityId) -> bool;

    /// Toggle the dig tag on the slab at the position.
    fn tag_dig(&mut self, player: PlayerId, at: MapCoord) -> bool;

    /// Pick the topmost eligible thing at the position into the hand.
    fn hand_pickup(&mut self, player: PlayerId, at: MapCoord) -> bool;

    /// Drop the top of the hand at the position.
    fn hand_drop(&mut self, player: PlayerId, at: MapCoord) -> bool;

    /// Status of a creature for possession control.
    fn creature_status(&self, entity: EntityId) -> CreatureStatus;

    /// Apply one turn of first-person steering to a possessed creature.
    fn steer_creature(&mut self, entity: EntityId, steering: Steering) -> bool;

    /// Select or trigger a creature instance (ability slot).
    fn set_creature_instance(&mut self, entity: EntityId, instance: u16) -> bool;

    /// Enter first-person control of the entity.
    fn begin_possession(&mut self, player: PlayerId, entity: EntityId) -> bool;

    /// Leave first-person control of the entity.
    fn end_possession(&mut self, player: PlayerId, entity: EntityId) -> bool;

    /// Cast Hold Audience for the player.
    fn hold_audience(&mut self, player: PlayerId) -> bool;

    /// Activate a dungeon special box.
    fn use_special_box(&mut self, player: PlayerId, box_entity: EntityId) -> bool;

    /// Transfer a creature between the two entities' positions.
    fn transfer_creature(&mut self, player: PlayerId, source: EntityId, dest: EntityId) -> bool;

    /// Toggle computer control of the player's dungeon. Also invoked by
    /// the engine when a peer vanishes mid-session.
    fn toggle_computer(&mut self, player: PlayerId) -> bool;

    /// Cheat: reveal the whole map to the player.
    fn cheat_reveal_map(&mut self, player: PlayerId);

    /// Cheat: everything is free for the player.
    fn cheat_all_free(&mut self, player: PlayerId);
}
