//! Per-player lockstep state: view, tool, transition, message buffer.
//!
//! Everything in a [`PlayerSlot`] is driven purely by dispatched intent
//! records, so it stays identical across participants without entering
//! the world fingerprint.

use lair_core::{DoorKind, EntityId, PowerKind, RoomKind, TrapKind};

/// Which interaction mode a player's intents are routed through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewState {
    /// The ordinary top-down dungeon view.
    #[default]
    DungeonView,
    /// First-person control of a creature.
    PossessedCreatureView {
        /// The controlled creature.
        entity: EntityId,
    },
    /// Riding along inside a creature without controlling it.
    PassengerView {
        /// The carrying creature.
        entity: EntityId,
    },
    /// The full-map overview.
    MapOverview,
}

impl ViewState {
    /// Decode the `SetViewType` parameters, or `None` if unrecognized.
    pub fn from_wire(kind: u16, entity: u16) -> Option<ViewState> {
        Some(match kind {
            1 => ViewState::DungeonView,
            2 => ViewState::PossessedCreatureView {
                entity: EntityId(entity as u32),
            },
            3 => ViewState::PassengerView {
                entity: EntityId(entity as u32),
            },
            4 => ViewState::MapOverview,
            _ => return None,
        })
    }
}

/// The dungeon-view tool a player currently wields.
///
/// Switched only by the global `SetTool` action and read on every
/// subsequent turn, so held-button gestures keep their meaning across
/// turns without re-sending the tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolMode {
    /// The keeper hand: pick up and drop things.
    #[default]
    Hand,
    /// Place slabs of the given room.
    BuildRoom(RoomKind),
    /// Arm traps of the given kind.
    PlaceTrap(TrapKind),
    /// Fit doors of the given kind.
    PlaceDoor(DoorKind),
    /// Cast the given keeper power.
    CastSpell(PowerKind),
    /// Sell rooms under the pointer.
    Sell,
    /// Slap creatures under the pointer.
    Slap,
    /// Tag and untag slabs for digging.
    DigTag,
}

impl ToolMode {
    /// Decode the `SetTool` parameters, or `None` if unrecognized.
    pub fn from_wire(tool: u16, subject: u16) -> Option<ToolMode> {
        Some(match tool {
            0 => ToolMode::Hand,
            1 => ToolMode::BuildRoom(RoomKind::from_wire(subject)?),
            2 => ToolMode::PlaceTrap(TrapKind::from_wire(subject)?),
            3 => ToolMode::PlaceDoor(DoorKind::from_wire(subject)?),
            4 => ToolMode::CastSpell(PowerKind::from_wire(subject)?),
            5 => ToolMode::Sell,
            6 => ToolMode::Slap,
            7 => ToolMode::DigTag,
            _ => return None,
        })
    }
}

/// A view change in flight.
///
/// Set on the turn a player switches view and cleared at the start of
/// that player's next dispatch. The pause controller refuses to toggle
/// while any human player has one pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transition {
    /// No view change pending.
    #[default]
    Idle,
    /// Switching into first-person possession.
    EnteringPossession,
    /// Leaving first-person possession.
    LeavingPossession,
    /// Switching into passenger mode.
    EnteringPassenger,
    /// Leaving passenger mode.
    LeavingPassenger,
    /// The map overview fade, either direction.
    MapFade,
}

/// One player's dispatcher-owned state.
#[derive(Clone, Debug, Default)]
pub struct PlayerSlot {
    /// Current view.
    pub view: ViewState,
    /// Current dungeon tool.
    pub tool: ToolMode,
    /// View change in flight, if any.
    pub transition: Transition,
    /// Accumulated spell overcharge, in held turns.
    pub overcharge: u16,
    /// Whether a chat message is being composed.
    pub composing: bool,
    /// The chat message under composition.
    pub message: String,
}
