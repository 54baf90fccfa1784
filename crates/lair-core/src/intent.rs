//! The per-turn intent record ("packet") and its fixed wire layout.
//!
//! One intent record describes one player's input for one turn. The
//! on-wire/on-disk layout is exactly [`Intent::WIRE_SIZE`] bytes and is
//! shared between the network transport and the turn log, which is what
//! makes the log seekable by turn index.
//!
//! All integers are little-endian. The record keeps the raw `u16` action
//! code so that unrecognized codes survive a decode/encode round trip;
//! [`Intent::action`] resolves the code to the closed [`ActionCode`]
//! enumeration at dispatch time.

use std::fmt;

use crate::id::{PlayerId, MAX_PLAYERS};

// ── Action codes ────────────────────────────────────────────────

/// The closed, versioned set of intent action codes.
///
/// Discriminants are the wire values. The set is append-only: removing
/// or renumbering a variant breaks replay-file compatibility.
///
/// # Examples
///
/// ```
/// use lair_core::ActionCode;
///
/// assert_eq!(ActionCode::from_wire(0), Some(ActionCode::None));
/// assert_eq!(ActionCode::BuildRoom.to_wire(), 32);
/// assert_eq!(ActionCode::from_wire(0xFFFF), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ActionCode {
    /// No action this turn. The all-zero record carries this code.
    None = 0,

    // Global actions, valid in every view state.
    /// Leave the current game.
    Quit = 1,
    /// Leave the game and exit the process.
    CompleteQuit = 2,
    /// Toggle the global pause handshake.
    TogglePause = 3,
    /// Begin composing a chat message.
    MessageBegin = 4,
    /// Finish (send) the chat message being composed.
    MessageEnd = 5,
    /// Append one key to the chat message being composed.
    MessageChar = 6,
    /// Switch the player's view state; `param1` is the target view.
    SetViewType = 7,
    /// Change screen resolution (applied lockstep so replay timing matches).
    SwitchScreenRes = 8,
    /// Switch the player's dungeon tool/work mode; `param1` is the tool,
    /// `param2` the tool's subject (room/trap/door/power kind).
    SetTool = 9,
    /// Toggle computer control of the player's dungeon.
    ToggleComputer = 10,
    /// Cheat: reveal the whole map.
    CheatRevealMap = 11,
    /// Cheat: everything is free.
    CheatAllFree = 12,

    // Dungeon-view actions.
    /// Place a room; `param1` is the [`RoomKind`](crate::RoomKind).
    BuildRoom = 32,
    /// Sell the room under the pointer.
    SellRoom = 33,
    /// Arm a trap; `param1` is the [`TrapKind`](crate::TrapKind).
    PlaceTrap = 34,
    /// Fit a door; `param1` is the [`DoorKind`](crate::DoorKind).
    PlaceDoor = 35,
    /// Cast a keeper power; `param1` is the [`PowerKind`](crate::PowerKind),
    /// `param2` an optional target entity.
    CastSpell = 36,
    /// Slap the creature under the pointer; `param1` is the target entity.
    Slap = 37,
    /// Tag/untag a slab for digging.
    DigTag = 38,
    /// Pick up the thing under the pointer into the keeper hand.
    HandPickup = 39,
    /// Drop the top of the keeper hand at the pointer.
    HandDrop = 40,
    /// Cast Hold Audience (no pointer target).
    HoldAudience = 41,
    /// Activate a dungeon special box; `param1` is the box entity.
    UseSpecialBox = 42,
    /// Transfer a creature; `param1` source, `param2` destination entity.
    TransferCreature = 43,

    // Possession-view actions.
    /// Leave first-person possession; `param1` is the influenced entity.
    PossessExit = 64,
    /// Select or trigger a creature instance; `param1` is the instance.
    PossessSetInstance = 65,

    // Passenger-view actions.
    /// Leave passenger mode; `param1` is the influenced entity.
    PassengerExit = 80,

    // Map-overview actions.
    /// Zoom from the map back into the dungeon at `position`.
    ZoomToPosition = 96,
}

impl ActionCode {
    /// Resolve a wire value to an action code, or `None` if unrecognized.
    ///
    /// Unrecognized codes are a no-op at dispatch, never an error, so a
    /// newer build's log stays loadable by an older one.
    pub fn from_wire(raw: u16) -> Option<ActionCode> {
        Some(match raw {
            0 => Self::None,
            1 => Self::Quit,
            2 => Self::CompleteQuit,
            3 => Self::TogglePause,
            4 => Self::MessageBegin,
            5 => Self::MessageEnd,
            6 => Self::MessageChar,
            7 => Self::SetViewType,
            8 => Self::SwitchScreenRes,
            9 => Self::SetTool,
            10 => Self::ToggleComputer,
            11 => Self::CheatRevealMap,
            12 => Self::CheatAllFree,
            32 => Self::BuildRoom,
            33 => Self::SellRoom,
            34 => Self::PlaceTrap,
            35 => Self::PlaceDoor,
            36 => Self::CastSpell,
            37 => Self::Slap,
            38 => Self::DigTag,
            39 => Self::HandPickup,
            40 => Self::HandDrop,
            41 => Self::HoldAudience,
            42 => Self::UseSpecialBox,
            43 => Self::TransferCreature,
            64 => Self::PossessExit,
            65 => Self::PossessSetInstance,
            80 => Self::PassengerExit,
            96 => Self::ZoomToPosition,
            _ => return None,
        })
    }

    /// The wire value of this action code.
    pub fn to_wire(self) -> u16 {
        self as u16
    }

    /// Whether this action is handled identically in every view state.
    pub fn is_global(self) -> bool {
        matches!(
            self,
            Self::Quit
                | Self::CompleteQuit
                | Self::TogglePause
                | Self::MessageBegin
                | Self::MessageEnd
                | Self::MessageChar
                | Self::SetViewType
                | Self::SwitchScreenRes
                | Self::SetTool
                | Self::ToggleComputer
                | Self::CheatRevealMap
                | Self::CheatAllFree
        )
    }
}

// ── Control flags ───────────────────────────────────────────────

/// Named held/edge-triggered input signals carried in every intent.
///
/// The structured representation replaces the original raw bitmask with
/// named booleans; [`to_bits`](ControlFlags::to_bits) /
/// [`from_bits`](ControlFlags::from_bits) preserve the exact bit-for-bit
/// wire layout the turn log depends on.
///
/// # Examples
///
/// ```
/// use lair_core::ControlFlags;
///
/// let mut flags = ControlFlags::default();
/// flags.lbtn_held = true;
/// flags.coords_valid = true;
///
/// let bits = flags.to_bits();
/// assert_eq!(ControlFlags::from_bits(bits), flags);
/// assert_eq!(bits, (1 << 1) | (1 << 6));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(missing_docs)] // field names are the documentation
pub struct ControlFlags {
    pub lbtn_click: bool,
    pub lbtn_held: bool,
    pub lbtn_release: bool,
    pub rbtn_click: bool,
    pub rbtn_held: bool,
    pub rbtn_release: bool,
    /// Whether `pos_x`/`pos_y` carry a valid map coordinate this turn.
    pub coords_valid: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub rotate_cw: bool,
    pub rotate_ccw: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    /// Speed-up modifier (camera pan multiplier).
    pub sprint: bool,
}

impl ControlFlags {
    /// Pack into the 16-bit wire representation.
    pub fn to_bits(self) -> u16 {
        let mut bits = 0u16;
        let fields = [
            self.lbtn_click,
            self.lbtn_held,
            self.lbtn_release,
            self.rbtn_click,
            self.rbtn_held,
            self.rbtn_release,
            self.coords_valid,
            self.move_up,
            self.move_down,
            self.move_left,
            self.move_right,
            self.rotate_cw,
            self.rotate_ccw,
            self.zoom_in,
            self.zoom_out,
            self.sprint,
        ];
        for (i, set) in fields.into_iter().enumerate() {
            if set {
                bits |= 1 << i;
            }
        }
        bits
    }

    /// Unpack from the 16-bit wire representation.
    pub fn from_bits(bits: u16) -> ControlFlags {
        let bit = |i: u16| bits & (1 << i) != 0;
        ControlFlags {
            lbtn_click: bit(0),
            lbtn_held: bit(1),
            lbtn_release: bit(2),
            rbtn_click: bit(3),
            rbtn_held: bit(4),
            rbtn_release: bit(5),
            coords_valid: bit(6),
            move_up: bit(7),
            move_down: bit(8),
            move_left: bit(9),
            move_right: bit(10),
            rotate_cw: bit(11),
            rotate_ccw: bit(12),
            zoom_in: bit(13),
            zoom_out: bit(14),
            sprint: bit(15),
        }
    }

    /// Whether any signal is set.
    pub fn any(self) -> bool {
        self.to_bits() != 0
    }
}

// ── Sync stamp ──────────────────────────────────────────────────

/// A player's self-reported sync contribution, one turn delayed.
///
/// The two halves are compared independently by the desync detector:
/// `state` is a 32-bit fold of the previous turn's world fingerprint,
/// `seed` the pseudo-random stream draw counter. A divergence in `seed`
/// alone means only the random stream drifted — a narrower, often
/// recoverable fault — so it must not be conflated with `state`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStamp {
    /// Folded world-state fingerprint.
    pub state: u32,
    /// Pseudo-random stream draw counter.
    pub seed: u32,
}

impl SyncStamp {
    /// Pack into the 8-byte wire field (`state` in the high half).
    pub fn to_wire(self) -> u64 {
        ((self.state as u64) << 32) | self.seed as u64
    }

    /// Unpack from the 8-byte wire field.
    pub fn from_wire(raw: u64) -> SyncStamp {
        SyncStamp {
            state: (raw >> 32) as u32,
            seed: raw as u32,
        }
    }
}

// ── Intent record ───────────────────────────────────────────────

/// One player's input for one turn, in its fixed wire layout.
///
/// The all-zero record means "no action" and is what inactive, timed-out,
/// or malformed peers contribute. Records are never retained past the
/// turn boundary except inside the turn log.
///
/// # Examples
///
/// ```
/// use lair_core::{ActionCode, Intent};
///
/// let intent = Intent::with_action(ActionCode::BuildRoom, 2, 0);
/// let wire = intent.encode();
/// assert_eq!(wire.len(), Intent::WIRE_SIZE);
/// assert_eq!(Intent::decode(&wire), intent);
/// assert!(!intent.is_no_action());
/// assert!(Intent::NO_ACTION.is_no_action());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    /// Raw action code; resolve via [`Intent::action`].
    pub action_raw: u16,
    /// Held/edge input signals.
    pub flags: ControlFlags,
    /// First action parameter; meaning depends on the action.
    pub param1: u16,
    /// Second action parameter; meaning depends on the action.
    pub param2: u16,
    /// Pointer map/screen X, valid only when `flags.coords_valid`.
    pub pos_x: u16,
    /// Pointer map/screen Y, valid only when `flags.coords_valid`.
    pub pos_y: u16,
    /// Self-reported sync contribution for the previous turn.
    pub stamp: SyncStamp,
}

impl Intent {
    /// Exact encoded size in bytes, identical on wire and on disk.
    pub const WIRE_SIZE: usize = 24;

    /// The zero-filled "no action" record.
    pub const NO_ACTION: Intent = Intent {
        action_raw: 0,
        flags: ControlFlags {
            lbtn_click: false,
            lbtn_held: false,
            lbtn_release: false,
            rbtn_click: false,
            rbtn_held: false,
            rbtn_release: false,
            coords_valid: false,
            move_up: false,
            move_down: false,
            move_left: false,
            move_right: false,
            rotate_cw: false,
            rotate_ccw: false,
            zoom_in: false,
            zoom_out: false,
            sprint: false,
        },
        param1: 0,
        param2: 0,
        pos_x: 0,
        pos_y: 0,
        stamp: SyncStamp { state: 0, seed: 0 },
    };

    /// Build a record carrying an action and its two parameters.
    pub fn with_action(action: ActionCode, param1: u16, param2: u16) -> Intent {
        Intent {
            action_raw: action.to_wire(),
            param1,
            param2,
            ..Intent::NO_ACTION
        }
    }

    /// Resolve the action code, or `None` if the wire value is unknown.
    pub fn action(&self) -> Option<ActionCode> {
        ActionCode::from_wire(self.action_raw)
    }

    /// Set the pointer position and mark the coordinates valid.
    pub fn set_position(&mut self, x: u16, y: u16) {
        self.pos_x = x;
        self.pos_y = y;
        self.flags.coords_valid = true;
    }

    /// Whether this is the zero/no-action record.
    pub fn is_no_action(&self) -> bool {
        *self == Intent::NO_ACTION
    }

    /// Encode into the fixed wire layout.
    pub fn encode(&self) -> [u8; Intent::WIRE_SIZE] {
        let mut buf = [0u8; Intent::WIRE_SIZE];
        buf[0..2].copy_from_slice(&self.action_raw.to_le_bytes());
        buf[2..4].copy_from_slice(&self.flags.to_bits().to_le_bytes());
        buf[4..6].copy_from_slice(&self.param1.to_le_bytes());
        buf[6..8].copy_from_slice(&self.param2.to_le_bytes());
        buf[8..10].copy_from_slice(&self.pos_x.to_le_bytes());
        buf[10..12].copy_from_slice(&self.pos_y.to_le_bytes());
        // bytes 12..16 reserved, kept zero
        buf[16..24].copy_from_slice(&self.stamp.to_wire().to_le_bytes());
        buf
    }

    /// Decode from the fixed wire layout.
    pub fn decode(buf: &[u8; Intent::WIRE_SIZE]) -> Intent {
        let u16_at = |off: usize| u16::from_le_bytes([buf[off], buf[off + 1]]);
        let mut stamp = [0u8; 8];
        stamp.copy_from_slice(&buf[16..24]);
        Intent {
            action_raw: u16_at(0),
            flags: ControlFlags::from_bits(u16_at(2)),
            param1: u16_at(4),
            param2: u16_at(6),
            pos_x: u16_at(8),
            pos_y: u16_at(10),
            stamp: SyncStamp::from_wire(u64::from_le_bytes(stamp)),
        }
    }

    /// Decode a raw peer record of unknown length.
    ///
    /// Anything other than exactly [`Intent::WIRE_SIZE`] bytes is treated
    /// as a malformed record and yields `None`; the caller substitutes
    /// the no-action record rather than aborting the turn.
    pub fn decode_raw(bytes: &[u8]) -> Option<Intent> {
        let buf: &[u8; Intent::WIRE_SIZE] = bytes.try_into().ok()?;
        Some(Intent::decode(buf))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action() {
            Some(code) => write!(f, "{code:?}({}, {})", self.param1, self.param2),
            None => write!(f, "Unknown({:#06x})", self.action_raw),
        }
    }
}

// ── Turn table ──────────────────────────────────────────────────

/// The per-turn table of intent records, one per player slot.
///
/// Allocated once, zeroed at the start of every turn, populated by the
/// intent exchange (or the turn-log reader), consumed exactly once by
/// the dispatcher. Inactive slots stay at [`Intent::NO_ACTION`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnTable {
    slots: [Intent; MAX_PLAYERS],
}

impl TurnTable {
    /// A table of all no-action records.
    pub fn empty() -> TurnTable {
        TurnTable::default()
    }

    /// Build a table directly from its slots.
    pub fn from_slots(slots: [Intent; MAX_PLAYERS]) -> TurnTable {
        TurnTable { slots }
    }

    /// The intent for a player slot.
    pub fn get(&self, player: PlayerId) -> &Intent {
        &self.slots[player.index()]
    }

    /// Replace the intent for a player slot.
    pub fn set(&mut self, player: PlayerId, intent: Intent) {
        self.slots[player.index()] = intent;
    }

    /// Reset every slot to the no-action record.
    pub fn clear(&mut self) {
        self.slots = [Intent::NO_ACTION; MAX_PLAYERS];
    }

    /// Whether every slot is the zero/no-action record.
    ///
    /// This is the fast-forward skip predicate: a turn is skippable only
    /// when no player did anything at all.
    pub fn is_no_action(&self) -> bool {
        self.slots.iter().all(Intent::is_no_action)
    }

    /// Iterate `(player, intent)` pairs in fixed slot order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &Intent)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, intent)| (PlayerId(i as u8), intent))
    }
}
