//! Dungeon-view intent handling: camera, tools, and the overcharge
//! machine.

use lair_core::{ActionCode, EntityId, Intent, MapCoord, PlayerId, Simulation};

use crate::player::{PlayerSlot, ToolMode};

/// Camera pan distance per held-direction turn.
const PAN_STEP: i16 = 1;
/// Pan multiplier while Sprint is held.
const SPRINT_FACTOR: i16 = 4;

fn pointer(intent: &Intent) -> Option<MapCoord> {
    intent
        .flags
        .coords_valid
        .then(|| MapCoord::new(intent.pos_x, intent.pos_y))
}

/// Apply the held-input camera controls for one turn.
pub(crate) fn drive_camera(world: &mut dyn Simulation, player: PlayerId, intent: &Intent) {
    let flags = intent.flags;
    let step = if flags.sprint {
        PAN_STEP * SPRINT_FACTOR
    } else {
        PAN_STEP
    };
    let mut dx = 0i16;
    let mut dy = 0i16;
    if flags.move_left {
        dx -= step;
    }
    if flags.move_right {
        dx += step;
    }
    if flags.move_up {
        dy -= step;
    }
    if flags.move_down {
        dy += step;
    }
    if dx != 0 || dy != 0 {
        world.pan_camera(player, dx, dy);
    }
    if flags.rotate_cw {
        world.rotate_camera(player, 1);
    }
    if flags.rotate_ccw {
        world.rotate_camera(player, -1);
    }
    if flags.zoom_in {
        world.zoom_camera(player, 1);
    }
    if flags.zoom_out {
        world.zoom_camera(player, -1);
    }
}

/// Advance the overcharge accumulator for one turn.
///
/// Charge grows every turn the left button stays held and resets the
/// first turn it is neither held nor released. The release turn keeps
/// the accumulated value so the cast action can consume it, even when
/// the pointer left the map (a release without valid coordinates is a
/// legal gesture).
pub(crate) fn drive_overcharge(slot: &mut PlayerSlot, intent: &Intent) {
    let charging = matches!(slot.tool, ToolMode::CastSpell(kind) if kind.supports_overcharge());
    if !charging {
        slot.overcharge = 0;
        return;
    }
    if intent.flags.lbtn_held {
        slot.overcharge = slot.overcharge.saturating_add(1);
    } else if !intent.flags.lbtn_release {
        slot.overcharge = 0;
    }
}

/// Handle one dungeon-view action.
pub(crate) fn handle_action(
    world: &mut dyn Simulation,
    player: PlayerId,
    slot: &mut PlayerSlot,
    intent: &Intent,
    action: ActionCode,
) {
    let at = pointer(intent);
    let applied = match action {
        ActionCode::BuildRoom => match (slot.tool, at) {
            (ToolMode::BuildRoom(kind), Some(at)) => world.build_room(player, kind, at),
            _ => false,
        },
        ActionCode::SellRoom => match at {
            Some(at) => world.sell_room(player, at),
            None => false,
        },
        ActionCode::PlaceTrap => match (slot.tool, at) {
            (ToolMode::PlaceTrap(kind), Some(at)) => world.place_trap(player, kind, at),
            _ => false,
        },
        ActionCode::PlaceDoor => match (slot.tool, at) {
            (ToolMode::PlaceDoor(kind), Some(at)) => world.place_door(player, kind, at),
            _ => false,
        },
        ActionCode::CastSpell => match slot.tool {
            ToolMode::CastSpell(kind) => {
                let target = (intent.param1 != 0).then(|| EntityId(intent.param1 as u32));
                let charge = slot.overcharge;
                slot.overcharge = 0;
                world.cast_power(player, kind, at, target, charge)
            }
            _ => false,
        },
        ActionCode::Slap => world.slap(player, EntityId(intent.param1 as u32)),
        ActionCode::DigTag => match at {
            Some(at) => world.tag_dig(player, at),
            None => false,
        },
        ActionCode::HandPickup => match at {
            Some(at) => world.hand_pickup(player, at),
            None => false,
        },
        ActionCode::HandDrop => match at {
            Some(at) => world.hand_drop(player, at),
            None => false,
        },
        ActionCode::HoldAudience => world.hold_audience(player),
        ActionCode::UseSpecialBox => {
            world.use_special_box(player, EntityId(intent.param1 as u32))
        }
        ActionCode::TransferCreature => world.transfer_creature(
            player,
            EntityId(intent.param1 as u32),
            EntityId(intent.param2 as u32),
        ),
        other => {
            log::debug!("player {player}: action {other:?} has no meaning in the dungeon view");
            return;
        }
    };
    if !applied {
        log::debug!("player {player}: {action:?} did not apply");
    }
}
