//! Possession, passenger, and map-overview intent handling.

use lair_core::{
    ActionCode, CreatureStatus, EntityId, Intent, MapCoord, PlayerId, Simulation, Steering,
};

use crate::dungeon;
use crate::player::{PlayerSlot, Transition, ViewState};

fn steering_from(intent: &Intent) -> Steering {
    let flags = intent.flags;
    let axis = |neg: bool, pos: bool| (pos as i16) - (neg as i16);
    Steering {
        forward: axis(flags.move_down, flags.move_up),
        strafe: axis(flags.move_left, flags.move_right),
        // aim deltas ride in the position fields while possessing; the
        // pointer has no map meaning in first person
        aim_dx: if flags.coords_valid {
            intent.pos_x as i16
        } else {
            0
        },
        aim_dy: if flags.coords_valid {
            intent.pos_y as i16
        } else {
            0
        },
    }
}

/// Handle one turn of first-person possession input.
pub(crate) fn handle_possessed(
    world: &mut dyn Simulation,
    player: PlayerId,
    slot: &mut PlayerSlot,
    intent: &Intent,
    entity: EntityId,
) {
    let status = world.creature_status(entity);
    match status {
        CreatureStatus::Missing => {
            // The creature is gone; eject the player.
            log::debug!("player {player}: possessed creature {entity} vanished");
            slot.view = ViewState::DungeonView;
            slot.transition = Transition::LeavingPossession;
            return;
        }
        CreatureStatus::Ready => {
            let steering = steering_from(intent);
            if steering != Steering::default() {
                world.steer_creature(entity, steering);
            }
        }
        CreatureStatus::Dying | CreatureStatus::Blocked => {
            // Control input is discarded; the exit action still works.
            log::debug!("player {player}: possessed creature {entity} is {status:?}");
        }
    }

    match intent.action() {
        Some(ActionCode::PossessExit) => {
            world.end_possession(player, entity);
            slot.view = ViewState::DungeonView;
            slot.transition = Transition::LeavingPossession;
        }
        Some(ActionCode::PossessSetInstance) => {
            if !world.set_creature_instance(entity, intent.param1) {
                log::debug!(
                    "player {player}: instance {} rejected by creature {entity}",
                    intent.param1
                );
            }
        }
        Some(ActionCode::None) | None => {}
        Some(other) => {
            log::debug!("player {player}: action {other:?} has no meaning while possessing");
        }
    }
}

/// Handle one turn of passenger-mode input. Only the exit action means
/// anything.
pub(crate) fn handle_passenger(
    world: &mut dyn Simulation,
    player: PlayerId,
    slot: &mut PlayerSlot,
    intent: &Intent,
    entity: EntityId,
) {
    match intent.action() {
        Some(ActionCode::PassengerExit) => {
            world.end_possession(player, entity);
            slot.view = ViewState::DungeonView;
            slot.transition = Transition::LeavingPassenger;
        }
        Some(ActionCode::None) | None => {}
        Some(other) => {
            log::debug!("player {player}: action {other:?} has no meaning as a passenger");
        }
    }
}

/// Handle one turn of map-overview input: camera pan plus the zoom-back
/// action.
pub(crate) fn handle_map(
    world: &mut dyn Simulation,
    player: PlayerId,
    slot: &mut PlayerSlot,
    intent: &Intent,
) {
    dungeon::drive_camera(world, player, intent);
    match intent.action() {
        Some(ActionCode::ZoomToPosition) => {
            if intent.flags.coords_valid {
                world.center_camera(player, MapCoord::new(intent.pos_x, intent.pos_y));
            }
            slot.view = ViewState::DungeonView;
            slot.transition = Transition::MapFade;
        }
        Some(ActionCode::None) | None => {}
        Some(other) => {
            log::debug!("player {player}: action {other:?} has no meaning on the map");
        }
    }
}
