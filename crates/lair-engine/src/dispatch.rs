//! The per-turn action dispatcher.
//!
//! Applies one [`TurnTable`] to the world: every player slot in fixed
//! ascending order, global actions first, then view-routed handling.
//! Identical input must produce identical calls into the simulation on
//! every participant, so nothing here consults anything but the table,
//! the player slots, and the world itself.

use lair_core::{ActionCode, ActiveSet, Intent, PlayerId, Simulation, TurnTable, MAX_PLAYERS};
use smallvec::SmallVec;

use crate::dungeon;
use crate::player::{PlayerSlot, ToolMode, Transition, ViewState};
use crate::possession;

/// Longest chat message kept under composition.
const MAX_MESSAGE_LEN: usize = 64;

/// Side effects of one dispatched turn that the session must act on.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// Players whose intent asked to toggle the pause handshake.
    pub pause_requests: SmallVec<[PlayerId; 4]>,
    /// Players leaving the game this turn.
    pub quitters: SmallVec<[PlayerId; 4]>,
    /// A quitter asked to exit the process as well.
    pub complete_quit: bool,
    /// Players whose computer-control state flipped this turn.
    pub computer_toggles: SmallVec<[PlayerId; 4]>,
}

/// Apply one turn table to the world.
///
/// While `paused`, only global actions are processed; view handling and
/// held-input control are suspended until the session unpauses.
pub fn apply_turn(
    world: &mut dyn Simulation,
    table: &TurnTable,
    slots: &mut [PlayerSlot; MAX_PLAYERS],
    roster: ActiveSet,
    paused: bool,
) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();

    for player in roster.iter() {
        let slot = &mut slots[player.index()];
        slot.transition = Transition::Idle;
        let intent = table.get(player);

        // Message composition captures keys before anything else.
        if slot.composing && intent.action() == Some(ActionCode::MessageChar) {
            push_message_char(slot, intent.param1);
            continue;
        }

        match intent.action() {
            None => {
                log::debug!(
                    "player {player}: unrecognized action code {:#06x}, ignored",
                    intent.action_raw
                );
            }
            Some(code) if code.is_global() => {
                handle_global(world, player, slot, intent, code, &mut outcome);
                continue; // global actions short-circuit view handling
            }
            Some(_) => {}
        }

        if paused {
            continue;
        }

        match slot.view {
            ViewState::DungeonView => {
                dungeon::drive_camera(world, player, intent);
                dungeon::drive_overcharge(slot, intent);
                match intent.action() {
                    Some(ActionCode::None) | None => {}
                    Some(action) => dungeon::handle_action(world, player, slot, intent, action),
                }
            }
            ViewState::PossessedCreatureView { entity } => {
                possession::handle_possessed(world, player, slot, intent, entity);
            }
            ViewState::PassengerView { entity } => {
                possession::handle_passenger(world, player, slot, intent, entity);
            }
            ViewState::MapOverview => {
                possession::handle_map(world, player, slot, intent);
            }
        }
    }

    outcome
}

fn push_message_char(slot: &mut PlayerSlot, key: u16) {
    match char::from_u32(key as u32) {
        Some(c) if !c.is_control() && slot.message.len() < MAX_MESSAGE_LEN => {
            slot.message.push(c);
        }
        _ => {}
    }
}

fn handle_global(
    world: &mut dyn Simulation,
    player: PlayerId,
    slot: &mut PlayerSlot,
    intent: &Intent,
    action: ActionCode,
    outcome: &mut DispatchOutcome,
) {
    match action {
        ActionCode::None => {}
        ActionCode::Quit => outcome.quitters.push(player),
        ActionCode::CompleteQuit => {
            outcome.quitters.push(player);
            outcome.complete_quit = true;
        }
        ActionCode::TogglePause => outcome.pause_requests.push(player),
        ActionCode::MessageBegin => {
            slot.composing = true;
            slot.message.clear();
        }
        ActionCode::MessageEnd => {
            if slot.composing {
                slot.composing = false;
                log::info!("player {player} says: {}", slot.message);
            }
        }
        ActionCode::MessageChar => {
            // Not composing (the composing path consumed it earlier).
            log::debug!("player {player}: stray message key, ignored");
        }
        ActionCode::SetViewType => {
            match ViewState::from_wire(intent.param1, intent.param2) {
                Some(view) => apply_view_change(world, player, slot, view),
                None => {
                    log::debug!("player {player}: unknown view type {}", intent.param1)
                }
            }
        }
        ActionCode::SwitchScreenRes => {
            // Applied lockstep so recorded sessions keep their timing;
            // the presentation layer reads it off the player slot.
            log::debug!("player {player}: screen resolution switch");
        }
        ActionCode::SetTool => match ToolMode::from_wire(intent.param1, intent.param2) {
            Some(tool) => {
                slot.tool = tool;
                slot.overcharge = 0;
            }
            None => log::debug!(
                "player {player}: unknown tool {} subject {}",
                intent.param1,
                intent.param2
            ),
        },
        ActionCode::ToggleComputer => {
            if world.toggle_computer(player) {
                outcome.computer_toggles.push(player);
            }
        }
        ActionCode::CheatRevealMap => world.cheat_reveal_map(player),
        ActionCode::CheatAllFree => world.cheat_all_free(player),
        _ => {}
    }
}

fn apply_view_change(
    world: &mut dyn Simulation,
    player: PlayerId,
    slot: &mut PlayerSlot,
    new_view: ViewState,
) {
    if slot.view == new_view {
        return;
    }

    match slot.view {
        ViewState::PossessedCreatureView { entity } => {
            world.end_possession(player, entity);
            slot.transition = Transition::LeavingPossession;
        }
        ViewState::PassengerView { entity } => {
            world.end_possession(player, entity);
            slot.transition = Transition::LeavingPassenger;
        }
        ViewState::MapOverview => slot.transition = Transition::MapFade,
        ViewState::DungeonView => {}
    }

    match new_view {
        ViewState::PossessedCreatureView { entity } => {
            if world.begin_possession(player, entity) {
                slot.view = new_view;
                slot.transition = Transition::EnteringPossession;
            } else {
                log::debug!("player {player}: cannot possess {entity}");
                slot.view = ViewState::DungeonView;
            }
        }
        ViewState::PassengerView { entity } => {
            if world.begin_possession(player, entity) {
                slot.view = new_view;
                slot.transition = Transition::EnteringPassenger;
            } else {
                log::debug!("player {player}: cannot ride {entity}");
                slot.view = ViewState::DungeonView;
            }
        }
        ViewState::MapOverview => {
            slot.view = new_view;
            slot.transition = Transition::MapFade;
        }
        ViewState::DungeonView => slot.view = new_view,
    }
}
