//! Intent-building helpers for tests.

use lair_core::{
    ActionCode, DoorKind, Intent, PowerKind, RoomKind, SyncStamp, TrapKind,
};

/// Pick a dungeon tool. Subjects that do not apply pass zero.
pub fn set_tool(tool: u16, subject: u16) -> Intent {
    Intent::with_action(ActionCode::SetTool, tool, subject)
}

pub fn set_tool_build(kind: RoomKind) -> Intent {
    set_tool(1, kind.to_wire())
}

pub fn set_tool_trap(kind: TrapKind) -> Intent {
    set_tool(2, kind.to_wire())
}

pub fn set_tool_door(kind: DoorKind) -> Intent {
    set_tool(3, kind.to_wire())
}

pub fn set_tool_cast(kind: PowerKind) -> Intent {
    set_tool(4, kind.to_wire())
}

/// The build action at a map position; the room kind comes from the
/// player's current tool.
pub fn build_at(x: u16, y: u16) -> Intent {
    let mut intent = Intent::with_action(ActionCode::BuildRoom, 0, 0);
    intent.set_position(x, y);
    intent
}

pub fn dig_at(x: u16, y: u16) -> Intent {
    let mut intent = Intent::with_action(ActionCode::DigTag, 0, 0);
    intent.set_position(x, y);
    intent
}

pub fn sell_at(x: u16, y: u16) -> Intent {
    let mut intent = Intent::with_action(ActionCode::SellRoom, 0, 0);
    intent.set_position(x, y);
    intent
}

/// A held-button charging turn: left button held over a map position.
pub fn charge_at(x: u16, y: u16) -> Intent {
    let mut intent = Intent::NO_ACTION;
    intent.flags.lbtn_held = true;
    intent.set_position(x, y);
    intent
}

/// The release-and-cast turn.
pub fn cast_release_at(x: u16, y: u16) -> Intent {
    let mut intent = Intent::with_action(ActionCode::CastSpell, 0, 0);
    intent.flags.lbtn_release = true;
    intent.set_position(x, y);
    intent
}

/// A cast release after the pointer left the map (no coordinates).
pub fn cast_release_blind() -> Intent {
    let mut intent = Intent::with_action(ActionCode::CastSpell, 0, 0);
    intent.flags.lbtn_release = true;
    intent
}

pub fn toggle_pause() -> Intent {
    Intent::with_action(ActionCode::TogglePause, 0, 0)
}

pub fn set_view(view: u16, entity: u16) -> Intent {
    Intent::with_action(ActionCode::SetViewType, view, entity)
}

pub fn quit() -> Intent {
    Intent::with_action(ActionCode::Quit, 0, 0)
}

/// A present-but-idle record carrying an explicit sync stamp, the way
/// an in-sync peer reports when nothing is happening.
pub fn stamped_idle(stamp: SyncStamp) -> Intent {
    let mut intent = Intent::NO_ACTION;
    intent.stamp = stamp;
    intent
}
