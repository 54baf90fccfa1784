//! Closed enumerations for buildable/castable things.
//!
//! These are the payload vocabularies of the tool machine: what `param1`
//! means for `SetTool`, `BuildRoom`, `PlaceTrap`, `PlaceDoor`, and
//! `CastSpell`. Discriminants are wire values and are append-only, same
//! as action codes. Unrecognized values are a logged no-op at dispatch.

/// A buildable room type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum RoomKind {
    Treasury = 1,
    Lair = 2,
    Hatchery = 3,
    TrainingRoom = 4,
    Library = 5,
    Workshop = 6,
    Prison = 7,
    TortureChamber = 8,
    Temple = 9,
    Graveyard = 10,
    Barracks = 11,
    GuardPost = 12,
    Bridge = 13,
    Scavenger = 14,
}

impl RoomKind {
    /// Resolve a wire value, or `None` if unrecognized.
    pub fn from_wire(raw: u16) -> Option<RoomKind> {
        Some(match raw {
            1 => Self::Treasury,
            2 => Self::Lair,
            3 => Self::Hatchery,
            4 => Self::TrainingRoom,
            5 => Self::Library,
            6 => Self::Workshop,
            7 => Self::Prison,
            8 => Self::TortureChamber,
            9 => Self::Temple,
            10 => Self::Graveyard,
            11 => Self::Barracks,
            12 => Self::GuardPost,
            13 => Self::Bridge,
            14 => Self::Scavenger,
            _ => return None,
        })
    }

    /// The wire value.
    pub fn to_wire(self) -> u16 {
        self as u16
    }
}

/// A deployable trap type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum TrapKind {
    Boulder = 1,
    Alarm = 2,
    PoisonGas = 3,
    Lightning = 4,
    WordOfPower = 5,
    Lava = 6,
}

impl TrapKind {
    /// Resolve a wire value, or `None` if unrecognized.
    pub fn from_wire(raw: u16) -> Option<TrapKind> {
        Some(match raw {
            1 => Self::Boulder,
            2 => Self::Alarm,
            3 => Self::PoisonGas,
            4 => Self::Lightning,
            5 => Self::WordOfPower,
            6 => Self::Lava,
            _ => return None,
        })
    }

    /// The wire value.
    pub fn to_wire(self) -> u16 {
        self as u16
    }
}

/// A fittable door type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum DoorKind {
    Wood = 1,
    Braced = 2,
    Iron = 3,
    Magic = 4,
}

impl DoorKind {
    /// Resolve a wire value, or `None` if unrecognized.
    pub fn from_wire(raw: u16) -> Option<DoorKind> {
        Some(match raw {
            1 => Self::Wood,
            2 => Self::Braced,
            3 => Self::Iron,
            4 => Self::Magic,
            _ => return None,
        })
    }

    /// The wire value.
    pub fn to_wire(self) -> u16 {
        self as u16
    }
}

/// A castable keeper power.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum PowerKind {
    CreateImp = 1,
    SightOfEvil = 2,
    Speed = 3,
    Obey = 4,
    CallToArms = 5,
    Conceal = 6,
    Heal = 7,
    Lightning = 8,
    Protect = 9,
    Chicken = 10,
    Disease = 11,
    DestroyWalls = 12,
    CaveIn = 13,
    Armageddon = 14,
}

impl PowerKind {
    /// Resolve a wire value, or `None` if unrecognized.
    pub fn from_wire(raw: u16) -> Option<PowerKind> {
        Some(match raw {
            1 => Self::CreateImp,
            2 => Self::SightOfEvil,
            3 => Self::Speed,
            4 => Self::Obey,
            5 => Self::CallToArms,
            6 => Self::Conceal,
            7 => Self::Heal,
            8 => Self::Lightning,
            9 => Self::Protect,
            10 => Self::Chicken,
            11 => Self::Disease,
            12 => Self::DestroyWalls,
            13 => Self::CaveIn,
            14 => Self::Armageddon,
            _ => return None,
        })
    }

    /// The wire value.
    pub fn to_wire(self) -> u16 {
        self as u16
    }

    /// Whether the power charges up while the button is held.
    pub fn supports_overcharge(self) -> bool {
        !matches!(self, Self::SightOfEvil | Self::Obey | Self::Armageddon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_values_are_stable() {
        assert_eq!(RoomKind::Treasury.to_wire(), 1);
        assert_eq!(RoomKind::from_wire(14), Some(RoomKind::Scavenger));
        assert_eq!(RoomKind::from_wire(0), None);
        assert_eq!(TrapKind::from_wire(6), Some(TrapKind::Lava));
        assert_eq!(DoorKind::from_wire(4), Some(DoorKind::Magic));
        assert_eq!(PowerKind::from_wire(14), Some(PowerKind::Armageddon));
        assert_eq!(PowerKind::from_wire(99), None);
    }

    #[test]
    fn instant_powers_do_not_overcharge() {
        assert!(!PowerKind::Obey.supports_overcharge());
        assert!(PowerKind::Lightning.supports_overcharge());
    }
}
