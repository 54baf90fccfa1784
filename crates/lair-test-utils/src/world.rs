//! A miniature deterministic dungeon simulation.

use std::ops::ControlFlow;

use indexmap::{IndexMap, IndexSet};
use lair_core::{
    CreatureStatus, DoorKind, EntityClass, EntityDigest, EntityId, MapCoord, PlayerDigest,
    PlayerId, PowerKind, RoomKind, SeedStream, Simulation, StateView, Steering, TrapKind,
    MAX_PLAYERS,
};

const ROOM_COST: u32 = 50;
const TRAP_COST: u32 = 30;
const DOOR_COST: u32 = 20;
const POWER_COST: u32 = 10;
const STARTING_GOLD: u32 = 500;

#[derive(Clone, Debug)]
struct MockEntity {
    class: EntityClass,
    owner: Option<PlayerId>,
    pos: MapCoord,
    orientation: u16,
    status: CreatureStatus,
}

#[derive(Clone, Debug)]
struct MockPlayer {
    camera: MapCoord,
    camera_rot: i16,
    camera_zoom: u16,
    instance: u32,
    gold: u32,
    computer: bool,
    all_free: bool,
    revealed: bool,
    hand: Vec<EntityId>,
    possessed: Option<EntityId>,
}

impl Default for MockPlayer {
    fn default() -> Self {
        MockPlayer {
            camera: MapCoord::new(32, 32),
            camera_rot: 0,
            camera_zoom: 8,
            instance: 0,
            gold: STARTING_GOLD,
            computer: false,
            all_free: false,
            revealed: false,
            hand: Vec::new(),
            possessed: None,
        }
    }
}

/// A deterministic toy dungeon: a slab grid, a flat entity table, and
/// per-player gold. Identical operation sequences (including
/// [`SeedStream`] draws) always produce identical fingerprints, which
/// is exactly the property the lockstep machinery exists to protect.
#[derive(Clone, Debug)]
pub struct MockWorld {
    entities: IndexMap<EntityId, MockEntity>,
    rooms: IndexMap<(u16, u16), (PlayerId, RoomKind)>,
    dig_tags: IndexSet<(u16, u16)>,
    players: [MockPlayer; MAX_PLAYERS],
    next_entity: u32,
    entity_limit: usize,
    ticks: u64,
    last_cast: Option<(PlayerId, PowerKind, u16)>,
}

impl MockWorld {
    /// An empty world with the default entity limit.
    pub fn new() -> MockWorld {
        MockWorld {
            entities: IndexMap::new(),
            rooms: IndexMap::new(),
            dig_tags: IndexSet::new(),
            players: Default::default(),
            next_entity: 1,
            entity_limit: 1024,
            ticks: 0,
            last_cast: None,
        }
    }

    /// A world with one creature per given player, at distinct spots.
    pub fn with_keepers(players: impl IntoIterator<Item = PlayerId>) -> MockWorld {
        let mut world = MockWorld::new();
        for player in players {
            let x = 10 + 10 * player.0 as u16;
            world.spawn(EntityClass::Creature, Some(player), MapCoord::new(x, 10));
        }
        world
    }

    /// Spawn an entity and return its id.
    pub fn spawn(
        &mut self,
        class: EntityClass,
        owner: Option<PlayerId>,
        pos: MapCoord,
    ) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.insert(
            id,
            MockEntity {
                class,
                owner,
                pos,
                orientation: 0,
                status: CreatureStatus::Ready,
            },
        );
        id
    }

    pub fn set_entity_limit(&mut self, limit: usize) {
        self.entity_limit = limit;
    }

    pub fn set_creature_status(&mut self, id: EntityId, status: CreatureStatus) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.status = status;
        }
    }

    pub fn gold(&self, player: PlayerId) -> u32 {
        self.players[player.index()].gold
    }

    pub fn set_gold(&mut self, player: PlayerId, gold: u32) {
        self.players[player.index()].gold = gold;
    }

    pub fn room_at(&self, at: MapCoord) -> Option<(PlayerId, RoomKind)> {
        self.rooms.get(&(at.x, at.y)).copied()
    }

    pub fn dig_tagged(&self, at: MapCoord) -> bool {
        self.dig_tags.contains(&(at.x, at.y))
    }

    pub fn entity_pos(&self, id: EntityId) -> Option<MapCoord> {
        self.entities.get(&id).map(|e| e.pos)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_computer(&self, player: PlayerId) -> bool {
        self.players[player.index()].computer
    }

    pub fn is_revealed(&self, player: PlayerId) -> bool {
        self.players[player.index()].revealed
    }

    pub fn hand_size(&self, player: PlayerId) -> usize {
        self.players[player.index()].hand.len()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Last power cast, for assertions: `(player, kind, charge)`.
    pub fn last_cast(&self) -> Option<(PlayerId, PowerKind, u16)> {
        self.last_cast
    }

    fn pay(&mut self, player: PlayerId, cost: u32) -> bool {
        let p = &mut self.players[player.index()];
        if p.all_free {
            return true;
        }
        if p.gold < cost {
            return false;
        }
        p.gold -= cost;
        true
    }
}

impl Default for MockWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl StateView for MockWorld {
    fn entity_limit(&self) -> usize {
        self.entity_limit
    }

    fn visit_entities(&self, visitor: &mut dyn FnMut(&EntityDigest) -> ControlFlow<()>) {
        for (id, entity) in &self.entities {
            let digest = EntityDigest {
                id: *id,
                class: entity.class,
                owner: entity.owner,
                pos: entity.pos,
                orientation: entity.orientation,
            };
            if visitor(&digest).is_break() {
                return;
            }
        }
    }

    fn player_digest(&self, player: PlayerId) -> Option<PlayerDigest> {
        let p = &self.players[player.index()];
        Some(PlayerDigest {
            camera: p.camera,
            camera_zoom: p.camera_zoom,
            instance: p.instance,
        })
    }
}

impl Simulation for MockWorld {
    fn tick(&mut self, seed: &mut SeedStream) {
        self.ticks += 1;
        // creatures wander one deterministic step per tick
        for entity in self.entities.values_mut() {
            if entity.class != EntityClass::Creature {
                continue;
            }
            let dir = seed.roll(4) as u16;
            entity.orientation = dir;
            match dir {
                0 => entity.pos.y = entity.pos.y.saturating_sub(1),
                1 => entity.pos.x = entity.pos.x.saturating_add(1),
                2 => entity.pos.y = entity.pos.y.saturating_add(1),
                _ => entity.pos.x = entity.pos.x.saturating_sub(1),
            }
        }
    }

    fn pan_camera(&mut self, player: PlayerId, dx: i16, dy: i16) {
        let cam = &mut self.players[player.index()].camera;
        cam.x = cam.x.saturating_add_signed(dx);
        cam.y = cam.y.saturating_add_signed(dy);
    }

    fn rotate_camera(&mut self, player: PlayerId, steps: i16) {
        let p = &mut self.players[player.index()];
        p.camera_rot = (p.camera_rot + steps).rem_euclid(4);
    }

    fn zoom_camera(&mut self, player: PlayerId, delta: i16) {
        let p = &mut self.players[player.index()];
        p.camera_zoom = p.camera_zoom.saturating_add_signed(delta).clamp(1, 16);
    }

    fn center_camera(&mut self, player: PlayerId, at: MapCoord) {
        self.players[player.index()].camera = at;
    }

    fn build_room(&mut self, player: PlayerId, kind: RoomKind, at: MapCoord) -> bool {
        if self.rooms.contains_key(&(at.x, at.y)) || !self.pay(player, ROOM_COST) {
            return false;
        }
        self.rooms.insert((at.x, at.y), (player, kind));
        // a room slab shows up in the fingerprint as an object entity
        self.spawn(EntityClass::Object, Some(player), at);
        true
    }

    fn sell_room(&mut self, player: PlayerId, at: MapCoord) -> bool {
        match self.rooms.get(&(at.x, at.y)) {
            Some((owner, _)) if *owner == player => {
                self.rooms.shift_remove(&(at.x, at.y));
                self.players[player.index()].gold += ROOM_COST / 2;
                true
            }
            _ => false,
        }
    }

    fn place_trap(&mut self, player: PlayerId, _kind: TrapKind, at: MapCoord) -> bool {
        if !self.pay(player, TRAP_COST) {
            return false;
        }
        self.spawn(EntityClass::Trap, Some(player), at);
        true
    }

    fn place_door(&mut self, player: PlayerId, _kind: DoorKind, at: MapCoord) -> bool {
        if !self.pay(player, DOOR_COST) {
            return false;
        }
        self.spawn(EntityClass::Door, Some(player), at);
        true
    }

    fn cast_power(
        &mut self,
        player: PlayerId,
        kind: PowerKind,
        at: Option<MapCoord>,
        _target: Option<EntityId>,
        charge: u16,
    ) -> bool {
        let cost = POWER_COST * (1 + charge as u32);
        if !self.pay(player, cost) {
            return false;
        }
        if kind == PowerKind::CreateImp {
            match at {
                Some(at) => {
                    self.spawn(EntityClass::Creature, Some(player), at);
                }
                None => return false,
            }
        }
        self.last_cast = Some((player, kind, charge));
        true
    }

    fn slap(&mut self, player: PlayerId, target: EntityId) -> bool {
        match self.entities.get_mut(&target) {
            Some(e) if e.class == EntityClass::Creature && e.owner == Some(player) => {
                e.orientation = e.orientation.wrapping_add(1);
                true
            }
            _ => false,
        }
    }

    fn tag_dig(&mut self, _player: PlayerId, at: MapCoord) -> bool {
        let key = (at.x, at.y);
        if !self.dig_tags.shift_remove(&key) {
            self.dig_tags.insert(key);
        }
        true
    }

    fn hand_pickup(&mut self, player: PlayerId, at: MapCoord) -> bool {
        let found = self.entities.iter().find_map(|(id, e)| {
            (e.pos == at && e.owner == Some(player) && e.class == EntityClass::Creature)
                .then_some(*id)
        });
        match found {
            Some(id) => {
                self.entities.shift_remove(&id);
                self.players[player.index()].hand.push(id);
                true
            }
            None => false,
        }
    }

    fn hand_drop(&mut self, player: PlayerId, at: MapCoord) -> bool {
        match self.players[player.index()].hand.pop() {
            Some(id) => {
                self.entities.insert(
                    id,
                    MockEntity {
                        class: EntityClass::Creature,
                        owner: Some(player),
                        pos: at,
                        orientation: 0,
                        status: CreatureStatus::Ready,
                    },
                );
                true
            }
            None => false,
        }
    }

    fn creature_status(&self, entity: EntityId) -> CreatureStatus {
        match self.entities.get(&entity) {
            Some(e) if e.class == EntityClass::Creature => e.status,
            _ => CreatureStatus::Missing,
        }
    }

    fn steer_creature(&mut self, entity: EntityId, steering: Steering) -> bool {
        match self.entities.get_mut(&entity) {
            Some(e) => {
                e.pos.x = e.pos.x.saturating_add_signed(steering.strafe);
                e.pos.y = e.pos.y.saturating_add_signed(-steering.forward);
                true
            }
            None => false,
        }
    }

    fn set_creature_instance(&mut self, entity: EntityId, instance: u16) -> bool {
        if self.creature_status(entity) != CreatureStatus::Ready {
            return false;
        }
        let owner = self
            .players
            .iter_mut()
            .find(|p| p.possessed == Some(entity));
        match owner {
            Some(p) => {
                p.instance = instance as u32;
                true
            }
            None => false,
        }
    }

    fn begin_possession(&mut self, player: PlayerId, entity: EntityId) -> bool {
        if self.creature_status(entity) == CreatureStatus::Missing {
            return false;
        }
        let p = &mut self.players[player.index()];
        p.possessed = Some(entity);
        p.instance = 0;
        true
    }

    fn end_possession(&mut self, player: PlayerId, _entity: EntityId) -> bool {
        let p = &mut self.players[player.index()];
        p.possessed = None;
        p.instance = 0;
        true
    }

    fn hold_audience(&mut self, player: PlayerId) -> bool {
        self.pay(player, POWER_COST * 5)
    }

    fn use_special_box(&mut self, player: PlayerId, box_entity: EntityId) -> bool {
        match self.entities.get(&box_entity) {
            Some(e) if e.class == EntityClass::Object => {
                self.entities.shift_remove(&box_entity);
                self.players[player.index()].gold += 100;
                true
            }
            _ => false,
        }
    }

    fn transfer_creature(&mut self, _player: PlayerId, source: EntityId, dest: EntityId) -> bool {
        let target_pos = match self.entities.get(&dest) {
            Some(e) => e.pos,
            None => return false,
        };
        match self.entities.get_mut(&source) {
            Some(e) => {
                e.pos = target_pos;
                true
            }
            None => false,
        }
    }

    fn toggle_computer(&mut self, player: PlayerId) -> bool {
        let p = &mut self.players[player.index()];
        p.computer = !p.computer;
        true
    }

    fn cheat_reveal_map(&mut self, player: PlayerId) {
        self.players[player.index()].revealed = true;
    }

    fn cheat_all_free(&mut self, player: PlayerId) {
        self.players[player.index()].all_free = true;
    }
}
