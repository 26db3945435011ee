//! Game world types.
//!
//! Contains the room graph (rooms, exits, barriers), the items that move
//! between rooms and the player's pack, the player character, and the
//! `GameState` aggregate that every handler receives.

use crate::dice::DieType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Identifier of a room, as written in adventure content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a barrier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarrierId(pub String);

impl BarrierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BarrierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a play session. Save documents are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(SessionId)
    }
}

/// Case-insensitive comparison used for every player-supplied noun.
///
/// The parser drops a leading article from what the player types, so a
/// display name like "The Amulet" is also compared without its article.
pub fn names_match(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a == b || without_article(&a) == without_article(&b)
}

fn without_article(name: &str) -> &str {
    ["the ", "a ", "an "]
        .iter()
        .find_map(|article| name.strip_prefix(article))
        .unwrap_or(name)
}

// ============================================================================
// Directions
// ============================================================================

/// The six compass/vertical directions an exit can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Direction::North => "n",
            Direction::South => "s",
            Direction::East => "e",
            Direction::West => "w",
            Direction::Up => "u",
            Direction::Down => "d",
        }
    }

    pub fn all() -> [Direction; 6] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::Up,
            Direction::Down,
        ]
    }

    /// Strict lookup by full name, as required in content files.
    pub fn from_name(name: &str) -> Option<Direction> {
        Direction::all()
            .into_iter()
            .find(|d| names_match(d.name(), name))
    }

    /// Lenient lookup accepting full names and one-letter abbreviations.
    pub fn from_word(word: &str) -> Option<Direction> {
        Direction::from_name(word).or_else(|| {
            Direction::all()
                .into_iter()
                .find(|d| names_match(d.abbreviation(), word))
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Items, Features, Barriers
// ============================================================================

/// A collectible object. Items move between rooms and the player's pack
/// by value; exactly one copy of each exists in a world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            description: description.into(),
        }
    }

    /// Whether a player-supplied noun refers to this item (name or id).
    pub fn matches(&self, query: &str) -> bool {
        names_match(&self.name, query) || names_match(self.id.as_str(), query)
    }
}

/// Room scenery: inspectable, never collectible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Feature {
    pub fn matches(&self, query: &str) -> bool {
        names_match(&self.name, query) || self.keywords.iter().any(|k| names_match(k, query))
    }
}

/// An obstacle on an exit that stays locked until the right item is used on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barrier {
    pub id: BarrierId,
    pub name: String,
    pub description: String,
    pub blocked_message: String,
    pub unlock_item: ItemId,
    pub unlock_message: String,
    #[serde(default)]
    pub unlocked: bool,
}

impl Barrier {
    pub fn is_locked(&self) -> bool {
        !self.unlocked
    }

    /// Unlock the barrier. There is no way back.
    pub fn unlock(&mut self) {
        self.unlocked = true;
    }

    pub fn matches(&self, query: &str) -> bool {
        names_match(&self.name, query) || names_match(self.id.as_str(), query)
    }
}

// ============================================================================
// Rooms
// ============================================================================

/// A directed edge to another room, optionally gated by a barrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub destination: RoomId,
    #[serde(default)]
    pub barrier: Option<BarrierId>,
}

impl Exit {
    pub fn to(destination: impl Into<String>) -> Self {
        Self {
            destination: RoomId::new(destination),
            barrier: None,
        }
    }

    pub fn gated_by(mut self, barrier: impl Into<String>) -> Self {
        self.barrier = Some(BarrierId::new(barrier));
        self
    }
}

/// A location in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub description: String,
    pub exits: BTreeMap<Direction, Exit>,
    /// Insertion order is display order.
    pub items: Vec<Item>,
    pub features: Vec<Feature>,
}

impl Room {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: RoomId::new(id),
            name: name.into(),
            description: String::new(),
            exits: BTreeMap::new(),
            items: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_exit(mut self, direction: Direction, exit: Exit) -> Self {
        self.exits.insert(direction, exit);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn exit(&self, direction: Direction) -> Option<&Exit> {
        self.exits.get(&direction)
    }

    /// Exit direction names in alphabetical order.
    pub fn exit_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.exits.keys().map(|d| d.name()).collect();
        names.sort_unstable();
        names
    }

    pub fn find_item(&self, query: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.matches(query))
    }

    /// Remove the first item matching `query` and hand it over.
    pub fn remove_item(&mut self, query: &str) -> Option<Item> {
        let index = self.items.iter().position(|i| i.matches(query))?;
        Some(self.items.remove(index))
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn find_feature(&self, query: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.matches(query))
    }
}

/// The complete room graph of one adventure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub title: String,
    pub rooms: BTreeMap<RoomId, Room>,
    pub barriers: BTreeMap<BarrierId, Barrier>,
    pub starting_room: RoomId,
}

impl World {
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn room_mut(&mut self, id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id)
    }

    pub fn barrier(&self, id: &BarrierId) -> Option<&Barrier> {
        self.barriers.get(id)
    }

    pub fn barrier_mut(&mut self, id: &BarrierId) -> Option<&mut Barrier> {
        self.barriers.get_mut(id)
    }
}

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ability scores container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        // Floor division: 8-9 = -1, 10-11 = 0, 12-13 = +1
        (i32::from(self.get(ability)) - 10).div_euclid(2)
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Character
// ============================================================================

/// Hit point tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub maximum: i32,
}

impl HitPoints {
    pub fn new(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn ratio(&self) -> f32 {
        if self.maximum <= 0 {
            return 0.0;
        }
        self.current.max(0) as f32 / self.maximum as f32
    }
}

/// Character classes offered at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Rogue,
}

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Rogue => "Rogue",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CharacterClass::Rogue => "A nimble opener of locks and finder of hidden things",
        }
    }

    /// The die rolled once for starting hit points.
    pub fn hit_die(&self) -> DieType {
        match self {
            CharacterClass::Rogue => DieType::D8,
        }
    }

    pub fn all() -> &'static [CharacterClass] {
        &[CharacterClass::Rogue]
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Playable races.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Halfling,
}

impl Race {
    pub fn name(&self) -> &'static str {
        match self {
            Race::Human => "Human",
            Race::Elf => "Elf",
            Race::Dwarf => "Dwarf",
            Race::Halfling => "Halfling",
        }
    }

    pub fn all() -> &'static [Race] {
        &[Race::Human, Race::Elf, Race::Dwarf, Race::Halfling]
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A finished character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub race: Race,
    pub class: CharacterClass,
    pub level: u8,
    pub experience: u32,
    pub ability_scores: AbilityScores,
    pub hit_points: HitPoints,
}

/// The character in play: sheet, position and pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub character: Character,
    pub location: RoomId,
    pub inventory: Vec<Item>,
}

impl Player {
    pub fn new(character: Character, location: RoomId) -> Self {
        Self {
            character,
            location,
            inventory: Vec::new(),
        }
    }

    pub fn find_item(&self, query: &str) -> Option<&Item> {
        self.inventory.iter().find(|i| i.matches(query))
    }

    pub fn remove_item(&mut self, query: &str) -> Option<Item> {
        let index = self.inventory.iter().position(|i| i.matches(query))?;
        Some(self.inventory.remove(index))
    }

    pub fn inventory_names(&self) -> Vec<String> {
        self.inventory.iter().map(|i| i.name.clone()).collect()
    }
}

// ============================================================================
// Game State
// ============================================================================

/// Everything a handler may read or mutate for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub session_id: SessionId,
    pub adventure_id: String,
    pub world: World,
    pub player: Player,
}

impl GameState {
    /// Start a fresh session with the player standing in the starting room.
    pub fn new(adventure_id: impl Into<String>, world: World, character: Character) -> Self {
        let location = world.starting_room.clone();
        Self {
            session_id: SessionId::new(),
            adventure_id: adventure_id.into(),
            world,
            player: Player::new(character, location),
        }
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.world.room(&self.player.location)
    }
}
