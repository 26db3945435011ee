//! Adventure content loading.
//!
//! Adventures are JSON documents with top-level `rooms`, `items`, `barriers`
//! and `startingRoomId`. Loading resolves every id reference into a linked
//! [`World`] and refuses content that could strand the player: dangling
//! exits, unknown items or barriers, and rooms that cannot be reached from
//! the start.

use crate::world::{
    Barrier, BarrierId, Direction, Exit, Feature, Item, ItemId, Room, RoomId, World,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from loading adventure content. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid adventure JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No adventure named '{0}'")]
    UnknownAdventure(String),

    #[error("Starting room '{0}' does not exist")]
    MissingStartingRoom(String),

    #[error("Room '{0}' is defined more than once")]
    DuplicateRoom(String),

    #[error("Room '{room}' has an exit in unknown direction '{direction}'")]
    InvalidDirection { room: String, direction: String },

    #[error("Room '{room}' has more than one {direction} exit")]
    DuplicateExit { room: String, direction: String },

    #[error("Room '{room}' exit {direction} leads to unknown room '{destination}'")]
    DanglingExit {
        room: String,
        direction: String,
        destination: String,
    },

    #[error("Room '{room}' exit {direction} is gated by unknown barrier '{barrier}'")]
    UnknownBarrier {
        room: String,
        direction: String,
        barrier: String,
    },

    #[error("Room '{room}' contains unknown item '{item}'")]
    UnknownItem { room: String, item: String },

    #[error("Barrier '{barrier}' is unlocked by unknown item '{item}'")]
    UnknownUnlockItem { barrier: String, item: String },

    #[error("Item '{item}' is placed in both '{first}' and '{second}'")]
    DuplicateItemPlacement {
        item: String,
        first: String,
        second: String,
    },

    #[error("Rooms unreachable from the starting room: {}", .0.join(", "))]
    UnreachableRooms(Vec<String>),
}

// ============================================================================
// File format
// ============================================================================

/// An adventure exactly as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureFile {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub starting_room_id: String,
    pub rooms: Vec<RoomSpec>,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    #[serde(default)]
    pub barriers: Vec<BarrierSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exits: BTreeMap<String, ExitSpec>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// An exit is either a bare room id or an object naming a barrier.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExitSpec {
    To(String),
    Detailed {
        destination: String,
        #[serde(default)]
        barrier: Option<String>,
    },
}

impl ExitSpec {
    fn parts(&self) -> (&str, Option<&str>) {
        match self {
            ExitSpec::To(destination) => (destination, None),
            ExitSpec::Detailed {
                destination,
                barrier,
            } => (destination, barrier.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarrierSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub blocked_message: String,
    pub unlock_item_id: String,
    pub unlock_message: String,
}

impl AdventureFile {
    /// Resolve references and validate, producing a playable world.
    pub fn into_world(self, fallback_title: &str) -> Result<World, ContentError> {
        let items: HashMap<&str, &ItemSpec> =
            self.items.iter().map(|i| (i.id.as_str(), i)).collect();

        let mut room_ids = HashSet::new();
        for room in &self.rooms {
            if !room_ids.insert(room.id.as_str()) {
                return Err(ContentError::DuplicateRoom(room.id.clone()));
            }
        }

        if !room_ids.contains(self.starting_room_id.as_str()) {
            return Err(ContentError::MissingStartingRoom(
                self.starting_room_id.clone(),
            ));
        }

        let mut barriers = BTreeMap::new();
        for spec in &self.barriers {
            if !items.contains_key(spec.unlock_item_id.as_str()) {
                return Err(ContentError::UnknownUnlockItem {
                    barrier: spec.id.clone(),
                    item: spec.unlock_item_id.clone(),
                });
            }
            barriers.insert(
                BarrierId::new(&spec.id),
                Barrier {
                    id: BarrierId::new(&spec.id),
                    name: spec.name.clone(),
                    description: spec.description.clone(),
                    blocked_message: spec.blocked_message.clone(),
                    unlock_item: ItemId::new(&spec.unlock_item_id),
                    unlock_message: spec.unlock_message.clone(),
                    unlocked: false,
                },
            );
        }

        let mut placements: HashMap<&str, &str> = HashMap::new();
        let mut rooms = BTreeMap::new();

        for spec in &self.rooms {
            let mut room = Room::new(&spec.id, &spec.name).with_description(&spec.description);

            for (direction_name, exit_spec) in &spec.exits {
                let direction = Direction::from_name(direction_name).ok_or_else(|| {
                    ContentError::InvalidDirection {
                        room: spec.id.clone(),
                        direction: direction_name.clone(),
                    }
                })?;

                let (destination, barrier) = exit_spec.parts();
                if !room_ids.contains(destination) {
                    return Err(ContentError::DanglingExit {
                        room: spec.id.clone(),
                        direction: direction.name().to_string(),
                        destination: destination.to_string(),
                    });
                }

                let mut exit = Exit::to(destination);
                if let Some(barrier) = barrier {
                    if !barriers.contains_key(&BarrierId::new(barrier)) {
                        return Err(ContentError::UnknownBarrier {
                            room: spec.id.clone(),
                            direction: direction.name().to_string(),
                            barrier: barrier.to_string(),
                        });
                    }
                    exit = exit.gated_by(barrier);
                }
                if room.exits.insert(direction, exit).is_some() {
                    return Err(ContentError::DuplicateExit {
                        room: spec.id.clone(),
                        direction: direction.name().to_string(),
                    });
                }
            }

            for item_id in &spec.items {
                let item = items
                    .get(item_id.as_str())
                    .ok_or_else(|| ContentError::UnknownItem {
                        room: spec.id.clone(),
                        item: item_id.clone(),
                    })?;

                if let Some(first) = placements.insert(item_id.as_str(), spec.id.as_str()) {
                    return Err(ContentError::DuplicateItemPlacement {
                        item: item_id.clone(),
                        first: first.to_string(),
                        second: spec.id.clone(),
                    });
                }
                room.add_item(Item::new(&item.id, &item.name, &item.description));
            }

            room.features = spec.features.clone();
            rooms.insert(RoomId::new(&spec.id), room);
        }

        let starting_room = RoomId::new(&self.starting_room_id);
        let orphans = unreachable_rooms(&rooms, &starting_room);
        if !orphans.is_empty() {
            return Err(ContentError::UnreachableRooms(
                orphans.into_iter().map(|id| id.0).collect(),
            ));
        }

        for item in &self.items {
            if !placements.contains_key(item.id.as_str()) {
                tracing::debug!(item = %item.id, "item is not placed in any room");
            }
        }

        Ok(World {
            title: self
                .title
                .unwrap_or_else(|| fallback_title.to_string()),
            rooms,
            barriers,
            starting_room,
        })
    }
}

/// Breadth-first search over exits from `start`; returns every room id
/// never visited, in id order. Barriers do not block reachability since
/// every barrier can be unlocked.
pub fn unreachable_rooms(rooms: &BTreeMap<RoomId, Room>, start: &RoomId) -> Vec<RoomId> {
    let mut visited: HashSet<&RoomId> = HashSet::new();
    let mut queue: VecDeque<&RoomId> = VecDeque::new();

    if rooms.contains_key(start) {
        visited.insert(start);
        queue.push_back(start);
    }

    while let Some(id) = queue.pop_front() {
        let Some(room) = rooms.get(id) else {
            continue;
        };
        for exit in room.exits.values() {
            if rooms.contains_key(&exit.destination) && visited.insert(&exit.destination) {
                queue.push_back(&exit.destination);
            }
        }
    }

    rooms
        .keys()
        .filter(|id| !visited.contains(id))
        .cloned()
        .collect()
}

/// Parse and validate an adventure from a JSON string.
pub fn parse_adventure(json: &str, fallback_title: &str) -> Result<World, ContentError> {
    let file: AdventureFile = serde_json::from_str(json)?;
    file.into_world(fallback_title)
}

/// Load and validate an adventure file.
pub async fn load_adventure_file(path: impl AsRef<Path>) -> Result<World, ContentError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    parse_adventure(&content, &fallback)
}

// ============================================================================
// Adventure Library
// ============================================================================

/// Adventure ids are file stems made of ASCII letters, digits, `-` and `_`.
fn is_adventure_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A listing entry for an adventure on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdventureSummary {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
}

/// A directory of `<id>.json` adventure files.
#[derive(Debug, Clone)]
pub struct AdventureLibrary {
    root: PathBuf,
}

impl AdventureLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// List adventures by peeking at their title and summary.
    ///
    /// Files that cannot be read or parsed are skipped with a warning so one
    /// broken file does not hide the rest; `load` reports the real error.
    pub async fn list(&self) -> Result<Vec<AdventureSummary>, ContentError> {
        #[derive(Deserialize)]
        struct Partial {
            #[serde(default)]
            title: Option<String>,
            #[serde(default)]
            summary: Option<String>,
        }

        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|source| ContentError::Io {
                path: self.root.display().to_string(),
                source,
            })?;

        let mut adventures = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => {
                    return Err(ContentError::Io {
                        path: self.root.display().to_string(),
                        source,
                    })
                }
            };

            let path = entry.path();
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            let Some(id) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            if !is_adventure_id(&id) {
                tracing::warn!(path = %path.display(), "skipping adventure with unusable file name");
                continue;
            }

            let partial = match fs::read_to_string(&path).await {
                Ok(content) => serde_json::from_str::<Partial>(&content),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable adventure");
                    continue;
                }
            };
            match partial {
                Ok(partial) => adventures.push(AdventureSummary {
                    title: partial.title.unwrap_or_else(|| id.clone()),
                    summary: partial.summary,
                    id,
                }),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping malformed adventure");
                }
            }
        }

        adventures.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(adventures)
    }

    /// Load an adventure by id.
    pub async fn load(&self, id: &str) -> Result<World, ContentError> {
        if !is_adventure_id(id) {
            return Err(ContentError::UnknownAdventure(id.to_string()));
        }

        let path = self.root.join(format!("{id}.json"));
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(ContentError::UnknownAdventure(id.to_string()));
        }

        let world = load_adventure_file(&path).await?;
        tracing::info!(
            adventure = id,
            rooms = world.rooms.len(),
            barriers = world.barriers.len(),
            "loaded adventure"
        );
        Ok(world)
    }
}
