//! Game Logic Module
//!
//! All platformer simulation code. 100% deterministic after load.
//!
//! ## Module Structure
//!
//! - `level`: Level configuration, loading and scaling
//! - `tuning`: Movement constants and per-entity tuning
//! - `grid`: Tile grid and tile-coordinate math
//! - `state`: Bodies, entities and the world
//! - `input`: Per-step input flags and input recordings
//! - `tick`: Fixed-step scheduler and replay
//! - `physics`: Kinematic integrator
//! - `collision`: Tile resolution and entity overlap
//! - `rules`: Stomp/punish, treasure pickup, monster patrol
//! - `events`: Game events for hosts and replay verification
//! - `snapshot`: Read-only render view
//! - `palette`: Display colors

pub mod level;
pub mod tuning;
pub mod grid;
pub mod state;
pub mod input;
pub mod tick;
pub mod physics;
pub mod collision;
pub mod rules;
pub mod events;
pub mod snapshot;
pub mod palette;

// Re-export key types
pub use level::{LevelConfig, LoadError, Viewport};
pub use state::{World, Player, Monster, Treasure, Body, Direction, EntityId, EntityKind};
pub use input::{InputFrame, InputRecording};
pub use tick::{replay, STEP};
pub use events::{GameEvent, GameEventData};
pub use snapshot::{Snapshot, EntityView};
