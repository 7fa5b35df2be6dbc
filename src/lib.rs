//! # Tile Platformer
//!
//! Deterministic fixed-step simulation core for a 2D tile platformer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TILE PLATFORMER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q48.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - 2D vector with fixed-point                │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── level.rs    - Level config, scaling, world loading      │
//! │  ├── grid.rs     - Tile grid and tile coordinates            │
//! │  ├── state.rs    - Bodies, entities, world                   │
//! │  ├── tick.rs     - Fixed-step scheduler and replay           │
//! │  ├── physics.rs  - Kinematic integrator                      │
//! │  ├── collision.rs- Tile resolution and overlap               │
//! │  ├── rules.rs    - Stomp, punish, treasure, patrol           │
//! │  └── snapshot.rs - Render view                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Floats are used only while loading a level (scaling level units into
//! viewport units). Every step after that is integer arithmetic over
//! vectors walked in load order, so the same level, viewport and per-step
//! input sequence produce **identical results** on any platform.
//!
//! ## Example
//!
//! ```
//! use tile_platformer::{InputFrame, LevelConfig, Viewport, World};
//!
//! let level = LevelConfig::from_json_str(r#"{
//!     "grid": { "width": 3, "height": 2 },
//!     "tile": { "width": 32, "height": 32 },
//!     "tiles": [0, 0, 0, 1, 1, 1],
//!     "entities": [{ "type": "player", "x": 32, "y": 0, "width": 32, "height": 32 }]
//! }"#).unwrap();
//!
//! let mut world = World::load(&level, Viewport::new(96.0, 64.0)).unwrap();
//! let steps = world.step(0.05, InputFrame::held(false, false, true));
//! assert_eq!(steps, 2);
//! assert_eq!(world.snapshot().entities.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use core::vec2::FixedVec2;
pub use core::hash::StateHash;
pub use game::level::{LevelConfig, LoadError, Viewport};
pub use game::input::{InputFrame, InputRecording};
pub use game::state::{World, Direction, EntityId, EntityKind};
pub use game::events::{GameEvent, GameEventData};
pub use game::snapshot::{Snapshot, EntityView};
pub use game::tick::replay;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = game::tuning::FPS;
