//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: живые существа (Creature, CreatureKind, Health)
//! - world: блоки мира (BlockGrid, BlockKind, Face)

pub mod actor;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use world::*;
