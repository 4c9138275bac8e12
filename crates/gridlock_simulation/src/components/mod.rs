//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: тип сущности, здоровье, hitbox, spawn-хелперы
//! - physics: PhysicsBody (value-struct, никакого aliasing с engine transform)
//!
//! Доменные компоненты (PursuitState, CivilianState и т.д.) живут рядом
//! со своими системами в pursuit/ и combat/.

pub mod actor;
pub mod physics;

// Re-exports для удобного импорта
pub use actor::*;
pub use physics::*;
