//! Combat system — стрельба, урон, реакция города
//!
//! ECS ответственность:
//! - Разрешение атак: профиль оружия → ray-пик → урон → crime reports
//! - Паника пешеходов / бегство машин вокруг стрельбы
//! - Транзиентные отметины попаданий (age-sweep)
//!
//! Engine (tactical layer) ответственность:
//! - Визуальные эффекты выстрела, decals по ImpactMarker
//! - Триггер атаки: слой ввода сам выдерживает fire_rate оружия
//!   и шлёт AttackEvent

use bevy::prelude::*;

pub mod attack;
pub mod raycast;
pub mod reactions;
pub mod weapons;

// Re-export основных типов
pub use attack::{
    despawn_after_sweep, resolve_attacks, AttackEvent, DamageDealt, DespawnAfter, EntityDied,
    ImpactMarker, GUNFIRE_SEVERITY, KILL_SEVERITY,
};
pub use raycast::{first_hit, ray_sphere_intersection, HitKind, RayHit, RayTarget};
pub use reactions::{
    civilian_flee_movement, vehicle_flee_movement, CivilianState, VehicleState, PANIC_DURATION,
    PANIC_RADIUS, VEHICLE_FLEE_DURATION, VEHICLE_FLEE_RADIUS,
};
pub use weapons::WeaponProfile;

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок выполнения:
/// 1. resolve_attacks — разрешение атак этого тика
/// 2. civilian_flee_movement / vehicle_flee_movement — движение паники
/// 3. despawn_after_sweep — чистка транзиентов
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AttackEvent>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        // Регистрация систем
        app.add_systems(
            FixedUpdate,
            (
                resolve_attacks,
                civilian_flee_movement,
                vehicle_flee_movement,
                despawn_after_sweep,
            )
                .chain()
                .in_set(SimulationSet::Combat),
        );
    }
}
