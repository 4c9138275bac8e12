//! Kinematic-контроллер: gravity, ground check, интеграция velocity
//!
//! Архитектура:
//! - Rapier для коллизий (RigidBody::KinematicPositionBased)
//! - Custom velocity integration (не используем Rapier forces)
//! - Headless режим: velocity интегрируется напрямую в Transform
//!
//! Гарантия порядка: все gameplay-системы тика отрабатывают до
//! PhysicsSet::SyncBackend, физика интегрирует уже готовые velocity.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::PhysicsBody;
use crate::SimulationSet;

/// Kinematic контроллер компонент (gravity + ground state)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct KinematicBody {
    /// Сила гравитации (m/s²)
    pub gravity: f32,
    /// На опоре ли тело
    pub grounded: bool,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            grounded: false,
        }
    }
}

/// Система ground detection через простую Y-проверку
///
/// Город плоский (улицы на y=0): grounded если y <= 0.5.
pub fn ground_detection(mut query: Query<(&Transform, &mut KinematicBody)>) {
    for (transform, mut body) in query.iter_mut() {
        body.grounded = transform.translation.y <= 0.5;
    }
}

/// Система применения gravity к velocity
pub fn apply_gravity(
    mut query: Query<(&KinematicBody, &mut PhysicsBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (kinematic, mut body) in query.iter_mut() {
        if !kinematic.grounded {
            body.velocity.y += kinematic.gravity * delta;
        } else if body.velocity.y < 0.0 {
            // Опора гасит падение
            body.velocity.y = 0.0;
        }
    }
}

/// Система интеграции velocity → Transform (headless режим, без Rapier step)
///
/// Напрямую применяет PhysicsBody.velocity к Transform.translation.
pub fn integrate_velocity_to_transform(
    mut query: Query<(&PhysicsBody, &mut Transform), With<KinematicBody>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        transform.translation += body.velocity * delta;

        // Не проваливаемся под улицу
        if transform.translation.y < 0.0 {
            transform.translation.y = 0.0;
        }
    }
}

/// Система синхронизации velocity → Rapier
///
/// Rapier применяет velocity к KinematicPositionBased телам сам;
/// здесь только отдаём ему наш PhysicsBody.velocity.
pub fn sync_velocity_to_rapier(
    mut query: Query<(&PhysicsBody, &mut Velocity), With<KinematicBody>>,
) {
    for (body, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}

/// Plugin кинематики
///
/// Все системы в FixedUpdate, последним сетом тика — и строго ДО
/// rapier physics step.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                ground_detection,
                apply_gravity,
                integrate_velocity_to_transform,
                sync_velocity_to_rapier,
            )
                .chain()
                .in_set(SimulationSet::Physics)
                .before(PhysicsSet::SyncBackend),
        );
    }
}
