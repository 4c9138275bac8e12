//! Базовые компоненты сущностей: EntityKind, Health, Hitbox + spawn-хелперы

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::combat::{CivilianState, VehicleState};
use crate::components::physics::PhysicsBody;
use crate::physics::KinematicBody;

/// Тип сущности — закрытый набор, dispatch строго по тегу
///
/// Никаких проверок по mesh-иерархии: combat и pursuit различают
/// цели только этим компонентом.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum EntityKind {
    /// Гражданский пешеход
    Civilian,
    /// Транспорт (припаркованный или убегающий)
    Vehicle,
    /// Полицейский юнит преследования
    PursuitUnit,
    /// Игрок (offender для системы розыска)
    Player,
}

/// Маркер игрока — позиция этой entity и есть позиция offender'а
#[derive(Component, Debug, Default, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Сферический hitbox для ray-пиков
///
/// Радиус в метрах вокруг Transform.translation.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hitbox {
    pub radius: f32,
}

impl Default for Hitbox {
    fn default() -> Self {
        Self { radius: 0.9 }
    }
}

/// Статическая геометрия окружения (стены, столбы, фасады)
///
/// Блокирует выстрелы, урона не получает — попадание чисто декоративное.
#[derive(Component, Debug, Default, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Obstacle;

/// Маркер: сущность исключена из ray-пиков
///
/// Engine-слой вешает его на отключённую/непикаемую геометрию.
#[derive(Component, Debug, Default, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PickDisabled;

/// Spawn helper: игрок
pub fn spawn_player(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Player,
            EntityKind::Player,
            Health::new(100),
            Hitbox { radius: 0.6 },
            PhysicsBody::with_mass(80.0),
            KinematicBody::default(),
            // Rapier physics (tactical layer интегрирует)
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.4),
            Velocity::default(),
        ))
        .id()
}

/// Spawn helper: гражданский пешеход
pub fn spawn_civilian(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            EntityKind::Civilian,
            CivilianState::default(),
            Health::new(30),
            Hitbox { radius: 0.6 },
            PhysicsBody::with_mass(70.0),
            KinematicBody::default(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.4),
            Velocity::default(),
        ))
        .id()
}

/// Spawn helper: припаркованный транспорт
///
/// Без Health: корпус не разрушаем, попадания декоративны.
pub fn spawn_parked_vehicle(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            EntityKind::Vehicle,
            VehicleState::default(),
            Hitbox { radius: 2.2 },
            PhysicsBody::with_mass(1500.0),
            KinematicBody::default(),
            RigidBody::KinematicPositionBased,
            Collider::cuboid(2.0, 0.8, 1.0),
            Velocity::default(),
        ))
        .id()
}

/// Spawn helper: статическое препятствие (сфера)
pub fn spawn_obstacle(commands: &mut Commands, position: Vec3, radius: f32) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Obstacle,
            Hitbox { radius },
            RigidBody::Fixed,
            Collider::ball(radius),
        ))
        .id()
}
