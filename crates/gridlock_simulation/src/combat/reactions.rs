//! Реакция толпы на стрельбу: паника пешеходов, бегство машин
//!
//! Паника распространяется безусловно на каждую атаку (попадание не
//! требуется — пугает сам выстрел). Движение — через общий PhysicsBody
//! pipeline, таймер истёк → сущность успокаивается и останавливается.

use bevy::prelude::*;

use crate::components::PhysicsBody;

/// Радиус паники пешеходов вокруг точки атаки (метры)
pub const PANIC_RADIUS: f32 = 30.0;
/// Радиус бегства припаркованных машин (меньше — водителей в салоне пугает
/// только совсем близкая стрельба)
pub const VEHICLE_FLEE_RADIUS: f32 = 25.0;

/// Сколько секунд пешеход бежит, прежде чем успокоится
pub const PANIC_DURATION: f32 = 8.0;
/// Сколько секунд машина уезжает, прежде чем снова припаркуется
pub const VEHICLE_FLEE_DURATION: f32 = 6.0;

const CIVILIAN_FLEE_SPEED: f32 = 6.0;
const VEHICLE_FLEE_SPEED: f32 = 14.0;

/// Состояние пешехода
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum CivilianState {
    /// Спокоен, занимается своими делами
    Calm,
    /// Паника: бежит от точки атаки
    Panicked {
        flee_from: Vec3,
        /// Остаток паники (секунды)
        timer: f32,
    },
}

impl Default for CivilianState {
    fn default() -> Self {
        Self::Calm
    }
}

impl CivilianState {
    pub fn panic_from(origin: Vec3) -> Self {
        Self::Panicked {
            flee_from: origin,
            timer: PANIC_DURATION,
        }
    }

    pub fn is_panicked(&self) -> bool {
        matches!(self, Self::Panicked { .. })
    }
}

/// Состояние транспорта
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum VehicleState {
    /// Припаркован / стоит без дела
    Parked,
    /// Уезжает от точки атаки
    Fleeing { from: Vec3, timer: f32 },
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::Parked
    }
}

impl VehicleState {
    pub fn flee_from(origin: Vec3) -> Self {
        Self::Fleeing {
            from: origin,
            timer: VEHICLE_FLEE_DURATION,
        }
    }

    pub fn is_fleeing(&self) -> bool {
        matches!(self, Self::Fleeing { .. })
    }
}

/// Горизонтальное направление «прочь от точки»; на нулевой дистанции
/// направления нет — возвращаем None, сущность стоит
fn away_from(position: Vec3, threat: Vec3) -> Option<Vec3> {
    let away = Vec3::new(position.x - threat.x, 0.0, position.z - threat.z);
    let direction = away.normalize_or_zero();
    (direction != Vec3::ZERO).then_some(direction)
}

/// Система: движение паникующих пешеходов + остывание паники
pub fn civilian_flee_movement(
    mut civilians: Query<(&Transform, &mut CivilianState, &mut PhysicsBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (transform, mut state, mut body) in civilians.iter_mut() {
        let CivilianState::Panicked { flee_from, timer } = *state else {
            continue;
        };

        let remaining = timer - delta;
        if remaining <= 0.0 {
            *state = CivilianState::Calm;
            body.velocity.x = 0.0;
            body.velocity.z = 0.0;
            continue;
        }

        if let Some(direction) = away_from(transform.translation, flee_from) {
            body.velocity.x = direction.x * CIVILIAN_FLEE_SPEED;
            body.velocity.z = direction.z * CIVILIAN_FLEE_SPEED;
        }
        *state = CivilianState::Panicked {
            flee_from,
            timer: remaining,
        };
    }
}

/// Система: движение уезжающих машин + возврат к парковке
pub fn vehicle_flee_movement(
    mut vehicles: Query<(&Transform, &mut VehicleState, &mut PhysicsBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (transform, mut state, mut body) in vehicles.iter_mut() {
        let VehicleState::Fleeing { from, timer } = *state else {
            continue;
        };

        let remaining = timer - delta;
        if remaining <= 0.0 {
            *state = VehicleState::Parked;
            body.velocity.x = 0.0;
            body.velocity.z = 0.0;
            continue;
        }

        if let Some(direction) = away_from(transform.translation, from) {
            body.velocity.x = direction.x * VEHICLE_FLEE_SPEED;
            body.velocity.z = direction.z * VEHICLE_FLEE_SPEED;
        }
        *state = VehicleState::Fleeing {
            from,
            timer: remaining,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_away_from_is_horizontal() {
        let direction = away_from(Vec3::new(10.0, 3.0, 0.0), Vec3::ZERO).unwrap();
        assert_eq!(direction, Vec3::X);
        assert_eq!(direction.y, 0.0);
    }

    #[test]
    fn test_away_from_same_point() {
        assert!(away_from(Vec3::new(1.0, 5.0, 2.0), Vec3::new(1.0, 0.0, 2.0)).is_none());
    }

    #[test]
    fn test_panic_state_carries_origin() {
        let origin = Vec3::new(4.0, 0.0, -2.0);
        let state = CivilianState::panic_from(origin);
        assert!(state.is_panicked());
        let CivilianState::Panicked { flee_from, timer } = state else {
            unreachable!();
        };
        assert_eq!(flee_from, origin);
        assert_eq!(timer, PANIC_DURATION);
    }
}
