//! Sight-трекинг offender'а
//!
//! Видимость глобальная: достаточно ОДНОГО юнита в радиусе (логическое OR,
//! не ближайший). Пересчитывается каждый тик, без мемоизации.

use bevy::prelude::*;

use crate::components::Player;
use crate::pursuit::{PursuitState, PursuitTuning};

/// Resource: виден ли offender хоть одному юниту флота в этом тике
#[derive(Resource, Debug, Default, Clone)]
pub struct OffenderSight {
    pub visible: bool,
}

/// Чистый предикат видимости: есть ли юнит ближе sight_radius к offender'у
pub fn offender_in_sight<I>(offender: Vec3, agent_positions: I, sight_radius: f32) -> bool
where
    I: IntoIterator<Item = Vec3>,
{
    agent_positions
        .into_iter()
        .any(|position| position.distance(offender) < sight_radius)
}

/// Система: обновление OffenderSight из позиций флота
pub fn track_offender_sight(
    mut sight: ResMut<OffenderSight>,
    player: Query<&Transform, With<Player>>,
    agents: Query<&Transform, (With<PursuitState>, Without<Player>)>,
    tuning: Res<PursuitTuning>,
) {
    let Ok(player_transform) = player.single() else {
        // Offender'а нет в мире (respawn) — никто его не видит
        sight.visible = false;
        return;
    };

    sight.visible = offender_in_sight(
        player_transform.translation,
        agents.iter().map(|transform| transform.translation),
        tuning.sight_radius,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_agent_in_radius_suffices() {
        let offender = Vec3::ZERO;
        let agents = vec![
            Vec3::new(500.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 79.0), // внутри радиуса 80
            Vec3::new(-300.0, 0.0, 120.0),
        ];

        assert!(offender_in_sight(offender, agents, 80.0));
    }

    #[test]
    fn test_no_agents_means_unseen() {
        assert!(!offender_in_sight(Vec3::ZERO, std::iter::empty(), 80.0));
    }

    #[test]
    fn test_boundary_is_exclusive() {
        let agents = vec![Vec3::new(80.0, 0.0, 0.0)];
        assert!(!offender_in_sight(Vec3::ZERO, agents.clone(), 80.0));

        let agents = vec![Vec3::new(79.99, 0.0, 0.0)];
        assert!(offender_in_sight(Vec3::ZERO, agents, 80.0));
    }
}
