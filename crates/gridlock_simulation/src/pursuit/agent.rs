//! FSM юнита преследования: Patrol / Chase / Search
//!
//! Переходы оцениваются каждый тик в фиксированном порядке приоритетов;
//! никакого терминального состояния — юнит живёт пока флот его не снимет.

use bevy::prelude::*;
use rand::Rng;

use crate::components::Player;
use crate::pursuit::PursuitTuning;
use crate::wanted::CrimeLedger;
use crate::DeterministicRng;

/// Состояние юнита преследования
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum PursuitState {
    /// Patrol — розыск закрыт, катаемся по случайным точкам
    Patrol {
        /// Текущая точка патруля (None → будет сгенерирована)
        target: Option<Vec3>,
    },

    /// Chase — offender рядом, цель = его живая позиция
    /// (перецеливание каждый тик, не снапшот)
    Chase,

    /// Search — едем к последней известной позиции
    Search {
        /// Фиксируется при входе в состояние; свежие sighting'и других
        /// юнитов цель НЕ обновляют (staggered pursuit)
        target: Vec3,
    },
}

impl Default for PursuitState {
    fn default() -> Self {
        Self::Patrol { target: None }
    }
}

impl PursuitState {
    /// Короткая метка состояния (minimap, логи)
    pub fn label(&self) -> &'static str {
        match self {
            PursuitState::Patrol { .. } => "patrol",
            PursuitState::Chase => "chase",
            PursuitState::Search { .. } => "search",
        }
    }
}

/// Чистая функция перехода — порядок правил фиксирован:
/// 1. уровень 0 → Patrol (перебрасываем точку у цели или без неё)
/// 2. offender ближе chase_radius → Chase
/// 3. есть last known position → Search (цель замораживается при входе)
/// 4. иначе состояние не меняется (движения в этом тике не будет)
pub fn next_state(
    current: &PursuitState,
    position: Vec3,
    wanted_level: u8,
    offender: Option<Vec3>,
    last_known: Option<Vec3>,
    tuning: &PursuitTuning,
    rng: &mut impl Rng,
) -> PursuitState {
    if wanted_level == 0 {
        let target = match current {
            PursuitState::Patrol { target: Some(t) }
                if position.distance(*t) > tuning.patrol_reroll_distance =>
            {
                *t
            }
            _ => roll_patrol_target(position, tuning, rng),
        };
        return PursuitState::Patrol {
            target: Some(target),
        };
    }

    if let Some(offender) = offender {
        if position.distance(offender) < tuning.chase_radius {
            return PursuitState::Chase;
        }
    }

    if let Some(last_known) = last_known {
        if let PursuitState::Search { target } = current {
            // Уже ищем — цель не перечитываем
            return PursuitState::Search { target: *target };
        }
        return PursuitState::Search { target: last_known };
    }

    current.clone()
}

/// Случайная точка патруля: 30–80 метров от текущей позиции
fn roll_patrol_target(position: Vec3, tuning: &PursuitTuning, rng: &mut impl Rng) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let distance = rng.gen_range(tuning.patrol_min_distance..tuning.patrol_max_distance);
    position + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Система: FSM transitions для всех юнитов флота
pub fn pursuit_fsm_transitions(
    mut agents: Query<(&Transform, &mut PursuitState)>,
    player: Query<&Transform, (With<Player>, Without<PursuitState>)>,
    wanted: Res<CrimeLedger>,
    tuning: Res<PursuitTuning>,
    mut rng: ResMut<DeterministicRng>,
) {
    let offender = player.single().ok().map(|t| t.translation);
    let last_known = wanted.last_known_position();
    let level = wanted.level();

    for (transform, mut state) in agents.iter_mut() {
        let next = next_state(
            &state,
            transform.translation,
            level,
            offender,
            last_known,
            &tuning,
            &mut rng.rng,
        );
        if *state != next {
            *state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn tuning() -> PursuitTuning {
        PursuitTuning::default()
    }

    #[test]
    fn test_zero_wanted_forces_patrol_even_near_offender() {
        let offender = Some(Vec3::new(3.0, 0.0, 0.0)); // вплотную
        let state = next_state(
            &PursuitState::Chase,
            Vec3::ZERO,
            0,
            offender,
            Some(Vec3::ZERO),
            &tuning(),
            &mut rng(),
        );
        assert!(matches!(state, PursuitState::Patrol { target: Some(_) }));
    }

    #[test]
    fn test_patrol_target_rolled_within_band() {
        let t = tuning();
        let state = next_state(
            &PursuitState::Patrol { target: None },
            Vec3::ZERO,
            0,
            None,
            None,
            &t,
            &mut rng(),
        );
        let PursuitState::Patrol { target: Some(target) } = state else {
            panic!("expected patrol target");
        };
        let distance = target.distance(Vec3::ZERO);
        assert!(distance >= t.patrol_min_distance && distance <= t.patrol_max_distance);
    }

    #[test]
    fn test_patrol_target_kept_until_reached() {
        let t = tuning();
        let far_target = Vec3::new(40.0, 0.0, 0.0);
        let state = next_state(
            &PursuitState::Patrol {
                target: Some(far_target),
            },
            Vec3::ZERO,
            0,
            None,
            None,
            &t,
            &mut rng(),
        );
        assert_eq!(
            state,
            PursuitState::Patrol {
                target: Some(far_target)
            }
        );

        // У цели (< 5m) — точка перебрасывается
        let state = next_state(
            &PursuitState::Patrol {
                target: Some(far_target),
            },
            Vec3::new(37.0, 0.0, 0.0),
            0,
            None,
            None,
            &t,
            &mut rng(),
        );
        let PursuitState::Patrol { target: Some(new_target) } = state else {
            panic!("expected rerolled patrol target");
        };
        assert_ne!(new_target, far_target);
    }

    #[test]
    fn test_chase_when_offender_close() {
        let state = next_state(
            &PursuitState::default(),
            Vec3::ZERO,
            2,
            Some(Vec3::new(99.0, 0.0, 0.0)),
            Some(Vec3::ZERO),
            &tuning(),
            &mut rng(),
        );
        assert_eq!(state, PursuitState::Chase);
    }

    #[test]
    fn test_search_when_offender_far() {
        let last_known = Vec3::new(500.0, 0.0, 500.0);
        let state = next_state(
            &PursuitState::Chase,
            Vec3::ZERO,
            2,
            Some(Vec3::new(200.0, 0.0, 0.0)), // дальше chase_radius
            Some(last_known),
            &tuning(),
            &mut rng(),
        );
        assert_eq!(state, PursuitState::Search { target: last_known });
    }

    #[test]
    fn test_search_target_frozen_mid_search() {
        let original = Vec3::new(100.0, 0.0, 0.0);
        let fresher = Vec3::new(-300.0, 0.0, 0.0);
        // Ledger уже знает свежую позицию, но юнит в Search держит старую
        let state = next_state(
            &PursuitState::Search { target: original },
            Vec3::ZERO,
            2,
            Some(Vec3::new(999.0, 0.0, 0.0)),
            Some(fresher),
            &tuning(),
            &mut rng(),
        );
        assert_eq!(state, PursuitState::Search { target: original });
    }

    #[test]
    fn test_no_position_known_keeps_state() {
        let current = PursuitState::Chase;
        let state = next_state(
            &current,
            Vec3::ZERO,
            2,
            None, // offender'а нет в мире
            None, // и позиций не знаем
            &tuning(),
            &mut rng(),
        );
        assert_eq!(state, current);
    }
}
