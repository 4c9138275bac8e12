//! Steering юнитов: поворот к цели, тяга, speed clamp, стабилизация
//!
//! Юнит не телепортируется к цели: ориентация доворачивается slerp'ом
//! (скорость ∝ dt), тяга прикладывается вдоль СОБСТВЕННОГО forward —
//! машина закладывает дугу, а не разворачивается на месте.

use bevy::prelude::*;

use crate::components::{PhysicsBody, Player};
use crate::pursuit::{PursuitState, PursuitTuning};

/// Yaw-кватернион, разворачивающий forward (-Z) в сторону heading
fn yaw_towards(heading: Vec3) -> Quat {
    Quat::from_rotation_y((-heading.x).atan2(-heading.z))
}

/// Система: движение юнитов по текущему состоянию
///
/// Chase перецеливается на живую позицию offender'а каждый тик;
/// Search/Patrol едут к сохранённой точке. Ближе arrive_distance
/// (по горизонтали) тягу не прикладываем.
pub fn pursuit_steering(
    mut agents: Query<(&mut Transform, &mut PhysicsBody, &PursuitState)>,
    player: Query<&Transform, (With<Player>, Without<PursuitState>)>,
    tuning: Res<PursuitTuning>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let offender = player.single().ok().map(|t| t.translation);

    for (mut transform, mut body, state) in agents.iter_mut() {
        let (target, drive_force, max_speed) = match state {
            PursuitState::Chase => {
                let Some(offender) = offender else {
                    continue;
                };
                (offender, tuning.chase_drive_force, tuning.chase_max_speed)
            }
            PursuitState::Search { target } => {
                (*target, tuning.cruise_drive_force, tuning.cruise_max_speed)
            }
            PursuitState::Patrol { target: Some(target) } => {
                (*target, tuning.cruise_drive_force, tuning.cruise_max_speed)
            }
            // Точки ещё нет — стоим этот тик
            PursuitState::Patrol { target: None } => continue,
        };

        let to_target = target - transform.translation;
        let planar = Vec3::new(to_target.x, 0.0, to_target.z);
        if planar.length() <= tuning.arrive_distance {
            continue;
        }

        let heading = planar.normalize();
        let lerp_t = (tuning.turn_rate * delta).min(1.0);
        transform.rotation = transform.rotation.slerp(yaw_towards(heading), lerp_t);

        let forward = *transform.forward();
        body.apply_force(forward * drive_force, delta);
        body.clamp_horizontal_speed(max_speed);
    }
}

/// Система: стабилизация — roll/pitch доворачиваются к нулю каждый тик
///
/// Не часть FSM: чисто физическая коррекция (после столкновений, бордюров),
/// работает в любом состоянии. Yaw не трогаем.
pub fn upright_correction(
    mut agents: Query<&mut Transform, With<PursuitState>>,
    tuning: Res<PursuitTuning>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for mut transform in agents.iter_mut() {
        let (yaw, pitch, roll) = transform.rotation.to_euler(EulerRot::YXZ);
        if pitch.abs() < 1e-3 && roll.abs() < 1e-3 {
            continue;
        }

        let upright = Quat::from_rotation_y(yaw);
        let lerp_t = (tuning.upright_rate * delta).min(1.0);
        transform.rotation = transform.rotation.slerp(upright, lerp_t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaw_towards_cardinal_directions() {
        // forward (-Z): нулевой yaw
        let q = yaw_towards(Vec3::NEG_Z);
        assert!((q.to_euler(EulerRot::YXZ).0).abs() < 1e-5);

        // Цель по +X: развёрнутый forward должен указывать на +X
        let q = yaw_towards(Vec3::X);
        let forward = q * Vec3::NEG_Z;
        assert!((forward - Vec3::X).length() < 1e-5);

        // Цель по -X
        let q = yaw_towards(Vec3::NEG_X);
        let forward = q * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_upright_restores_level_orientation() {
        // Завалившийся на бок юнит выпрямляется, yaw сохраняется
        let yaw = 1.2;
        let tilted = Quat::from_euler(EulerRot::YXZ, yaw, 0.6, -0.4);
        let mut rotation = tilted;

        for _ in 0..200 {
            let (current_yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
            if pitch.abs() < 1e-3 && roll.abs() < 1e-3 {
                break;
            }
            let upright = Quat::from_rotation_y(current_yaw);
            rotation = rotation.slerp(upright, 0.1);
        }

        let (final_yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
        assert!(pitch.abs() < 1e-2);
        assert!(roll.abs() < 1e-2);
        assert!((final_yaw - yaw).abs() < 0.1);
    }
}
