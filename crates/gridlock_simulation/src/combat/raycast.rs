//! Ray-пик по сферическим hitbox'ам
//!
//! Headless-замена engine-рейкасту по визуальной сцене: тот же контракт
//! (первое пересечение, точка + нормаль, фильтр кандидатов), но по
//! Hitbox-сферам симуляции. Пенетрация не моделируется — побеждает
//! первое пересечение по дистанции.

use bevy::prelude::*;

use crate::components::EntityKind;

/// Чем оказалась цель под лучом
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Живая сущность (dispatch по тегу)
    Actor(EntityKind),
    /// Статическая геометрия — попадание декоративно
    Scenery,
}

/// Кандидат для пересечения
#[derive(Debug, Clone, Copy)]
pub struct RayTarget {
    pub entity: Entity,
    pub center: Vec3,
    pub radius: f32,
    pub kind: HitKind,
}

/// Результат ray-пика
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub target: Entity,
    pub kind: HitKind,
    /// Дистанция вдоль луча до точки входа
    pub distance: f32,
    pub point: Vec3,
    /// Нормаль поверхности в точке попадания
    pub normal: Vec3,
}

/// Пересечение луча со сферой: ближайший t >= 0 или None
///
/// direction обязан быть нормализован вызывающим.
pub fn ray_sphere_intersection(
    origin: Vec3,
    direction: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t = -b - sqrt_d;
    if t >= 0.0 {
        return Some(t);
    }
    // Луч стартует внутри сферы — берём точку выхода
    let t = -b + sqrt_d;
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

/// Первое пересечение луча с кандидатами (исключая attacker'а)
pub fn first_hit<I>(origin: Vec3, direction: Vec3, exclude: Entity, candidates: I) -> Option<RayHit>
where
    I: IntoIterator<Item = RayTarget>,
{
    let direction = direction.normalize_or_zero();
    if direction == Vec3::ZERO {
        return None;
    }

    let mut best: Option<RayHit> = None;
    for candidate in candidates {
        if candidate.entity == exclude {
            continue;
        }

        let Some(distance) =
            ray_sphere_intersection(origin, direction, candidate.center, candidate.radius)
        else {
            continue;
        };

        if best.as_ref().map_or(true, |hit| distance < hit.distance) {
            let point = origin + direction * distance;
            best = Some(RayHit {
                target: candidate.entity,
                kind: candidate.kind,
                distance,
                point,
                normal: (point - candidate.center).normalize_or_zero(),
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: u32, center: Vec3, radius: f32) -> RayTarget {
        RayTarget {
            entity: Entity::from_raw(id),
            center,
            radius,
            kind: HitKind::Scenery,
        }
    }

    #[test]
    fn test_ray_hits_sphere_ahead() {
        let t = ray_sphere_intersection(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 10.0), 1.0);
        assert!((t.unwrap() - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_misses_sphere_behind() {
        let t = ray_sphere_intersection(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -10.0), 1.0);
        assert!(t.is_none());
    }

    #[test]
    fn test_ray_misses_offset_sphere() {
        let t = ray_sphere_intersection(Vec3::ZERO, Vec3::Z, Vec3::new(5.0, 0.0, 10.0), 1.0);
        assert!(t.is_none());
    }

    #[test]
    fn test_first_hit_picks_nearest() {
        let near = target(1, Vec3::new(0.0, 0.0, 5.0), 1.0);
        let far = target(2, Vec3::new(0.0, 0.0, 20.0), 1.0);

        // Порядок кандидатов не важен
        let hit = first_hit(Vec3::ZERO, Vec3::Z, Entity::from_raw(99), [far, near]).unwrap();
        assert_eq!(hit.target, Entity::from_raw(1));
        assert!((hit.distance - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_attacker_excluded() {
        let own_body = target(7, Vec3::new(0.0, 0.0, 1.0), 2.0); // луч стартует внутри
        let enemy = target(8, Vec3::new(0.0, 0.0, 10.0), 1.0);

        let hit = first_hit(Vec3::ZERO, Vec3::Z, Entity::from_raw(7), [own_body, enemy]).unwrap();
        assert_eq!(hit.target, Entity::from_raw(8));
    }

    #[test]
    fn test_hit_normal_points_outward() {
        let sphere = target(1, Vec3::new(0.0, 0.0, 10.0), 2.0);
        let hit = first_hit(Vec3::ZERO, Vec3::Z, Entity::from_raw(99), [sphere]).unwrap();

        // Вход с -Z стороны: нормаль смотрит назад на стрелявшего
        assert!((hit.normal - Vec3::NEG_Z).length() < 1e-4);
        assert!((hit.point.z - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_direction_is_noop() {
        let sphere = target(1, Vec3::new(0.0, 0.0, 10.0), 2.0);
        assert!(first_hit(Vec3::ZERO, Vec3::ZERO, Entity::from_raw(99), [sphere]).is_none());
    }
}
