//! PhysicsBody — физическое состояние сущности как plain value struct
//!
//! Симуляция владеет velocity/mass эксклюзивно; rapier получает velocity
//! через sync-адаптер (physics::sync_velocity_to_rapier). Позиция и
//! ориентация живут в Transform — engine-native transform-объекты
//! в симуляцию не протекают.

use bevy::prelude::*;

/// Физическое тело (custom velocity integration)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    /// Линейная скорость (m/s)
    pub velocity: Vec3,
    /// Масса (кг) — для пересчёта силы в ускорение
    pub mass: f32,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass: 80.0, // пешеход
        }
    }
}

impl PhysicsBody {
    pub fn with_mass(mass: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass,
        }
    }

    /// Применить силу: a = F/m, интегрируем в velocity за delta
    pub fn apply_force(&mut self, force: Vec3, delta: f32) {
        self.velocity += force / self.mass * delta;
    }

    /// Ограничить горизонтальную скорость, вертикальную не трогаем
    /// (gravity/прыжок живут в Y и клампу не подчиняются)
    pub fn clamp_horizontal_speed(&mut self, max_speed: f32) {
        let horizontal = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        let speed = horizontal.length();
        if speed > max_speed {
            let scaled = horizontal * (max_speed / speed);
            self.velocity.x = scaled.x;
            self.velocity.z = scaled.z;
        }
    }

    /// Горизонтальная составляющая скорости (для логов/отладки)
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_force_scales_by_mass() {
        let mut body = PhysicsBody::with_mass(100.0);
        body.apply_force(Vec3::new(1000.0, 0.0, 0.0), 0.5);

        // a = 1000/100 = 10 m/s², за 0.5s → +5 m/s
        assert!((body.velocity.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_clamp_preserves_vertical_velocity() {
        let mut body = PhysicsBody::default();
        body.velocity = Vec3::new(30.0, -9.0, 40.0); // горизонталь 50 m/s

        body.clamp_horizontal_speed(25.0);

        assert!((body.horizontal_speed() - 25.0).abs() < 1e-3);
        assert_eq!(body.velocity.y, -9.0); // Y не тронут
        // Направление сохранено (30:40 → 15:20)
        assert!((body.velocity.x - 15.0).abs() < 1e-3);
        assert!((body.velocity.z - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_clamp_noop_below_limit() {
        let mut body = PhysicsBody::default();
        body.velocity = Vec3::new(3.0, 0.0, 4.0);

        body.clamp_horizontal_speed(25.0);
        assert_eq!(body.velocity, Vec3::new(3.0, 0.0, 4.0));
    }
}
