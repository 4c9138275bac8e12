//! Профили оружия — статический lookup по имени
//!
//! Иммутабельная конфигурация: damage/range/fire_rate на рантайме
//! не меняются. Неизвестное имя — ошибка конфигурации на стороне
//! вызова, lookup возвращает None и атака молча игнорируется.

use serde::{Deserialize, Serialize};

/// Характеристики оружия
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Урон за попадание
    pub damage: u32,
    /// Дальность поражения (метры)
    pub range: f32,
    /// Выстрелов в секунду (потребляется слоем ввода/триггера)
    pub fire_rate: f32,
}

impl WeaponProfile {
    pub const fn fists() -> Self {
        Self {
            damage: 10,
            range: 2.0,
            fire_rate: 1.5,
        }
    }

    pub const fn pistol() -> Self {
        Self {
            damage: 25,
            range: 60.0,
            fire_rate: 2.0,
        }
    }

    pub const fn shotgun() -> Self {
        Self {
            damage: 60,
            range: 25.0,
            fire_rate: 1.0,
        }
    }

    pub const fn rifle() -> Self {
        Self {
            damage: 35,
            range: 120.0,
            fire_rate: 8.0,
        }
    }

    /// Lookup по имени
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "fists" => Some(Self::fists()),
            "pistol" => Some(Self::pistol()),
            "shotgun" => Some(Self::shotgun()),
            "rifle" => Some(Self::rifle()),
            _ => None,
        }
    }

    /// Минимальный интервал между выстрелами (секунды)
    pub fn refire_interval(&self) -> f32 {
        1.0 / self.fire_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_weapons() {
        assert_eq!(WeaponProfile::by_name("pistol"), Some(WeaponProfile::pistol()));
        assert_eq!(WeaponProfile::by_name("rifle"), Some(WeaponProfile::rifle()));
        assert_eq!(WeaponProfile::by_name("shotgun"), Some(WeaponProfile::shotgun()));
        assert_eq!(WeaponProfile::by_name("fists"), Some(WeaponProfile::fists()));
    }

    #[test]
    fn test_lookup_unknown_weapon() {
        assert!(WeaponProfile::by_name("bazooka").is_none());
        assert!(WeaponProfile::by_name("").is_none());
    }

    #[test]
    fn test_refire_interval() {
        let rifle = WeaponProfile::rifle();
        assert!((rifle.refire_interval() - 0.125).abs() < 1e-6);
    }
}
