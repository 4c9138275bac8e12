//! Разрешение атаки: урон + классификация преступления + реакция толпы
//!
//! Порядок шагов фиксирован:
//! 1. lookup оружия (неизвестное имя → no-op, это ошибка конфигурации)
//! 2. crime report severity 1 — сам факт стрельбы, попадание не требуется
//! 3. паника пешеходов / бегство машин вокруг точки атаки
//! 4. ray-пик вдоль направления (без собственного тела стрелявшего)
//! 5. в пределах range: урон живым, смерть → отдельный report severity 2;
//!    геометрия/корпуса машин — декоративная отметина

use bevy::prelude::*;

use crate::combat::raycast::{first_hit, HitKind, RayTarget};
use crate::combat::reactions::{CivilianState, VehicleState, PANIC_RADIUS, VEHICLE_FLEE_RADIUS};
use crate::combat::weapons::WeaponProfile;
use crate::components::{EntityKind, Health, Hitbox, Obstacle, PickDisabled};
use crate::wanted::{CrimeLedger, CrimeReported, WantedLevelChanged};

/// Severity стрельбы (report уходит на каждую атаку)
pub const GUNFIRE_SEVERITY: u8 = 1;
/// Severity убийства (второй report в том же разрешении)
pub const KILL_SEVERITY: u8 = 2;

/// Сколько живёт декоративная отметина от попадания (секунды)
const IMPACT_LIFETIME: f32 = 10.0;

/// Событие: атака (выстрел/удар) от слоя ввода или AI
#[derive(Event, Debug, Clone)]
pub struct AttackEvent {
    /// Кто атакует (его тело исключается из ray-пика)
    pub attacker: Entity,
    /// Точка выстрела (дуло/кулак)
    pub origin: Vec3,
    /// Направление (нормализуется при разрешении)
    pub direction: Vec3,
    /// Имя оружия для lookup'а профиля
    pub weapon: String,
}

/// Событие: урон нанесён (UI, звуки, эффекты)
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

/// Событие: сущность погибла
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
    pub kind: EntityKind,
}

/// Декоративная отметина от попадания (дырка/скол)
///
/// Рендер-слой ориентирует decal по нормали; чистится age-sweep'ом.
#[derive(Component, Debug, Clone, Copy)]
pub struct ImpactMarker {
    pub normal: Vec3,
}

/// Транзиентная сущность: снять через remaining секунд
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    pub remaining: f32,
}

impl DespawnAfter {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }
}

/// Crime report + события для подписчиков
fn report(
    wanted: &mut CrimeLedger,
    severity: u8,
    position: Vec3,
    crime_events: &mut EventWriter<CrimeReported>,
    level_events: &mut EventWriter<WantedLevelChanged>,
) {
    let previous = wanted.level();
    let accepted = wanted.report_crime(severity, position);
    crime_events.write(CrimeReported {
        severity,
        position,
        accepted,
    });
    if accepted && wanted.level() != previous {
        level_events.write(WantedLevelChanged {
            previous,
            level: wanted.level(),
        });
    }
}

/// Система: разрешение всех AttackEvent этого тика
pub fn resolve_attacks(
    mut commands: Commands,
    mut attacks: EventReader<AttackEvent>,
    mut wanted: ResMut<CrimeLedger>,
    pickables: Query<
        (Entity, &Transform, &Hitbox, Option<&EntityKind>, Has<Obstacle>),
        Without<PickDisabled>,
    >,
    mut healths: Query<&mut Health>,
    mut civilians: Query<(&Transform, &mut CivilianState)>,
    mut vehicles: Query<(&Transform, &mut VehicleState)>,
    mut crime_events: EventWriter<CrimeReported>,
    mut level_events: EventWriter<WantedLevelChanged>,
    mut damage_events: EventWriter<DamageDealt>,
    mut death_events: EventWriter<EntityDied>,
) {
    // Убитые в этом батче: despawn отложен до конца тика,
    // но труп уже не должен ловить следующие лучи
    let mut killed: Vec<Entity> = Vec::new();

    for attack in attacks.read() {
        let Some(profile) = WeaponProfile::by_name(&attack.weapon) else {
            crate::logger::log_warning(&format!(
                "unknown weapon '{}' — attack ignored",
                attack.weapon
            ));
            continue;
        };

        // Стрельба — преступление сама по себе
        report(
            &mut wanted,
            GUNFIRE_SEVERITY,
            attack.origin,
            &mut crime_events,
            &mut level_events,
        );

        // Паника пешеходов вокруг точки атаки (безусловно, на каждую атаку)
        for (transform, mut state) in civilians.iter_mut() {
            if transform.translation.distance(attack.origin) <= PANIC_RADIUS {
                *state = CivilianState::panic_from(attack.origin);
            }
        }

        // Припаркованные машины поблизости срываются с места
        for (transform, mut state) in vehicles.iter_mut() {
            if matches!(*state, VehicleState::Parked)
                && transform.translation.distance(attack.origin) <= VEHICLE_FLEE_RADIUS
            {
                *state = VehicleState::flee_from(attack.origin);
            }
        }

        // Ray-пик: первое пересечение, своё тело и отключённую геометрию мимо
        let candidates = pickables.iter().filter_map(|(entity, transform, hitbox, kind, is_obstacle)| {
            if killed.contains(&entity) {
                return None;
            }
            let kind = if is_obstacle {
                HitKind::Scenery
            } else {
                HitKind::Actor(*kind?)
            };
            Some(RayTarget {
                entity,
                center: transform.translation,
                radius: hitbox.radius,
                kind,
            })
        });

        let Some(hit) = first_hit(attack.origin, attack.direction, attack.attacker, candidates)
        else {
            continue;
        };
        if hit.distance > profile.range {
            continue;
        }

        match hit.kind {
            HitKind::Actor(kind) => {
                if let Ok(mut health) = healths.get_mut(hit.target) {
                    let was_alive = health.is_alive();
                    health.take_damage(profile.damage);
                    let died = was_alive && !health.is_alive();

                    damage_events.write(DamageDealt {
                        attacker: attack.attacker,
                        target: hit.target,
                        damage: profile.damage,
                        target_died: died,
                    });

                    if died {
                        death_events.write(EntityDied {
                            entity: hit.target,
                            killer: Some(attack.attacker),
                            kind,
                        });
                        // Погибший освобождает ресурсы в этом же тике
                        killed.push(hit.target);
                        if let Ok(mut entity_commands) = commands.get_entity(hit.target) {
                            entity_commands.despawn();
                        }
                        // Убийство — отдельное, более тяжкое преступление
                        report(
                            &mut wanted,
                            KILL_SEVERITY,
                            attack.origin,
                            &mut crime_events,
                            &mut level_events,
                        );
                        crate::logger::log_info(&format!(
                            "{:?} killed by {:?}",
                            hit.target, attack.attacker
                        ));
                    }
                } else {
                    // Корпус без Health (транспорт) — только отметина
                    spawn_impact(&mut commands, hit.point, hit.normal);
                }
            }
            HitKind::Scenery => {
                spawn_impact(&mut commands, hit.point, hit.normal);
            }
        }
    }
}

fn spawn_impact(commands: &mut Commands, point: Vec3, normal: Vec3) {
    commands.spawn((
        Transform::from_translation(point),
        ImpactMarker { normal },
        DespawnAfter::new(IMPACT_LIFETIME),
    ));
}

/// Система: сметание транзиентных сущностей по возрасту
///
/// Явный per-tick sweep вместо отложенных callback'ов — детерминированно
/// и видно в тестах.
pub fn despawn_after_sweep(
    mut commands: Commands,
    mut query: Query<(Entity, &mut DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut lifetime) in query.iter_mut() {
        lifetime.remaining -= delta;
        if lifetime.remaining <= 0.0 {
            if let Ok(mut entity_commands) = commands.get_entity(entity) {
                entity_commands.despawn();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_despawn_after_countdown() {
        let mut lifetime = DespawnAfter::new(0.05);
        lifetime.remaining -= 1.0 / 60.0;
        assert!(lifetime.remaining > 0.0);
        lifetime.remaining -= 1.0 / 60.0;
        lifetime.remaining -= 1.0 / 60.0;
        assert!(lifetime.remaining <= 0.0);
    }

    #[test]
    fn test_severity_constants_cumulative() {
        // Выстрел + убийство в одной атаке дают суммарную эскалацию 3
        assert_eq!(GUNFIRE_SEVERITY + KILL_SEVERITY, 3);
        assert!(KILL_SEVERITY > GUNFIRE_SEVERITY);
    }
}
