//! PursuitFleet — владелец всех юнитов преследования
//!
//! Численность пропорциональна уровню розыска (units_per_level за звезду).
//! Донабор — каждый тик; снятие — только на decay-декременте, по одному
//! юниту, последний заспавненный первым (LIFO). Оставшиеся после
//! закрытия розыска юниты продолжают патрулировать.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use crate::combat::EntityDied;
use crate::components::{EntityKind, Health, Hitbox, PhysicsBody};
use crate::physics::KinematicBody;
use crate::pursuit::{PursuitState, PursuitTuning};
use crate::wanted::{CrimeLedger, OffenderSight, WantedLevelChanged};
use crate::DeterministicRng;

/// Ростер флота (порядок спавна, снятие с хвоста)
///
/// Юниты принадлежат флоту эксклюзивно: никто другой ссылок не держит.
#[derive(Resource, Debug, Default)]
pub struct PursuitFleet {
    roster: Vec<Entity>,
}

impl PursuitFleet {
    pub fn count(&self) -> usize {
        self.roster.len()
    }

    pub fn roster(&self) -> &[Entity] {
        &self.roster
    }

    fn desired_count(level: u8, tuning: &PursuitTuning) -> usize {
        level as usize * tuning.units_per_level
    }
}

/// Сводка по юниту для minimap-слоя
#[derive(Debug, Clone)]
pub struct AgentMarker {
    pub entity: Entity,
    pub position: Vec3,
    pub state: &'static str,
}

/// Снять сводку позиций/состояний флота (читает UI-слой)
pub fn agent_markers(world: &mut World) -> Vec<AgentMarker> {
    let mut query = world.query::<(Entity, &Transform, &PursuitState)>();
    let mut markers: Vec<_> = query
        .iter(world)
        .map(|(entity, transform, state)| AgentMarker {
            entity,
            position: transform.translation,
            state: state.label(),
        })
        .collect();
    markers.sort_by_key(|marker| marker.entity.index());
    markers
}

/// Полный сброс сессии розыска (bust/respawn игрока):
/// уровень, таймеры, видимость и весь флот разом.
pub fn reset_session(world: &mut World) {
    let roster: Vec<Entity> = std::mem::take(&mut world.resource_mut::<PursuitFleet>().roster);
    for unit in roster {
        world.despawn(unit);
    }
    world.resource_mut::<CrimeLedger>().reset();
    world.resource_mut::<OffenderSight>().visible = false;
    crate::logger::log_info("pursuit session reset");
}

/// Система: выбывшие в бою юниты вычищаются из ростера
///
/// Следующий reconcile доберёт численность до нормы.
pub fn purge_dead_units(
    mut fleet: ResMut<PursuitFleet>,
    mut deaths: EventReader<EntityDied>,
) {
    for death in deaths.read() {
        if death.kind == EntityKind::PursuitUnit {
            fleet.roster.retain(|unit| *unit != death.entity);
        }
    }
}

/// Система: приведение численности флота к wanted level
pub fn reconcile_fleet(
    mut commands: Commands,
    mut fleet: ResMut<PursuitFleet>,
    wanted: Res<CrimeLedger>,
    tuning: Res<PursuitTuning>,
    mut rng: ResMut<DeterministicRng>,
    mut level_events: EventReader<WantedLevelChanged>,
) {
    // Снятие — только на decay-декременте, ровно один юнит за событие
    for change in level_events.read() {
        if change.level >= change.previous {
            continue;
        }
        if fleet.roster.len() > PursuitFleet::desired_count(change.level, &tuning) {
            if let Some(unit) = fleet.roster.pop() {
                if let Ok(mut entity_commands) = commands.get_entity(unit) {
                    entity_commands.despawn();
                }
                crate::logger::log_info(&format!(
                    "pursuit unit withdrawn ({} left, wanted {})",
                    fleet.roster.len(),
                    change.level
                ));
            }
        }
    }

    // Донабор до нормы — каждый тик
    let desired = PursuitFleet::desired_count(wanted.level(), &tuning);
    if fleet.roster.len() >= desired {
        return;
    }

    let Some(anchor) = wanted.last_known_position() else {
        // Спавн возможен только от известной позиции; report всегда её
        // ставит, так что сюда попадаем только в вырожденных сценариях
        crate::logger::log_warning("pursuit spawn skipped: no known offender position");
        return;
    };

    let missing = desired - fleet.roster.len();
    for _ in 0..missing {
        let unit = spawn_pursuit_unit(&mut commands, anchor, &tuning, &mut rng.rng);
        fleet.roster.push(unit);
    }
    crate::logger::log_info(&format!(
        "pursuit fleet reinforced: +{} (total {}, wanted {})",
        missing,
        fleet.roster.len(),
        wanted.level()
    ));
}

/// Spawn юнита на случайном offset'е (50–100м, случайный угол) от anchor'а
///
/// Свежий юнит сразу в Chase — он приехал по вызову, а не патрулирует.
pub fn spawn_pursuit_unit(
    commands: &mut Commands,
    anchor: Vec3,
    tuning: &PursuitTuning,
    rng: &mut impl Rng,
) -> Entity {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let distance = rng.gen_range(tuning.spawn_min_distance..tuning.spawn_max_distance);
    let position = anchor + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);

    commands
        .spawn((
            Transform::from_translation(position),
            EntityKind::PursuitUnit,
            PursuitState::Chase,
            Health::new(60),
            Hitbox { radius: 1.4 },
            PhysicsBody::with_mass(tuning.unit_mass),
            KinematicBody::default(),
            // Rapier physics
            RigidBody::KinematicPositionBased,
            Collider::cuboid(1.8, 0.7, 0.9),
            Velocity::default(),
        ))
        .id()
}
