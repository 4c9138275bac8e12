//! GRIDLOCK Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (strategic layer)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (wanted state, pursuit AI, combat rules)
//! - Engine = tactical layer (rendering, мешy, raycast по визуальной сцене,
//!   интеграция физики). Симуляция пишет velocity/orientation, engine
//!   интегрирует их ПОСЛЕ gameplay-систем тика.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod combat;
pub mod components;
pub mod logger;
pub mod physics;
pub mod pursuit;
pub mod wanted;

// Re-export базовых типов для удобства
pub use combat::{
    AttackEvent, CivilianState, DamageDealt, EntityDied, ImpactMarker, VehicleState,
    WeaponProfile, PANIC_RADIUS, VEHICLE_FLEE_RADIUS,
};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::KinematicBody;
pub use pursuit::{
    agent_markers, reset_session, AgentMarker, PursuitFleet, PursuitState, PursuitTuning,
};
pub use wanted::{
    CrimeLedger, CrimeReported, OffenderSight, WantedLevelChanged, MAX_WANTED_LEVEL,
};

/// Частота simulation tick (Hz)
pub const SIMULATION_HZ: f64 = 60.0;

/// Длительность одного тика — единый источник для Time<Fixed> и manual-тестов,
/// иначе накопитель fixed timestep дрейфует относительно шага времени
pub fn simulation_timestep() -> Duration {
    Duration::from_secs_f64(1.0 / SIMULATION_HZ)
}

/// Порядок подсистем внутри FixedUpdate тика.
///
/// Вся игровая логика завершает мутации до шага физики — engine-интеграция
/// видит согласованное состояние, а чтения позиций внутри тика отражают
/// предыдущий кадр (one-frame lag допустим).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Sight-трекинг offender'а + decay розыска
    Wanted,
    /// Разрешение атак: урон, crime reports, паника толпы
    Combat,
    /// Флот преследования: reconcile, FSM, steering
    Pursuit,
    /// Кинематика: gravity, интеграция, rapier sync
    Physics,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_duration(simulation_timestep()))
            // Детерминистичный RNG (seed по умолчанию, init_resource не
            // перетирает seed выставленный create_headless_app)
            .init_resource::<DeterministicRng>()
            .init_resource::<PursuitTuning>();

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Wanted,
                SimulationSet::Combat,
                SimulationSet::Pursuit,
                SimulationSet::Physics,
            )
                .chain(),
        );

        app.add_plugins((
            wanted::WantedPlugin,
            combat::CombatPlugin,
            pursuit::PursuitPlugin,
            physics::PhysicsPlugin,
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную ровно на один тик за app.update() —
/// wall-clock не участвует, прогоны воспроизводимы.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(simulation_timestep()))
        .insert_resource(TimeUpdateStrategy::ManualDuration(simulation_timestep()));

    app
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия: Debug-байты, отсортированные по Entity ID)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
