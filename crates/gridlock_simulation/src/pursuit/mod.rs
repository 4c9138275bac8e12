//! Pursuit system — флот преследования
//!
//! Состав:
//! - fleet: ростер юнитов, reconcile численности к wanted level
//! - agent: FSM (Patrol / Chase / Search)
//! - steering: поворот, тяга, speed clamp, стабилизация
//!
//! Порядок выполнения (chain):
//! 1. purge_dead_units — вычистить выбывших из ростера
//! 2. reconcile_fleet — донабор/снятие юнитов
//! 3. pursuit_fsm_transitions — обновление состояний
//! 4. pursuit_steering — движение к цели
//! 5. upright_correction — стабилизация ориентации

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod agent;
pub mod fleet;
pub mod steering;

// Re-export основных типов
pub use agent::{next_state, pursuit_fsm_transitions, PursuitState};
pub use fleet::{
    agent_markers, purge_dead_units, reconcile_fleet, reset_session, spawn_pursuit_unit,
    AgentMarker, PursuitFleet,
};
pub use steering::{pursuit_steering, upright_correction};

use crate::SimulationSet;

/// Тюнинг преследования (радиусы, скорости, численность)
///
/// Все значения — конфигурация, на рантайме не мутируются.
/// Serde — для data-driven пресетов сложности.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct PursuitTuning {
    /// Радиус обнаружения offender'а юнитом (метры)
    pub sight_radius: f32,
    /// Ближе этой дистанции юнит переходит в Chase
    pub chase_radius: f32,
    /// Юнитов на звезду розыска
    pub units_per_level: usize,
    /// Offset спавна от последней известной позиции (метры)
    pub spawn_min_distance: f32,
    pub spawn_max_distance: f32,
    /// Разброс точек патруля от текущей позиции (метры)
    pub patrol_min_distance: f32,
    pub patrol_max_distance: f32,
    /// Ближе этой дистанции точка патруля считается достигнутой
    pub patrol_reroll_distance: f32,
    /// Ближе этой дистанции (по горизонтали) тяга не прикладывается
    pub arrive_distance: f32,
    /// Speed clamp по состояниям (m/s)
    pub chase_max_speed: f32,
    pub cruise_max_speed: f32,
    /// Тяга по состояниям (N)
    pub chase_drive_force: f32,
    pub cruise_drive_force: f32,
    /// Скорость доворота к цели (slerp-фактор в секунду)
    pub turn_rate: f32,
    /// Скорость выпрямления roll/pitch
    pub upright_rate: f32,
    /// Масса юнита (кг)
    pub unit_mass: f32,
}

impl Default for PursuitTuning {
    fn default() -> Self {
        Self {
            sight_radius: 80.0,
            chase_radius: 100.0,
            units_per_level: 2,
            spawn_min_distance: 50.0,
            spawn_max_distance: 100.0,
            patrol_min_distance: 30.0,
            patrol_max_distance: 80.0,
            patrol_reroll_distance: 5.0,
            arrive_distance: 2.0,
            chase_max_speed: 25.0,
            cruise_max_speed: 15.0,
            chase_drive_force: 18_000.0, // ~15 m/s² при массе 1200
            cruise_drive_force: 9_600.0, // ~8 m/s²
            turn_rate: 3.0,
            upright_rate: 6.0,
            unit_mass: 1200.0,
        }
    }
}

/// Pursuit Plugin
pub struct PursuitPlugin;

impl Plugin for PursuitPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PursuitFleet>();

        app.add_systems(
            FixedUpdate,
            (
                purge_dead_units,
                reconcile_fleet,
                pursuit_fsm_transitions,
                pursuit_steering,
                upright_correction,
            )
                .chain()
                .in_set(SimulationSet::Pursuit),
        );
    }
}
