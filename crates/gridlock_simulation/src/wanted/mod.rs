//! Wanted system — розыск offender'а
//!
//! ECS ответственность:
//! - CrimeLedger: уровень [0..5], decay-окно 30s, cooldown приёма reports
//! - OffenderSight: глобальный флаг «offender виден флоту»
//! - События CrimeReported / WantedLevelChanged для UI-слоя
//!
//! Мутируют уровень ТОЛЬКО ledger-системы и combat::resolve_attacks
//! (через публичный report_crime) — больше никто.

use bevy::prelude::*;

pub mod ledger;
pub mod sight;

// Re-export основных типов
pub use ledger::{
    CrimeLedger, CrimeReported, WantedLevelChanged, DECAY_WINDOW, MAX_WANTED_LEVEL,
    REPORT_COOLDOWN,
};
pub use sight::{offender_in_sight, track_offender_sight, OffenderSight};

use crate::components::Player;
use crate::SimulationSet;

/// Система: decay розыска
///
/// Sighting сбрасывает окно и освежает last known position;
/// без sighting'а окно копится и по 30s снимает одну звезду.
pub fn tick_wanted_decay(
    mut wanted: ResMut<CrimeLedger>,
    sight: Res<OffenderSight>,
    player: Query<&Transform, With<Player>>,
    mut level_events: EventWriter<WantedLevelChanged>,
    time: Res<Time<Fixed>>,
) {
    let offender_position = player.single().ok().map(|t| t.translation);
    let sighted = sight.visible && offender_position.is_some();

    let previous = wanted.level();
    if wanted.tick(time.delta_secs(), sighted, offender_position) {
        crate::logger::log_info(&format!(
            "wanted decay: {} -> {}",
            previous,
            wanted.level()
        ));
        level_events.write(WantedLevelChanged {
            previous,
            level: wanted.level(),
        });
    }
}

/// Wanted Plugin
///
/// Порядок: сначала sight (по позициям прошлого кадра), затем decay.
pub struct WantedPlugin;

impl Plugin for WantedPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CrimeLedger>()
            .init_resource::<OffenderSight>()
            .add_event::<CrimeReported>()
            .add_event::<WantedLevelChanged>();

        app.add_systems(
            FixedUpdate,
            (track_offender_sight, tick_wanted_decay)
                .chain()
                .in_set(SimulationSet::Wanted),
        );
    }
}
