//! CrimeLedger — state machine уровня розыска
//!
//! Единственный источник истины для wanted level, его decay и последней
//! известной позиции offender'а. Все операции тотальны: кламп и no-op
//! вместо ошибок, «застрявший» уровень — допустимая деградация, краш — нет.

use bevy::prelude::*;

/// Максимальный уровень розыска (5 звёзд на HUD)
pub const MAX_WANTED_LEVEL: u8 = 5;

/// Окно decay: столько секунд offender должен оставаться вне видимости,
/// чтобы уровень упал на единицу
pub const DECAY_WINDOW: f32 = 30.0;

/// Анти-спам: минимальный интервал между принятыми crime reports.
/// Скорострельное оружие репортит каждый выстрел — без этой задержки
/// уровень взлетал бы быстрее задуманного.
pub const REPORT_COOLDOWN: f32 = 0.5;

/// Событие: crime report прошёл через ledger (принят или отброшен)
///
/// UI/звук подписываются на него — симуляция ничего не знает о презентации.
#[derive(Event, Debug, Clone)]
pub struct CrimeReported {
    pub severity: u8,
    pub position: Vec3,
    /// false = отброшен cooldown-guard'ом
    pub accepted: bool,
}

/// Событие: уровень розыска изменился (эскалация или decay)
#[derive(Event, Debug, Clone)]
pub struct WantedLevelChanged {
    pub previous: u8,
    pub level: u8,
}

/// Ledger розыска (ECS resource, живёт всю сессию)
#[derive(Resource, Debug, Clone)]
pub struct CrimeLedger {
    level: u8,
    /// Секунды с последнего sighting'а (копится только при level > 0)
    decay_timer: f32,
    /// Остаток cooldown'а приёма reports
    report_cooldown: f32,
    /// Severity report'а, взведшего cooldown: спам той же (или меньшей)
    /// тяжести глушится, более тяжкое преступление проходит —
    /// убийство в той же атаке не должно теряться за выстрелом
    cooldown_severity: u8,
    last_known_position: Option<Vec3>,
}

impl Default for CrimeLedger {
    fn default() -> Self {
        Self {
            level: 0,
            decay_timer: 0.0,
            report_cooldown: 0.0,
            cooldown_severity: 0,
            last_known_position: None,
        }
    }
}

impl CrimeLedger {
    /// Текущий уровень розыска [0, 5]
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_wanted(&self) -> bool {
        self.level > 0
    }

    /// Позиция offender'а на момент последнего sighting'а или crime report
    pub fn last_known_position(&self) -> Option<Vec3> {
        self.last_known_position
    }

    /// Принять crime report. Возвращает true если report принят.
    ///
    /// Принятый report: кламп-эскалация уровня, сброс decay-таймера,
    /// перезапись last known position, перевзвод cooldown'а.
    pub fn report_crime(&mut self, severity: u8, position: Vec3) -> bool {
        if self.report_cooldown > 0.0 && severity <= self.cooldown_severity {
            return false;
        }

        self.level = self.level.saturating_add(severity).min(MAX_WANTED_LEVEL);
        self.decay_timer = 0.0;
        self.last_known_position = Some(position);
        self.report_cooldown = REPORT_COOLDOWN;
        self.cooldown_severity = severity;
        true
    }

    /// Per-tick update. Возвращает true если произошёл decay-декремент.
    ///
    /// Sighting сбрасывает таймер и обновляет last known position.
    /// Иначе при level > 0 таймер копится; по достижении окна — ровно один
    /// декремент и сброс (несколько просроченных окон НЕ схлопываются
    /// в серию декрементов за тик).
    pub fn tick(&mut self, delta: f32, offender_sighted: bool, offender_position: Option<Vec3>) -> bool {
        if self.report_cooldown > 0.0 {
            self.report_cooldown = (self.report_cooldown - delta).max(0.0);
            if self.report_cooldown == 0.0 {
                self.cooldown_severity = 0;
            }
        }

        if offender_sighted {
            self.decay_timer = 0.0;
            if let Some(position) = offender_position {
                self.last_known_position = Some(position);
            }
            return false;
        }

        if self.level == 0 {
            return false;
        }

        self.decay_timer += delta;
        if self.decay_timer >= DECAY_WINDOW {
            self.level -= 1;
            self.decay_timer = 0.0;
            return true;
        }

        false
    }

    /// Полный сброс (bust/respawn): уровень, таймеры, позиция
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Vec3 {
        Vec3::new(10.0, 0.0, -4.0)
    }

    /// Прокрутить ledger без sighting'а
    fn run_unsighted(ledger: &mut CrimeLedger, seconds: f32) -> u32 {
        let mut decrements = 0;
        let ticks = (seconds / 0.1).round() as u32;
        for _ in 0..ticks {
            if ledger.tick(0.1, false, None) {
                decrements += 1;
            }
        }
        decrements
    }

    #[test]
    fn test_level_clamped_at_max() {
        let mut ledger = CrimeLedger::default();
        for _ in 0..10 {
            ledger.report_crime(3, pos());
            run_unsighted(&mut ledger, 1.0); // даём cooldown'у остыть
        }
        assert_eq!(ledger.level(), MAX_WANTED_LEVEL);
    }

    #[test]
    fn test_report_sets_last_known_position() {
        let mut ledger = CrimeLedger::default();
        assert!(ledger.last_known_position().is_none());

        ledger.report_crime(1, pos());
        assert_eq!(ledger.last_known_position(), Some(pos()));
        assert!(ledger.is_wanted());
    }

    #[test]
    fn test_cooldown_drops_rapid_fire() {
        let mut ledger = CrimeLedger::default();
        assert!(ledger.report_crime(1, pos()));
        // Второй выстрел через 0.1s — глушится
        ledger.tick(0.1, false, None);
        assert!(!ledger.report_crime(1, pos()));
        assert_eq!(ledger.level(), 1);

        // А через 0.5s — проходит
        ledger.tick(0.5, false, None);
        assert!(ledger.report_crime(1, pos()));
        assert_eq!(ledger.level(), 2);
    }

    #[test]
    fn test_lethal_report_passes_cooldown() {
        let mut ledger = CrimeLedger::default();
        // Выстрел и убийство в одном разрешении атаки: severity 2 > 1
        assert!(ledger.report_crime(1, pos()));
        assert!(ledger.report_crime(2, pos()));
        assert_eq!(ledger.level(), 3);
    }

    #[test]
    fn test_decay_monotonic() {
        let mut ledger = CrimeLedger::default();
        ledger.report_crime(3, pos());
        assert_eq!(ledger.level(), 3);

        // Ровно одно окно → один декремент
        let decrements = run_unsighted(&mut ledger, DECAY_WINDOW);
        assert_eq!(decrements, 1);
        assert_eq!(ledger.level(), 2);

        // Ещё два окна → ноль, и дальше не уходит
        run_unsighted(&mut ledger, DECAY_WINDOW * 2.0);
        assert_eq!(ledger.level(), 0);

        let extra = run_unsighted(&mut ledger, DECAY_WINDOW * 2.0);
        assert_eq!(extra, 0);
        assert_eq!(ledger.level(), 0);
    }

    #[test]
    fn test_sight_resets_decay_window() {
        let mut ledger = CrimeLedger::default();
        ledger.report_crime(1, pos());

        // 29 секунд невидимости...
        run_unsighted(&mut ledger, 29.0);
        assert_eq!(ledger.level(), 1);

        // ...sighting на 29-й секунде сбрасывает окно
        let seen_at = Vec3::new(50.0, 0.0, 0.0);
        ledger.tick(0.1, true, Some(seen_at));
        assert_eq!(ledger.last_known_position(), Some(seen_at));

        // Ещё 2 секунды — декремента нет (окно началось заново)
        run_unsighted(&mut ledger, 2.0);
        assert_eq!(ledger.level(), 1);

        // Полное окно с нуля — теперь падает
        run_unsighted(&mut ledger, DECAY_WINDOW);
        assert_eq!(ledger.level(), 0);
    }

    #[test]
    fn test_overdue_windows_collapse_to_single_decrement() {
        let mut ledger = CrimeLedger::default();
        ledger.report_crime(3, pos());

        // Гигантская delta (пауза/лаг): один тик — один декремент, без burst'а
        assert!(ledger.tick(300.0, false, None));
        assert_eq!(ledger.level(), 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut ledger = CrimeLedger::default();
        ledger.report_crime(4, pos());
        ledger.reset();

        assert_eq!(ledger.level(), 0);
        assert!(!ledger.is_wanted());
        assert!(ledger.last_known_position().is_none());
    }
}
