//! Headless-прогон GRIDLOCK симуляции
//!
//! Запускает Bevy App без рендера: выстрел на улице → розыск → флот
//! преследования. Для отладки пайплайна и профилирования без engine.

use bevy::prelude::*;
use gridlock_simulation::*;

fn main() {
    let seed = 42;
    println!("Starting GRIDLOCK headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    // Уличная сцена: игрок, прохожие, припаркованные машины, фонарь
    let player = {
        let world = app.world_mut();
        let mut commands = world.commands();

        let player = spawn_player(&mut commands, Vec3::ZERO);
        for i in 0..6 {
            let angle = i as f32 * std::f32::consts::TAU / 6.0;
            spawn_civilian(
                &mut commands,
                Vec3::new(angle.cos() * 15.0, 0.0, angle.sin() * 15.0),
            );
        }
        spawn_parked_vehicle(&mut commands, Vec3::new(12.0, 0.0, -8.0));
        spawn_parked_vehicle(&mut commands, Vec3::new(-40.0, 0.0, 20.0));
        spawn_obstacle(&mut commands, Vec3::new(0.0, 0.0, 30.0), 1.5);

        player
    };
    app.world_mut().flush();

    // Выстрел в первый же тик — город реагирует
    app.world_mut().send_event(AttackEvent {
        attacker: player,
        origin: Vec3::ZERO,
        direction: Vec3::Z,
        weapon: "pistol".to_string(),
    });

    // Прогоняем 1200 тиков (20 sec при 60Hz)
    for tick in 0..1200 {
        app.update();

        if tick % 120 == 0 {
            let wanted = app.world().resource::<CrimeLedger>().level();
            let units = app.world().resource::<PursuitFleet>().count();
            let entity_count = app.world().entities().len();
            println!(
                "Tick {}: wanted={} units={} entities={}",
                tick, wanted, units, entity_count
            );
        }
    }

    // Итоговая сводка для minimap-слоя
    for marker in agent_markers(app.world_mut()) {
        println!(
            "unit {:?} [{}] at ({:.1}, {:.1})",
            marker.entity, marker.state, marker.position.x, marker.position.z
        );
    }

    println!("Simulation complete!");
}
