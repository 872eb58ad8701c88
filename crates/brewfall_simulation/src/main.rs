//! Headless демо Brewfall
//!
//! Бросает несколько бутылок в небольшую группу существ и печатает
//! сигналы мира и здоровье после каждого удара.

use bevy::prelude::*;
use brewfall_simulation::*;

fn main() {
    println!("Starting Brewfall headless simulation");

    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin);
    // Первый update только запускает часы
    app.update();

    let world = app.world_mut();
    let thrower = spawn_creature(world, CreatureKind::Player, Vec3::new(-6.0, 64.0, 0.0));
    let zombie = spawn_creature(world, CreatureKind::Zombie, Vec3::new(1.0, 64.0, 0.0));
    let villager = spawn_creature(world, CreatureKind::Villager, Vec3::new(-1.5, 64.0, 1.0));
    let enderman = spawn_creature(world, CreatureKind::Enderman, Vec3::new(0.0, 64.0, -2.0));
    world.resource_mut::<BlockGrid>().set(IVec3::new(0, 64, 0), BlockKind::Fire);

    let throws = [
        PotionItem::splash(PotionType::Water),
        PotionItem::splash(PotionType::StrongHealing),
        PotionItem::splash(PotionType::Poison),
        PotionItem::lingering(PotionType::Regeneration),
    ];

    for item in throws {
        let label = format!("{:?} {:?}", item.kind, item.potion);
        let projectile = spawn_thrown_potion(app.world_mut(), item, Some(thrower), Vec3::new(0.0, 64.0, 0.0));
        app.world_mut().send_event(PotionImpact {
            projectile,
            hit: ImpactResult::Block {
                pos: IVec3::new(0, 63, 0),
                face: Face::Up,
                point: Vec3::new(0.0, 64.0, 0.0),
            },
        });

        app.update();

        println!("Threw {}", label);
        let signals: Vec<WorldSignal> = app
            .world()
            .resource::<Events<WorldSignal>>()
            .iter_current_update_events()
            .cloned()
            .collect();
        for signal in signals {
            println!("  signal {} at {:?} (data {})", signal.code, signal.pos, signal.data);
        }

        for (name, entity) in [("zombie", zombie), ("villager", villager), ("enderman", enderman)] {
            if let Some(health) = app.world().get::<Health>(entity) {
                println!("  {}: {:.1}/{:.1} HP", name, health.current, health.max);
            }
        }
    }

    // Облако живёт дальше: 200 тиков
    for tick in 0..200 {
        app.update();

        if tick % 50 == 0 {
            let mut query = app.world_mut().query::<&AreaEffectCloud>();
            let clouds: Vec<f32> = query.iter(app.world()).map(|cloud| cloud.radius).collect();
            println!("Tick {}: clouds {:?}", tick, clouds);
        }
    }

    println!("Simulation complete!");
}
