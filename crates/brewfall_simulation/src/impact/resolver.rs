//! Impact resolver — оркестрация удара бутылки
//!
//! На каждый `PotionImpact` (один раз на снаряд):
//! 1. Классификация payload'а
//! 2. Простая вода по блоку → тушение огня (клетка перед гранью + 4 соседа)
//! 3. Вода → урон водочувствительным; lingering → облако; иначе → брызги.
//!    Брызги/облако вызываются даже без эффектов, чтобы hooks видели событие.
//! 4. Ровно один терминальный сигнал (код зависит от мгновенности жидкости)
//! 5. Снаряд мёртв (повторный удар — no-op)

use bevy::prelude::*;

use super::damage::Dead;
use super::events::{ImpactResult, PotionImpact, WorldSignal};
use super::projectile::ThrownPotion;
use super::world::ImpactWorld;
use crate::components::block_pos_of;
use crate::potion::classify;

/// Система: разрешение ударов брошенных зелий
pub fn resolve_potion_impacts(
    mut impacts: EventReader<PotionImpact>,
    mut projectiles: Query<(&Transform, &mut ThrownPotion)>,
    mut world: ImpactWorld,
) {
    for impact in impacts.read() {
        let Ok((transform, mut potion)) = projectiles.get_mut(impact.projectile) else {
            crate::logger::log_warning(&format!(
                "PotionImpact for {:?}: not a thrown potion",
                impact.projectile
            ));
            continue;
        };

        if !potion.begin_resolving() {
            crate::logger::log(&format!(
                "PotionImpact for {:?} ignored: already {:?}",
                impact.projectile,
                potion.state()
            ));
            continue;
        }

        let origin = transform.translation;
        let item = potion.potion(impact.projectile);
        let class = classify(&item);

        if class.is_plain {
            if let ImpactResult::Block { pos, face, .. } = impact.hit {
                world.extinguish_around(pos, face);
            }
            world.apply_water(origin);
        } else if class.is_lingering {
            world.spawn_cloud(impact.projectile, origin, potion.thrower, &item);
        } else {
            world.apply_splash(impact.projectile, origin, potion.thrower, &impact.hit, &class.effects);
        }

        world
            .signals
            .write(WorldSignal::potion_break(class.has_instant, block_pos_of(origin), item.color()));

        potion.set_dead();
        world.commands.entity(impact.projectile).insert(Dead);
    }
}

/// Система: удаление разбитых снарядов (и деактивированных при загрузке)
pub fn despawn_dead_projectiles(mut commands: Commands, projectiles: Query<(Entity, &ThrownPotion)>) {
    for (entity, potion) in projectiles.iter() {
        if potion.is_dead() {
            commands.entity(entity).despawn();
        }
    }
}
