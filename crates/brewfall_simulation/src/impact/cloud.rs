//! Lingering cloud spawner — облако на месте удара lingering-бутылки

use bevy::prelude::*;

use super::hooks::LingeringSplashEvent;
use super::world::ImpactWorld;
use crate::area::AreaEffectCloud;
use crate::potion::PotionItem;

/// Облако для payload'а (ещё не вставлено в мир)
///
/// Радиус сжимается до нуля ровно к концу естественной длительности.
/// Эффекты — собственные копии полного списка предмета (базовые + custom).
pub fn build_cloud(
    item: &PotionItem,
    owner: Option<Entity>,
    radius: f32,
    radius_on_use: f32,
    wait_time: i32,
) -> AreaEffectCloud {
    let mut cloud = AreaEffectCloud::new(item.potion);
    cloud.owner = owner;
    cloud.radius = radius;
    cloud.radius_on_use = radius_on_use;
    cloud.wait_time = wait_time;
    cloud.radius_per_tick = -cloud.radius / cloud.duration as f32;

    for effect in item.full_effects() {
        cloud.add_effect(effect);
    }

    if let Some(color) = item.custom_color {
        cloud.set_color(color);
    }

    cloud
}

impl ImpactWorld<'_, '_> {
    /// Облако через veto hook; None — отменено или убито hook'ом
    pub fn spawn_cloud(
        &mut self,
        projectile: Entity,
        origin: Vec3,
        thrower: Option<Entity>,
        item: &PotionItem,
    ) -> Option<Entity> {
        let mut cloud = build_cloud(
            item,
            thrower,
            self.config.cloud_radius,
            self.config.cloud_radius_on_use,
            self.config.cloud_wait_time,
        );

        let mut event = LingeringSplashEvent::new(projectile, &mut cloud);
        self.hooks.fire_lingering(&mut event);
        let cancelled = event.is_cancelled();

        if cancelled || cloud.is_dead() {
            cloud.kill();
            crate::logger::log(&format!(
                "Lingering cloud of {:?} suppressed (cancelled: {})",
                projectile, cancelled
            ));
            return None;
        }

        let entity = self
            .commands
            .spawn((cloud, Transform::from_translation(origin)))
            .id();

        crate::logger::log(&format!("☁️ Cloud {:?} spawned at {:?}", entity, origin));
        Some(entity)
    }
}
