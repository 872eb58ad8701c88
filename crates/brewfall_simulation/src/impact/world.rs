//! ImpactWorld — всё, к чему обращается разрешение удара
//!
//! Один `SystemParam` вместо десятка параметров системы:
//! - spatial query по существам (bounding box + предикат)
//! - BlockGrid (тушение огня)
//! - ImpactHooks (veto), ImpactConfig (правила сервера)
//! - Commands (вставка облаков), writers сигналов и урона
//!
//! Поведение разнесено по модулям: splash.rs, water.rs, cloud.rs.

use bevy::ecs::system::SystemParam;
use bevy::math::bounding::{Aabb3d, BoundingVolume, IntersectsVolume};
use bevy::prelude::*;

use super::damage::{DamageEvents, Dead};
use super::events::WorldSignal;
use super::hooks::ImpactHooks;
use super::projectile::ThrownPotion;
use crate::components::{BlockGrid, Creature, Health};
use crate::config::{ImpactConfig, SPLASH_QUERY_GROWTH, THROWN_SIZE};
use crate::potion::ActiveEffects;

/// Существа, которых может задеть удар (снаряды и мёртвые исключены)
pub type CreatureQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Transform,
        &'static Creature,
        &'static mut Health,
        &'static mut ActiveEffects,
    ),
    (Without<ThrownPotion>, Without<Dead>),
>;

#[derive(SystemParam)]
pub struct ImpactWorld<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub creatures: CreatureQuery<'w, 's>,
    pub blocks: ResMut<'w, BlockGrid>,
    pub hooks: Res<'w, ImpactHooks>,
    pub config: Res<'w, ImpactConfig>,
    pub signals: EventWriter<'w, WorldSignal>,
    pub damage: DamageEvents<'w, 's>,
}

/// Объём поиска целей: bounding box снаряда, расширенный на 4/2/4
pub fn splash_bounds(origin: Vec3) -> Aabb3d {
    let half = THROWN_SIZE / 2.0;
    Aabb3d::new(origin + Vec3::new(0.0, half, 0.0), Vec3::splat(half)).grow(SPLASH_QUERY_GROWTH)
}

impl ImpactWorld<'_, '_> {
    /// Spatial query: существа, чей bounding box пересекает `bounds`
    ///
    /// Возвращает (entity, позиция ног).
    pub fn entities_within(
        &self,
        bounds: &Aabb3d,
        predicate: impl Fn(&Creature) -> bool,
    ) -> Vec<(Entity, Vec3)> {
        self.creatures
            .iter()
            .filter(|item| {
                let (_, transform, creature, health, _) = *item;
                // Dead вставляется отложенно, убитые в этом же тике отсекаются по HP
                health.is_alive()
                    && predicate(creature)
                    && creature.bounds_at(transform.translation).intersects(bounds)
            })
            .map(|(entity, transform, ..)| (entity, transform.translation))
            .collect()
    }
}
