//! AreaEffectCloud — облако lingering-зелья
//!
//! Облако живёт в мире само по себе после вставки:
//! - первые `wait_time` тиков ждёт (не сжимается, не действует)
//! - затем каждый тик меняет радиус на `radius_per_tick`
//! - каждые 5 тиков применяет свои эффекты к существам внутри радиуса,
//!   не чаще раза в `reapplication_delay` тиков на существо
//! - умирает при radius < 0.5 или по истечении `wait_time + duration`

use bevy::math::bounding::{Aabb3d, IntersectsVolume};
use bevy::prelude::*;
use std::collections::HashMap;

use crate::components::{Creature, Health};
use crate::impact::damage::{add_lasting_effect, DamageEvents, DamageSource, Dead};
use crate::potion::{effect_list_color, ActiveEffects, PotionType, StatusEffect};

/// Минимальный радиус живого облака
pub const MIN_CLOUD_RADIUS: f32 = 0.5;

/// Период применения эффектов (тиков)
pub const CLOUD_PULSE_INTERVAL: i32 = 5;

/// Интенсивность мгновенных эффектов облака
pub const CLOUD_INSTANT_INTENSITY: f64 = 0.5;

/// Высота облака (блоков)
pub const CLOUD_HEIGHT: f32 = 0.5;

/// Что произошло с облаком за тик
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudTick {
    Waiting,
    Idle,
    /// Пора применять эффекты
    Pulse,
    Expired,
}

#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct AreaEffectCloud {
    /// Кто бросил (не владеющая ссылка)
    pub owner: Option<Entity>,
    pub potion: PotionType,
    effects: Vec<StatusEffect>,
    custom_color: Option<i32>,
    pub radius: f32,
    pub radius_on_use: f32,
    pub radius_per_tick: f32,
    pub wait_time: i32,
    pub duration: i32,
    pub duration_on_use: i32,
    pub reapplication_delay: i32,
    age: i32,
    dead: bool,
    /// entity → тик, начиная с которого его снова можно задеть
    reapplication: HashMap<Entity, i32>,
}

impl Default for AreaEffectCloud {
    fn default() -> Self {
        Self {
            owner: None,
            potion: PotionType::Empty,
            effects: Vec::new(),
            custom_color: None,
            radius: 3.0,
            radius_on_use: 0.0,
            radius_per_tick: 0.0,
            wait_time: 20,
            duration: 600,
            duration_on_use: 0,
            reapplication_delay: 20,
            age: 0,
            dead: false,
            reapplication: HashMap::new(),
        }
    }
}

impl AreaEffectCloud {
    pub fn new(potion: PotionType) -> Self {
        Self {
            potion,
            ..Default::default()
        }
    }

    /// Добавляет собственную копию эффекта
    pub fn add_effect(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    pub fn effects(&self) -> &[StatusEffect] {
        &self.effects
    }

    pub fn set_color(&mut self, color: i32) {
        self.custom_color = Some(color);
    }

    /// Custom цвет или смесь цветов эффектов
    pub fn color(&self) -> i32 {
        self.custom_color.unwrap_or_else(|| effect_list_color(&self.effects))
    }

    pub fn has_custom_color(&self) -> bool {
        self.custom_color.is_some()
    }

    pub fn kill(&mut self) {
        self.dead = true;
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn is_waiting(&self) -> bool {
        self.age < self.wait_time
    }

    pub fn reapplication_pending(&self, entity: Entity) -> bool {
        self.reapplication.contains_key(&entity)
    }

    /// Один тик жизни облака
    pub fn advance(&mut self) -> CloudTick {
        if self.dead {
            return CloudTick::Expired;
        }

        self.age += 1;

        if self.age >= self.wait_time + self.duration {
            self.dead = true;
            return CloudTick::Expired;
        }

        if self.is_waiting() {
            return CloudTick::Waiting;
        }

        if self.radius_per_tick != 0.0 {
            self.radius += self.radius_per_tick;
            if self.radius < MIN_CLOUD_RADIUS {
                self.dead = true;
                return CloudTick::Expired;
            }
        }

        if self.age % CLOUD_PULSE_INTERVAL != 0 {
            return CloudTick::Idle;
        }

        let age = self.age;
        self.reapplication.retain(|_, until| age < *until);

        if self.effects.is_empty() {
            self.reapplication.clear();
            return CloudTick::Idle;
        }

        CloudTick::Pulse
    }

    /// Bounding box облака (цилиндр приближён коробкой)
    pub fn bounds(&self, center: Vec3) -> Aabb3d {
        let half = Vec3::new(self.radius, CLOUD_HEIGHT / 2.0, self.radius);
        Aabb3d::new(center + Vec3::new(0.0, CLOUD_HEIGHT / 2.0, 0.0), half)
    }

    /// Горизонтальное расстояние до ног существа ≤ радиуса
    pub fn covers(&self, center: Vec3, feet: Vec3) -> bool {
        let dx = feet.x - center.x;
        let dz = feet.z - center.z;
        dx * dx + dz * dz <= self.radius * self.radius
    }

    /// Отметить, что существо задето; false — облако при этом умерло
    pub fn mark_used(&mut self, entity: Entity) -> bool {
        self.reapplication.insert(entity, self.age + self.reapplication_delay);

        if self.radius_on_use != 0.0 {
            self.radius += self.radius_on_use;
            if self.radius < MIN_CLOUD_RADIUS {
                self.dead = true;
                return false;
            }
        }

        if self.duration_on_use != 0 {
            self.duration += self.duration_on_use;
            if self.duration <= 0 {
                self.dead = true;
                return false;
            }
        }

        true
    }
}

/// Система: жизненный цикл вставленных облаков
pub fn tick_area_effect_clouds(
    mut commands: Commands,
    mut clouds: Query<(Entity, &Transform, &mut AreaEffectCloud)>,
    mut targets: Query<
        (Entity, &Transform, &Creature, &mut Health, &mut ActiveEffects),
        (Without<AreaEffectCloud>, Without<Dead>),
    >,
    mut damage: DamageEvents,
) {
    for (cloud_entity, transform, mut cloud) in clouds.iter_mut() {
        match cloud.advance() {
            CloudTick::Expired => {
                commands.entity(cloud_entity).despawn();
                continue;
            }
            CloudTick::Waiting | CloudTick::Idle => continue,
            CloudTick::Pulse => {}
        }

        let center = transform.translation;
        let bounds = cloud.bounds(center);
        let effects = cloud.effects().to_vec();
        let source = DamageSource::IndirectMagic {
            source: cloud_entity,
            owner: cloud.owner,
        };

        for (target, target_transform, creature, mut health, mut active) in targets.iter_mut() {
            if !health.is_alive()
                || !creature.kind.can_be_hit_with_potion()
                || cloud.reapplication_pending(target)
            {
                continue;
            }

            let feet = target_transform.translation;
            if !creature.bounds_at(feet).intersects(&bounds) || !cloud.covers(center, feet) {
                continue;
            }

            for effect in &effects {
                if !health.is_alive() {
                    break;
                }

                if effect.kind.is_instant() {
                    damage.apply_instant(effect, CLOUD_INSTANT_INTENSITY, target, creature, &mut health, source);
                } else {
                    add_lasting_effect(creature, &mut active, effect.clone());
                }
            }

            if !cloud.mark_used(target) {
                break;
            }
        }

        if cloud.is_dead() {
            crate::logger::log(&format!("☁️ Cloud {:?} used up", cloud_entity));
            commands.entity(cloud_entity).despawn();
        }
    }
}
