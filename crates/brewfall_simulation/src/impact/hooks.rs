//! Veto hooks — синхронные policy-callback'и для брызг и облаков
//!
//! Hook получает мутабельное событие до применения эффектов и может:
//! - отменить операцию целиком (`set_cancelled(true)`)
//! - убрать цели или поменять их интенсивность (только брызги)
//!
//! Hooks вызываются в порядке регистрации, все видят изменения предыдущих.

use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::area::AreaEffectCloud;

/// Цели брызг → интенсивность в (0, 1]
pub type AffectedSet = BTreeMap<Entity, f64>;

/// Событие: бутылка разбилась, цели посчитаны, эффекты ещё не применены
#[derive(Debug, Clone)]
pub struct PotionSplashEvent {
    pub projectile: Entity,
    pub thrower: Option<Entity>,
    affected: AffectedSet,
    cancelled: bool,
}

impl PotionSplashEvent {
    pub fn new(projectile: Entity, thrower: Option<Entity>, affected: AffectedSet) -> Self {
        Self {
            projectile,
            thrower,
            affected,
            cancelled: false,
        }
    }

    pub fn affected(&self) -> &AffectedSet {
        &self.affected
    }

    pub fn intensity(&self, entity: Entity) -> Option<f64> {
        self.affected.get(&entity).copied()
    }

    /// Интенсивность ≤ 0 убирает цель, больше 1 обрезается до 1
    pub fn set_intensity(&mut self, entity: Entity, intensity: f64) {
        if intensity <= 0.0 {
            self.affected.remove(&entity);
        } else {
            self.affected.insert(entity, intensity.min(1.0));
        }
    }

    pub fn remove(&mut self, entity: Entity) -> Option<f64> {
        self.affected.remove(&entity)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    pub fn into_affected(self) -> AffectedSet {
        self.affected
    }
}

/// Событие: lingering-бутылка разбилась, облако построено, но не вставлено в мир
#[derive(Debug)]
pub struct LingeringSplashEvent<'a> {
    pub projectile: Entity,
    pub cloud: &'a mut AreaEffectCloud,
    cancelled: bool,
}

impl<'a> LingeringSplashEvent<'a> {
    pub fn new(projectile: Entity, cloud: &'a mut AreaEffectCloud) -> Self {
        Self {
            projectile,
            cloud,
            cancelled: false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// Policy hook (плагины, защита регионов, античит)
///
/// Обе реакции по умолчанию ничего не делают.
pub trait ImpactHook: Send + Sync {
    fn on_potion_splash(&self, _event: &mut PotionSplashEvent) {}

    fn on_lingering_splash(&self, _event: &mut LingeringSplashEvent) {}
}

/// Зарегистрированные hooks (resource)
#[derive(Resource, Default)]
pub struct ImpactHooks {
    hooks: Vec<Box<dyn ImpactHook>>,
}

impl ImpactHooks {
    pub fn register(&mut self, hook: impl ImpactHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn fire_splash(&self, event: &mut PotionSplashEvent) {
        for hook in &self.hooks {
            hook.on_potion_splash(event);
        }
    }

    pub fn fire_lingering(&self, event: &mut LingeringSplashEvent) {
        for hook in &self.hooks {
            hook.on_lingering_splash(event);
        }
    }
}
