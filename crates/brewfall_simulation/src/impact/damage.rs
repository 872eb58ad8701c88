//! Урон и лечение от зелий
//!
//! Health меняется только через `DamageEvents`, чтобы каждый удар
//! сопровождался событием DamageTaken (+ EntityDied при смерти).

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::components::{Creature, Health};
use crate::potion::{ActiveEffects, EffectKind, InstantOutcome, StatusEffect};

/// Источник урона
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    /// Контакт с водой (водочувствительные существа)
    Drown,
    /// Магия через посредника: бутылка или облако, `owner` — кто бросил
    IndirectMagic { source: Entity, owner: Option<Entity> },
}

impl DamageSource {
    pub fn attacker(&self) -> Option<Entity> {
        match self {
            DamageSource::Drown => None,
            DamageSource::IndirectMagic { owner, .. } => *owner,
        }
    }
}

/// Событие: существо получило урон
#[derive(Event, Debug, Clone)]
pub struct DamageTaken {
    pub target: Entity,
    pub attacker: Option<Entity>,
    pub amount: f32,
    pub source: DamageSource,
    pub target_died: bool,
}

/// Событие: существо умерло (health <= 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв
///
/// Для снарядов — "разбит", удаляется `despawn_dead_projectiles`.
/// Для существ — убит зельем: брызги и облака его больше не видят.
#[derive(Component, Debug)]
pub struct Dead;

/// Writers для урона (общие для брызг и облаков)
#[derive(SystemParam)]
pub struct DamageEvents<'w, 's> {
    commands: Commands<'w, 's>,
    taken: EventWriter<'w, DamageTaken>,
    died: EventWriter<'w, EntityDied>,
}

impl DamageEvents<'_, '_> {
    /// Наносит урон и генерирует DamageTaken / EntityDied
    ///
    /// Убитое существо получает маркер `Dead`.
    pub fn hurt(&mut self, target: Entity, health: &mut Health, amount: f32, source: DamageSource) {
        if amount <= 0.0 || !health.is_alive() {
            return;
        }

        let dealt = health.take_damage(amount);
        let died = !health.is_alive();

        self.taken.write(DamageTaken {
            target,
            attacker: source.attacker(),
            amount: dealt,
            source,
            target_died: died,
        });

        if died {
            self.died.write(EntityDied {
                entity: target,
                killer: source.attacker(),
            });
            self.commands.entity(target).insert(Dead);
            crate::logger::log_info(&format!("Entity {:?} killed by {:?}", target, source));
        }
    }

    /// Мгновенный эффект (лечение/урон) с масштабом `intensity`
    ///
    /// Мёртвых не лечит: 0 HP остаётся 0 HP.
    pub fn apply_instant(
        &mut self,
        effect: &StatusEffect,
        intensity: f64,
        target: Entity,
        creature: &Creature,
        health: &mut Health,
        source: DamageSource,
    ) {
        match effect.kind.instant_outcome(effect.amplifier, intensity, creature.kind.is_undead()) {
            InstantOutcome::Heal(amount) if health.is_alive() => health.heal(amount),
            InstantOutcome::Heal(_) => {}
            InstantOutcome::Harm(amount) => self.hurt(target, health, amount, source),
            InstantOutcome::Nothing => {}
        }
    }
}

/// Добавляет длительный эффект, если существо его принимает
pub fn add_lasting_effect(creature: &Creature, effects: &mut ActiveEffects, effect: StatusEffect) -> bool {
    debug_assert!(!effect.kind.is_instant());

    if !creature.kind.accepts_effect(effect.kind) {
        return false;
    }

    effects.add(effect);
    true
}

/// Denylist для PvP: эти эффекты не действуют игрок → другой игрок,
/// когда PvP на сервере выключен
pub const PVP_RESTRICTED_EFFECTS: [EffectKind; 7] = [
    EffectKind::Slowness,
    EffectKind::MiningFatigue,
    EffectKind::InstantDamage,
    EffectKind::Blindness,
    EffectKind::Hunger,
    EffectKind::Weakness,
    EffectKind::Poison,
];

pub fn is_pvp_restricted(kind: EffectKind) -> bool {
    PVP_RESTRICTED_EFFECTS.contains(&kind)
}
