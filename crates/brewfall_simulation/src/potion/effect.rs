//! Status effects: виды эффектов, экземпляры и активные эффекты на существе
//!
//! `StatusEffect` — value type. Clone = полноценная копия (облако и цель
//! никогда не делят один экземпляр).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Вид статус-эффекта
///
/// Числовые id стабильны (сохраняются в старых мирах), см. `id()` / `from_id()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Speed,
    Slowness,
    Haste,
    MiningFatigue,
    Strength,
    InstantHealth,
    InstantDamage,
    JumpBoost,
    Nausea,
    Regeneration,
    Resistance,
    FireResistance,
    WaterBreathing,
    Invisibility,
    Blindness,
    NightVision,
    Hunger,
    Weakness,
    Poison,
    Wither,
    HealthBoost,
    Absorption,
    Saturation,
    Glowing,
    Levitation,
    Luck,
    Unluck,
}

impl EffectKind {
    pub const ALL: [EffectKind; 27] = [
        EffectKind::Speed,
        EffectKind::Slowness,
        EffectKind::Haste,
        EffectKind::MiningFatigue,
        EffectKind::Strength,
        EffectKind::InstantHealth,
        EffectKind::InstantDamage,
        EffectKind::JumpBoost,
        EffectKind::Nausea,
        EffectKind::Regeneration,
        EffectKind::Resistance,
        EffectKind::FireResistance,
        EffectKind::WaterBreathing,
        EffectKind::Invisibility,
        EffectKind::Blindness,
        EffectKind::NightVision,
        EffectKind::Hunger,
        EffectKind::Weakness,
        EffectKind::Poison,
        EffectKind::Wither,
        EffectKind::HealthBoost,
        EffectKind::Absorption,
        EffectKind::Saturation,
        EffectKind::Glowing,
        EffectKind::Levitation,
        EffectKind::Luck,
        EffectKind::Unluck,
    ];

    /// Стабильный числовой id (1..=27)
    pub fn id(self) -> u8 {
        match self {
            EffectKind::Speed => 1,
            EffectKind::Slowness => 2,
            EffectKind::Haste => 3,
            EffectKind::MiningFatigue => 4,
            EffectKind::Strength => 5,
            EffectKind::InstantHealth => 6,
            EffectKind::InstantDamage => 7,
            EffectKind::JumpBoost => 8,
            EffectKind::Nausea => 9,
            EffectKind::Regeneration => 10,
            EffectKind::Resistance => 11,
            EffectKind::FireResistance => 12,
            EffectKind::WaterBreathing => 13,
            EffectKind::Invisibility => 14,
            EffectKind::Blindness => 15,
            EffectKind::NightVision => 16,
            EffectKind::Hunger => 17,
            EffectKind::Weakness => 18,
            EffectKind::Poison => 19,
            EffectKind::Wither => 20,
            EffectKind::HealthBoost => 21,
            EffectKind::Absorption => 22,
            EffectKind::Saturation => 23,
            EffectKind::Glowing => 24,
            EffectKind::Levitation => 25,
            EffectKind::Luck => 26,
            EffectKind::Unluck => 27,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.id() == id)
    }

    /// Мгновенный эффект: применяется сразу, без длительности
    pub fn is_instant(self) -> bool {
        matches!(
            self,
            EffectKind::InstantHealth | EffectKind::InstantDamage | EffectKind::Saturation
        )
    }

    /// Цвет жидкости (0xRRGGBB), используется для смешивания цвета зелья
    pub fn liquid_color(self) -> i32 {
        match self {
            EffectKind::Speed => 8171462,
            EffectKind::Slowness => 5926017,
            EffectKind::Haste => 14270531,
            EffectKind::MiningFatigue => 4866583,
            EffectKind::Strength => 9643043,
            EffectKind::InstantHealth => 16262179,
            EffectKind::InstantDamage => 4393481,
            EffectKind::JumpBoost => 2293580,
            EffectKind::Nausea => 5578058,
            EffectKind::Regeneration => 13458603,
            EffectKind::Resistance => 10044730,
            EffectKind::FireResistance => 14981690,
            EffectKind::WaterBreathing => 3035801,
            EffectKind::Invisibility => 8356754,
            EffectKind::Blindness => 2039587,
            EffectKind::NightVision => 2039713,
            EffectKind::Hunger => 5797459,
            EffectKind::Weakness => 4738376,
            EffectKind::Poison => 5149489,
            EffectKind::Wither => 3484199,
            EffectKind::HealthBoost => 16284963,
            EffectKind::Absorption => 2445989,
            EffectKind::Saturation => 16262179,
            EffectKind::Glowing => 9740385,
            EffectKind::Levitation => 13565951,
            EffectKind::Luck => 3381504,
            EffectKind::Unluck => 12624973,
        }
    }

    /// Результат мгновенного эффекта для цели
    ///
    /// Формулы (amp = amplifier):
    /// - лечение: `(4 << amp) * intensity + 0.5`, усечение до целого
    /// - урон: `(6 << amp) * intensity + 0.5`, усечение до целого
    ///
    /// Нежить инвертирует лечение и урон.
    pub fn instant_outcome(self, amplifier: u8, intensity: f64, target_undead: bool) -> InstantOutcome {
        let heals = match self {
            EffectKind::InstantHealth => !target_undead,
            EffectKind::InstantDamage => target_undead,
            _ => return InstantOutcome::Nothing,
        };

        if heals {
            let amount = (intensity * f64::from(4i32.wrapping_shl(u32::from(amplifier))) + 0.5) as i32;
            InstantOutcome::Heal(amount.max(0) as f32)
        } else {
            let amount = (f64::from(6i32.wrapping_shl(u32::from(amplifier))) * intensity + 0.5) as i32;
            InstantOutcome::Harm(amount as f32)
        }
    }
}

/// Что сделать со здоровьем цели после мгновенного эффекта
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstantOutcome {
    Heal(f32),
    Harm(f32),
    Nothing,
}

/// Экземпляр эффекта (длительность в тиках)
#[derive(Debug, Clone, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    pub duration: i32,
    #[serde(default)]
    pub amplifier: u8,
    #[serde(default)]
    pub ambient: bool,
    #[serde(default = "default_show_particles")]
    pub show_particles: bool,
}

fn default_show_particles() -> bool {
    true
}

impl StatusEffect {
    pub fn new(kind: EffectKind, duration: i32) -> Self {
        Self {
            kind,
            duration,
            amplifier: 0,
            ambient: false,
            show_particles: true,
        }
    }

    pub fn with_amplifier(mut self, amplifier: u8) -> Self {
        self.amplifier = amplifier;
        self
    }

    pub fn ambient(mut self, ambient: bool) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.show_particles = false;
        self
    }

    /// Тот же эффект с другой длительностью (флаги сохраняются)
    pub fn with_duration(&self, duration: i32) -> Self {
        Self {
            duration,
            ..self.clone()
        }
    }

    /// Слияние с новым эффектом того же вида
    ///
    /// - больший amplifier заменяет amplifier и длительность
    /// - равный amplifier оставляет более длинную длительность
    /// - флаг частиц всегда берётся у нового эффекта
    pub fn combine(&mut self, other: &StatusEffect) {
        if other.amplifier > self.amplifier {
            self.amplifier = other.amplifier;
            self.duration = other.duration;
        } else if other.amplifier == self.amplifier && self.duration < other.duration {
            self.duration = other.duration;
        } else if !other.ambient && self.ambient && other.amplifier == self.amplifier {
            self.ambient = other.ambient;
        }

        self.show_particles = other.show_particles;
    }
}

/// Активные эффекты существа (один эффект на вид)
#[derive(Component, Debug, Clone, Default)]
pub struct ActiveEffects {
    effects: BTreeMap<EffectKind, StatusEffect>,
}

impl ActiveEffects {
    /// Добавить эффект (слияние с существующим того же вида)
    pub fn add(&mut self, effect: StatusEffect) {
        match self.effects.get_mut(&effect.kind) {
            Some(existing) => existing.combine(&effect),
            None => {
                self.effects.insert(effect.kind, effect);
            }
        }
    }

    pub fn get(&self, kind: EffectKind) -> Option<&StatusEffect> {
        self.effects.get(&kind)
    }

    pub fn contains(&self, kind: EffectKind) -> bool {
        self.effects.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.values()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
