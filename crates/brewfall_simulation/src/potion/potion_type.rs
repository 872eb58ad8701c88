//! Типы жидкости (PotionType) и их базовые эффекты

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::effect::{EffectKind, StatusEffect};

/// Тип жидкости в бутылке
///
/// `Empty` — sentinel для предмета без тега (неинициализированное зелье).
/// `Water` — нейтральная жидкость: без эффектов, тушит огонь и жжёт
/// водочувствительных существ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotionType {
    #[default]
    Empty,
    Water,
    Mundane,
    Thick,
    Awkward,
    NightVision,
    LongNightVision,
    Invisibility,
    LongInvisibility,
    Leaping,
    LongLeaping,
    StrongLeaping,
    FireResistance,
    LongFireResistance,
    Swiftness,
    LongSwiftness,
    StrongSwiftness,
    Slowness,
    LongSlowness,
    WaterBreathing,
    LongWaterBreathing,
    Healing,
    StrongHealing,
    Harming,
    StrongHarming,
    Poison,
    LongPoison,
    StrongPoison,
    Regeneration,
    LongRegeneration,
    StrongRegeneration,
    Strength,
    LongStrength,
    StrongStrength,
    Weakness,
    LongWeakness,
    Luck,
}

impl PotionType {
    /// Базовые эффекты типа (свежие копии на каждый вызов)
    pub fn effects(self) -> Vec<StatusEffect> {
        use EffectKind as K;

        let (kind, duration, amplifier) = match self {
            PotionType::Empty
            | PotionType::Water
            | PotionType::Mundane
            | PotionType::Thick
            | PotionType::Awkward => return Vec::new(),
            PotionType::NightVision => (K::NightVision, 3600, 0),
            PotionType::LongNightVision => (K::NightVision, 9600, 0),
            PotionType::Invisibility => (K::Invisibility, 3600, 0),
            PotionType::LongInvisibility => (K::Invisibility, 9600, 0),
            PotionType::Leaping => (K::JumpBoost, 3600, 0),
            PotionType::LongLeaping => (K::JumpBoost, 9600, 0),
            PotionType::StrongLeaping => (K::JumpBoost, 1800, 1),
            PotionType::FireResistance => (K::FireResistance, 3600, 0),
            PotionType::LongFireResistance => (K::FireResistance, 9600, 0),
            PotionType::Swiftness => (K::Speed, 3600, 0),
            PotionType::LongSwiftness => (K::Speed, 9600, 0),
            PotionType::StrongSwiftness => (K::Speed, 1800, 1),
            PotionType::Slowness => (K::Slowness, 1800, 0),
            PotionType::LongSlowness => (K::Slowness, 4800, 0),
            PotionType::WaterBreathing => (K::WaterBreathing, 3600, 0),
            PotionType::LongWaterBreathing => (K::WaterBreathing, 9600, 0),
            PotionType::Healing => (K::InstantHealth, 1, 0),
            PotionType::StrongHealing => (K::InstantHealth, 1, 1),
            PotionType::Harming => (K::InstantDamage, 1, 0),
            PotionType::StrongHarming => (K::InstantDamage, 1, 1),
            PotionType::Poison => (K::Poison, 900, 0),
            PotionType::LongPoison => (K::Poison, 1800, 0),
            PotionType::StrongPoison => (K::Poison, 432, 1),
            PotionType::Regeneration => (K::Regeneration, 900, 0),
            PotionType::LongRegeneration => (K::Regeneration, 1800, 0),
            PotionType::StrongRegeneration => (K::Regeneration, 450, 1),
            PotionType::Strength => (K::Strength, 3600, 0),
            PotionType::LongStrength => (K::Strength, 9600, 0),
            PotionType::StrongStrength => (K::Strength, 1800, 1),
            PotionType::Weakness => (K::Weakness, 1800, 0),
            PotionType::LongWeakness => (K::Weakness, 4800, 0),
            PotionType::Luck => (K::Luck, 6000, 0),
        };

        vec![StatusEffect::new(kind, duration).with_amplifier(amplifier)]
    }

    /// Есть ли среди базовых эффектов мгновенный
    pub fn has_instant_effect(self) -> bool {
        self.effects().iter().any(|effect| effect.kind.is_instant())
    }

    pub fn is_water(self) -> bool {
        self == PotionType::Water
    }
}
