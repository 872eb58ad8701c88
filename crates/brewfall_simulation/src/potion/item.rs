//! Payload: предмет-зелье, который несёт брошенный снаряд
//!
//! Классификация payload'а при ударе — чистая функция `classify`.

use serde::{Deserialize, Serialize};

use super::effect::{EffectKind, StatusEffect};
use super::potion_type::PotionType;

/// Цвет для неинициализированного зелья (`PotionType::Empty`)
pub const UNINITIALIZED_POTION_COLOR: i32 = 0xF800F8;

/// Цвет бутылки без эффектов (вода, mundane, ...)
pub const PLAIN_POTION_COLOR: i32 = 0x385DC6;

/// Вид носителя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotionItemKind {
    /// Обычное (питьевое) зелье — бросить его нельзя
    Potion,
    SplashPotion,
    LingeringPotion,
}

impl PotionItemKind {
    pub fn is_throwable(self) -> bool {
        matches!(self, PotionItemKind::SplashPotion | PotionItemKind::LingeringPotion)
    }
}

/// Предмет-зелье
///
/// Полный список эффектов = базовые эффекты `potion` + `custom_effects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotionItem {
    pub kind: PotionItemKind,
    #[serde(default = "default_count")]
    pub count: u8,
    #[serde(default)]
    pub potion: PotionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_effects: Vec<StatusEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<i32>,
}

fn default_count() -> u8 {
    1
}

impl Default for PotionItem {
    /// Fallback для снаряда без предмета: splash-бутылка без тега
    fn default() -> Self {
        Self::new(PotionItemKind::SplashPotion, PotionType::Empty)
    }
}

impl PotionItem {
    pub fn new(kind: PotionItemKind, potion: PotionType) -> Self {
        Self {
            kind,
            count: 1,
            potion,
            custom_effects: Vec::new(),
            custom_color: None,
        }
    }

    pub fn splash(potion: PotionType) -> Self {
        Self::new(PotionItemKind::SplashPotion, potion)
    }

    pub fn lingering(potion: PotionType) -> Self {
        Self::new(PotionItemKind::LingeringPotion, potion)
    }

    pub fn with_effect(mut self, effect: StatusEffect) -> Self {
        self.custom_effects.push(effect);
        self
    }

    pub fn with_color(mut self, color: i32) -> Self {
        self.custom_color = Some(color);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_lingering(&self) -> bool {
        self.kind == PotionItemKind::LingeringPotion
    }

    /// Базовые + custom эффекты (свежие копии)
    pub fn full_effects(&self) -> Vec<StatusEffect> {
        let mut effects = self.potion.effects();
        effects.extend(self.custom_effects.iter().cloned());
        effects
    }

    /// Цвет для визуального сигнала
    pub fn color(&self) -> i32 {
        if let Some(color) = self.custom_color {
            return color;
        }

        if self.potion == PotionType::Empty {
            return UNINITIALIZED_POTION_COLOR;
        }

        effect_list_color(&self.full_effects())
    }
}

/// Смешивание цветов жидкостей, вес = amplifier + 1
///
/// Эффекты со скрытыми частицами не участвуют; если таких нет — 0.
pub fn effect_list_color(effects: &[StatusEffect]) -> i32 {
    if effects.is_empty() {
        return PLAIN_POTION_COLOR;
    }

    let (mut r, mut g, mut b, mut weight) = (0.0f32, 0.0f32, 0.0f32, 0u32);

    for effect in effects.iter().filter(|e| e.show_particles) {
        let color = effect.kind.liquid_color();
        let n = u32::from(effect.amplifier) + 1;

        r += (n as f32) * ((color >> 16) & 255) as f32 / 255.0;
        g += (n as f32) * ((color >> 8) & 255) as f32 / 255.0;
        b += (n as f32) * (color & 255) as f32 / 255.0;
        weight += n;
    }

    if weight == 0 {
        return 0;
    }

    let w = weight as f32;
    let r = (r / w * 255.0) as i32;
    let g = (g / w * 255.0) as i32;
    let b = (b / w * 255.0) as i32;

    (r << 16) | (g << 8) | b
}

/// Результат классификации payload'а
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadClass {
    pub potion: PotionType,
    pub effects: Vec<StatusEffect>,
    /// Нейтральная вода без эффектов
    pub is_plain: bool,
    pub is_lingering: bool,
    /// Мгновенный эффект у самого типа жидкости (выбор кода сигнала)
    pub has_instant: bool,
}

impl PayloadClass {
    pub fn contains(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|effect| effect.kind == kind)
    }
}

/// Классификация payload'а (читается ровно один раз на удар)
pub fn classify(item: &PotionItem) -> PayloadClass {
    let effects = item.full_effects();
    let is_plain = item.potion.is_water() && effects.is_empty();

    PayloadClass {
        potion: item.potion,
        is_plain,
        is_lingering: item.is_lingering(),
        has_instant: item.potion.has_instant_effect(),
        effects,
    }
}
