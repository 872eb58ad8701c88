//! Potion domain — содержимое бутылок и статус-эффекты
//!
//! Содержит:
//! - EffectKind / StatusEffect / ActiveEffects (effect.rs)
//! - PotionType + базовые эффекты (potion_type.rs)
//! - PotionItem, classify, цвет (item.rs)

pub mod effect;
pub mod item;
pub mod potion_type;

pub use effect::*;
pub use item::*;
pub use potion_type::*;
