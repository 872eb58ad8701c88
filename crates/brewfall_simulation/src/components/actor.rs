//! Базовые компоненты существ: Creature, CreatureKind, Health

use bevy::math::bounding::Aabb3d;
use bevy::prelude::*;

use crate::potion::{ActiveEffects, EffectKind};

/// Вид существа (определяет размеры и особые правила)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum CreatureKind {
    Player,
    Villager,
    Cow,
    Zombie,
    Skeleton,
    Enderman,
    Blaze,
    /// Не живое по сути: зелья его не задевают
    ArmorStand,
}

impl CreatureKind {
    /// (ширина, высота) bounding box'а
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            CreatureKind::Player => (0.6, 1.8),
            CreatureKind::Villager => (0.6, 1.95),
            CreatureKind::Cow => (0.9, 1.4),
            CreatureKind::Zombie => (0.6, 1.95),
            CreatureKind::Skeleton => (0.6, 1.99),
            CreatureKind::Enderman => (0.6, 2.9),
            CreatureKind::Blaze => (0.6, 1.8),
            CreatureKind::ArmorStand => (0.5, 1.975),
        }
    }

    pub fn max_health(self) -> f32 {
        match self {
            CreatureKind::Player | CreatureKind::Villager | CreatureKind::Zombie
            | CreatureKind::Skeleton | CreatureKind::Blaze => 20.0,
            CreatureKind::Cow => 10.0,
            CreatureKind::Enderman => 40.0,
            CreatureKind::ArmorStand => 20.0,
        }
    }

    pub fn is_player(self) -> bool {
        self == CreatureKind::Player
    }

    pub fn is_undead(self) -> bool {
        matches!(self, CreatureKind::Zombie | CreatureKind::Skeleton)
    }

    /// Может ли splash-зелье/облако задеть существо
    pub fn can_be_hit_with_potion(self) -> bool {
        self != CreatureKind::ArmorStand
    }

    /// Водочувствительные существа: получают урон от простой воды
    pub fn is_water_sensitive(self) -> bool {
        matches!(self, CreatureKind::Enderman | CreatureKind::Blaze)
    }

    /// Нежить не принимает регенерацию и яд
    pub fn accepts_effect(self, kind: EffectKind) -> bool {
        !(self.is_undead() && matches!(kind, EffectKind::Regeneration | EffectKind::Poison))
    }
}

/// Живое существо
///
/// Автоматически добавляет Health, ActiveEffects, Transform через Required Components.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Health, ActiveEffects, Transform)]
pub struct Creature {
    pub kind: CreatureKind,
}

impl Creature {
    pub fn new(kind: CreatureKind) -> Self {
        Self { kind }
    }

    /// Bounding box существа, `feet` — позиция ног (центр основания)
    pub fn bounds_at(&self, feet: Vec3) -> Aabb3d {
        let (width, height) = self.kind.dimensions();
        let half = Vec3::new(width / 2.0, height / 2.0, width / 2.0);
        Aabb3d::new(feet + Vec3::new(0.0, height / 2.0, 0.0), half)
    }
}

/// Здоровье существа
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(20.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn for_kind(kind: CreatureKind) -> Self {
        Self::new(kind.max_health())
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Возвращает фактически снятое здоровье
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current - amount.max(0.0)).max(0.0);
        before - self.current
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }
}
