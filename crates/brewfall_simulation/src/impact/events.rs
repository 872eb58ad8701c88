//! Impact events: вход от trajectory-слоя и сигналы наружу
//!
//! - PotionImpact (trajectory → ECS): снаряд с зельем во что-то попал
//! - WorldSignal (ECS → render/sound): визуальный/звуковой сигнал мира

use bevy::prelude::*;

use crate::components::Face;

/// Сигнал: брызги зелья без мгновенного эффекта
pub const SIGNAL_SPLASH_POTION: i32 = 2002;

/// Сигнал: брызги зелья с мгновенным эффектом
pub const SIGNAL_INSTANT_SPLASH_POTION: i32 = 2007;

/// Сигнал: шипение потушенного огня
pub const SIGNAL_FIRE_EXTINGUISHED: i32 = 1009;

/// Результат trajectory-запроса (во что попал снаряд)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactResult {
    /// Попадание в блок: позиция блока + грань, в которую пришёлся удар
    Block { pos: IVec3, face: Face, point: Vec3 },
    /// Прямое попадание в существо (получит полную интенсивность)
    Entity { entity: Entity, point: Vec3 },
}

impl ImpactResult {
    pub fn struck_entity(&self) -> Option<Entity> {
        match self {
            ImpactResult::Entity { entity, .. } => Some(*entity),
            ImpactResult::Block { .. } => None,
        }
    }
}

/// Event: снаряд с зельем столкнулся (доставляется один раз на снаряд)
#[derive(Event, Debug, Clone)]
pub struct PotionImpact {
    pub projectile: Entity,
    pub hit: ImpactResult,
}

/// Event: сигнал мира (звук + частицы на клиенте)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct WorldSignal {
    pub code: i32,
    pub pos: IVec3,
    pub data: i32,
}

impl WorldSignal {
    /// Терминальный сигнал разбитой бутылки
    pub fn potion_break(has_instant: bool, pos: IVec3, color: i32) -> Self {
        Self {
            code: if has_instant {
                SIGNAL_INSTANT_SPLASH_POTION
            } else {
                SIGNAL_SPLASH_POTION
            },
            pos,
            data: color,
        }
    }

    pub fn is_potion_break(&self) -> bool {
        self.code == SIGNAL_SPLASH_POTION || self.code == SIGNAL_INSTANT_SPLASH_POTION
    }
}
