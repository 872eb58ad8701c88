//! Impact module — разрешение удара брошенного зелья
//!
//! ECS ответственность:
//! - ThrownPotion state machine (Armed → Resolving → Terminated)
//! - Классификация payload'а, брызги, вода, облака
//! - Veto hooks (ImpactHooks resource), сигналы мира, урон
//!
//! Trajectory-слой (вне крейта) отвечает за полёт и raycast:
//! он шлёт `PotionImpact` ровно один раз на снаряд.

use bevy::prelude::*;

pub mod cloud;
pub mod damage;
pub mod events;
pub mod hooks;
pub mod projectile;
pub mod resolver;
pub mod splash;
pub mod water;
pub mod world;

#[cfg(test)]
mod resolver_tests;

pub use cloud::build_cloud;
pub use damage::{DamageEvents, DamageSource, DamageTaken, Dead, EntityDied, PVP_RESTRICTED_EFFECTS};
pub use events::{
    ImpactResult, PotionImpact, WorldSignal, SIGNAL_FIRE_EXTINGUISHED, SIGNAL_INSTANT_SPLASH_POTION,
    SIGNAL_SPLASH_POTION,
};
pub use hooks::{AffectedSet, ImpactHook, ImpactHooks, LingeringSplashEvent, PotionSplashEvent};
pub use projectile::{ImpactState, PersistenceError, ThrownPotion, POTION_RECORD_KEY};
pub use resolver::{despawn_dead_projectiles, resolve_potion_impacts};
pub use splash::{build_affected_set, pvp_blocks_effect, scaled_duration, splash_intensity, SplashOutcome};
pub use world::{splash_bounds, ImpactWorld};

use crate::area::tick_area_effect_clouds;
use crate::components::BlockGrid;
use crate::config::ImpactConfig;

/// Impact Plugin
///
/// Порядок выполнения (FixedUpdate, chain):
/// 1. resolve_potion_impacts — удары этого тика
/// 2. tick_area_effect_clouds — жизнь облаков (включая только что вставленные)
/// 3. despawn_dead_projectiles — уборка разбитых снарядов
pub struct ImpactPlugin;

impl Plugin for ImpactPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ImpactConfig>()
            .init_resource::<ImpactHooks>()
            .init_resource::<BlockGrid>();

        app.add_event::<PotionImpact>()
            .add_event::<WorldSignal>()
            .add_event::<DamageTaken>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (
                resolve_potion_impacts,
                tick_area_effect_clouds,
                despawn_dead_projectiles,
            )
                .chain(),
        );
    }
}
