//! Brewfall Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: брошенные зелья, брызги, облака.
//!
//! Границы крейта:
//! - ECS = правила удара (классификация, интенсивность, эффекты, облака)
//! - Снаружи = полёт/raycast (шлёт PotionImpact), рендер/звук (читает WorldSignal),
//!   policy-плагины (регистрируют ImpactHook)

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

// Публичные модули
pub mod area;
pub mod components;
pub mod config;
pub mod impact;
pub mod logger;
pub mod potion;

// Re-export базовых типов для удобства
pub use area::{AreaEffectCloud, CloudTick};
pub use components::*;
pub use config::ImpactConfig;
pub use impact::{
    DamageSource, DamageTaken, Dead, EntityDied, ImpactHook, ImpactHooks, ImpactPlugin, ImpactResult,
    ImpactState, LingeringSplashEvent, PotionImpact, PotionSplashEvent, ThrownPotion, WorldSignal,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use potion::{ActiveEffects, EffectKind, PotionItem, PotionItemKind, PotionType, StatusEffect};

/// Частота simulation tick
pub const TICK_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .add_plugins(ImpactPlugin);
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время продвигается ровно на один fixed tick за `app.update()`,
/// поэтому прогон детерминирован и не зависит от wall clock.
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / TICK_HZ,
        )));

    app
}

/// Спавн существа с полным здоровьем для его вида
pub fn spawn_creature(world: &mut World, kind: CreatureKind, feet: Vec3) -> Entity {
    world
        .spawn((
            Creature::new(kind),
            Health::for_kind(kind),
            Transform::from_translation(feet),
        ))
        .id()
}

/// Спавн брошенной бутылки в точке удара (полёт — забота trajectory-слоя)
pub fn spawn_thrown_potion(world: &mut World, item: PotionItem, thrower: Option<Entity>, at: Vec3) -> Entity {
    world
        .spawn((ThrownPotion::new(item, thrower), Transform::from_translation(at)))
        .id()
}

/// Snapshot мира для сравнения детерминизма
///
/// Entities сортируются по index, компонент сериализуется через Debug.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
