//! Tests for impact resolution (RunSystemOnce на headless App)

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use bevy::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::area::AreaEffectCloud;
    use crate::components::{BlockGrid, BlockKind, CreatureKind, Face, Health};
    use crate::config::ImpactConfig;
    use crate::impact::{
        despawn_dead_projectiles, resolve_potion_impacts, AffectedSet, DamageSource, DamageTaken, Dead,
        EntityDied, ImpactHook, ImpactHooks, ImpactPlugin, ImpactResult, LingeringSplashEvent, PotionImpact,
        PotionSplashEvent, ThrownPotion, WorldSignal, SIGNAL_FIRE_EXTINGUISHED, SIGNAL_INSTANT_SPLASH_POTION,
        SIGNAL_SPLASH_POTION,
    };
    use crate::potion::{
        ActiveEffects, EffectKind, PotionItem, PotionItemKind, PotionType, StatusEffect, PLAIN_POTION_COLOR,
        UNINITIALIZED_POTION_COLOR,
    };
    use crate::{create_headless_app, spawn_creature, spawn_thrown_potion};

    const ORIGIN: Vec3 = Vec3::new(0.0, 64.0, 0.0);

    /// Hook, который только записывает, что видел
    #[derive(Clone, Default)]
    struct Recorder {
        splashes: Arc<Mutex<Vec<AffectedSet>>>,
        clouds: Arc<AtomicUsize>,
    }

    impl ImpactHook for Recorder {
        fn on_potion_splash(&self, event: &mut PotionSplashEvent) {
            self.splashes.lock().unwrap().push(event.affected().clone());
        }

        fn on_lingering_splash(&self, _event: &mut LingeringSplashEvent) {
            self.clouds.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct CancelEverything;

    impl ImpactHook for CancelEverything {
        fn on_potion_splash(&self, event: &mut PotionSplashEvent) {
            event.set_cancelled(true);
        }

        fn on_lingering_splash(&self, event: &mut LingeringSplashEvent) {
            event.set_cancelled(true);
        }
    }

    struct KillCloud;

    impl ImpactHook for KillCloud {
        fn on_lingering_splash(&self, event: &mut LingeringSplashEvent) {
            event.cloud.kill();
        }
    }

    /// Оставляет только одну цель, с полной интенсивностью
    struct Focus(Entity);

    impl ImpactHook for Focus {
        fn on_potion_splash(&self, event: &mut PotionSplashEvent) {
            let others: Vec<Entity> = event.affected().keys().copied().filter(|e| *e != self.0).collect();
            for entity in others {
                event.remove(entity);
            }
            event.set_intensity(self.0, 1.0);
        }
    }

    fn setup() -> App {
        let mut app = create_headless_app();
        app.add_plugins(ImpactPlugin);
        app
    }

    fn register(app: &mut App, hook: impl ImpactHook + 'static) {
        app.world_mut().resource_mut::<ImpactHooks>().register(hook);
    }

    fn block_hit() -> ImpactResult {
        ImpactResult::Block {
            pos: IVec3::new(0, 63, 0),
            face: Face::Up,
            point: ORIGIN,
        }
    }

    fn throw(app: &mut App, item: PotionItem, thrower: Option<Entity>, hit: ImpactResult) -> Entity {
        let projectile = spawn_thrown_potion(app.world_mut(), item, thrower, ORIGIN);
        app.world_mut().send_event(PotionImpact { projectile, hit });
        projectile
    }

    fn resolve(app: &mut App) {
        app.world_mut()
            .run_system_once(resolve_potion_impacts)
            .expect("resolve_potion_impacts runs");
    }

    fn signals(app: &App) -> Vec<WorldSignal> {
        app.world()
            .resource::<Events<WorldSignal>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    fn terminal_signals(app: &App) -> Vec<WorldSignal> {
        signals(app).into_iter().filter(WorldSignal::is_potion_break).collect()
    }

    fn damage_events(app: &App) -> Vec<DamageTaken> {
        app.world()
            .resource::<Events<DamageTaken>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    fn clouds(app: &mut App) -> Vec<(AreaEffectCloud, Vec3)> {
        let mut query = app.world_mut().query::<(&AreaEffectCloud, &Transform)>();
        query
            .iter(app.world())
            .map(|(cloud, transform)| (cloud.clone(), transform.translation))
            .collect()
    }

    fn health(app: &App, entity: Entity) -> f32 {
        app.world().get::<Health>(entity).expect("creature has health").current
    }

    fn effects(app: &App, entity: Entity) -> ActiveEffects {
        app.world().get::<ActiveEffects>(entity).expect("creature has effects").clone()
    }

    #[test]
    fn test_plain_water_extinguishes_fire_around_hit() {
        let mut app = setup();
        let recorder = Recorder::default();
        register(&mut app, recorder.clone());

        let base = IVec3::new(0, 64, 0);
        {
            let mut blocks = app.world_mut().resource_mut::<BlockGrid>();
            blocks.set(base, BlockKind::Fire);
            for side in Face::HORIZONTAL {
                blocks.set(base + side.offset(), BlockKind::Fire);
            }
            blocks.set(IVec3::new(2, 64, 0), BlockKind::Fire);
        }

        let projectile = throw(&mut app, PotionItem::splash(PotionType::Water), None, block_hit());
        resolve(&mut app);

        let blocks = app.world().resource::<BlockGrid>();
        assert_eq!(blocks.get(base), BlockKind::Air);
        for side in Face::HORIZONTAL {
            assert_eq!(blocks.get(base + side.offset()), BlockKind::Air, "{:?} neighbour", side);
        }
        // Дальний огонь не задет
        assert_eq!(blocks.get(IVec3::new(2, 64, 0)), BlockKind::Fire);

        let all = signals(&app);
        assert_eq!(all.iter().filter(|s| s.code == SIGNAL_FIRE_EXTINGUISHED).count(), 5);

        let terminal = terminal_signals(&app);
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].code, SIGNAL_SPLASH_POTION);
        assert_eq!(terminal[0].pos, base);
        assert_eq!(terminal[0].data, PLAIN_POTION_COLOR);

        // Вода не проходит через veto hooks
        assert!(recorder.splashes.lock().unwrap().is_empty());
        assert!(app.world().get::<ThrownPotion>(projectile).unwrap().is_dead());
        assert!(app.world().get::<Dead>(projectile).is_some());
    }

    #[test]
    fn test_plain_water_on_entity_hit_does_not_touch_blocks() {
        let mut app = setup();
        let villager = spawn_creature(app.world_mut(), CreatureKind::Villager, ORIGIN);
        app.world_mut()
            .resource_mut::<BlockGrid>()
            .set(IVec3::new(0, 64, 0), BlockKind::Fire);

        throw(
            &mut app,
            PotionItem::splash(PotionType::Water),
            None,
            ImpactResult::Entity { entity: villager, point: ORIGIN },
        );
        resolve(&mut app);

        assert_eq!(app.world().resource::<BlockGrid>().count(BlockKind::Fire), 1);
        assert_eq!(health(&app, villager), 20.0);
        assert_eq!(terminal_signals(&app).len(), 1);
    }

    #[test]
    fn test_plain_water_hurts_only_water_sensitive_in_radius() {
        let mut app = setup();
        let near_enderman = spawn_creature(app.world_mut(), CreatureKind::Enderman, Vec3::new(0.0, 64.0, -3.5));
        let far_blaze = spawn_creature(app.world_mut(), CreatureKind::Blaze, Vec3::new(4.2, 64.0, 0.0));
        let zombie = spawn_creature(app.world_mut(), CreatureKind::Zombie, Vec3::new(1.0, 64.0, 0.0));

        throw(&mut app, PotionItem::splash(PotionType::Water), None, block_hit());
        resolve(&mut app);

        assert_eq!(health(&app, near_enderman), 39.0);
        // d² = 17.64 — за радиусом, хотя bounding box'ы пересекаются
        assert_eq!(health(&app, far_blaze), 20.0);
        assert_eq!(health(&app, zombie), 20.0);

        let damage = damage_events(&app);
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].target, near_enderman);
        assert_eq!(damage[0].source, DamageSource::Drown);
        assert_eq!(damage[0].attacker, None);
    }

    #[test]
    fn test_splash_intensity_and_direct_hit() {
        let mut app = setup();
        let recorder = Recorder::default();
        register(&mut app, recorder.clone());

        let struck = spawn_creature(app.world_mut(), CreatureKind::Cow, Vec3::new(0.0, 64.0, 3.0));
        let bystander = spawn_creature(app.world_mut(), CreatureKind::Villager, Vec3::new(2.0, 64.0, 0.0));
        let stand = spawn_creature(app.world_mut(), CreatureKind::ArmorStand, Vec3::new(1.0, 64.0, 0.0));
        let outside = spawn_creature(app.world_mut(), CreatureKind::Villager, Vec3::new(3.0, 64.0, 3.0));

        throw(
            &mut app,
            PotionItem::splash(PotionType::Swiftness),
            None,
            ImpactResult::Entity { entity: struck, point: Vec3::new(0.0, 64.5, 3.0) },
        );
        resolve(&mut app);

        let splashes = recorder.splashes.lock().unwrap();
        assert_eq!(splashes.len(), 1);
        let affected = &splashes[0];
        assert_eq!(affected.get(&struck), Some(&1.0));
        assert_eq!(affected.get(&bystander), Some(&0.5));
        assert!(!affected.contains_key(&stand));
        assert!(!affected.contains_key(&outside));

        assert_eq!(effects(&app, struck).get(EffectKind::Speed).map(|e| e.duration), Some(3600));
        assert_eq!(effects(&app, bystander).get(EffectKind::Speed).map(|e| e.duration), Some(1800));
        assert!(effects(&app, stand).is_empty());
        assert!(effects(&app, outside).is_empty());
    }

    #[test]
    fn test_scaled_duration_floor() {
        let mut app = setup();
        let villager = spawn_creature(app.world_mut(), CreatureKind::Villager, Vec3::new(2.0, 64.0, 0.0));

        let item = PotionItem::splash(PotionType::Awkward)
            .with_effect(StatusEffect::new(EffectKind::Speed, 41))
            .with_effect(StatusEffect::new(EffectKind::Slowness, 40));
        throw(&mut app, item, None, block_hit());
        resolve(&mut app);

        let active = effects(&app, villager);
        assert_eq!(active.get(EffectKind::Speed).map(|e| e.duration), Some(21));
        assert!(!active.contains(EffectKind::Slowness));
    }

    #[test]
    fn test_instant_effects_heal_and_harm() {
        let mut app = setup();
        let thrower = spawn_creature(app.world_mut(), CreatureKind::Player, Vec3::new(-10.0, 64.0, 0.0));
        let villager = spawn_creature(app.world_mut(), CreatureKind::Villager, ORIGIN);
        let zombie = spawn_creature(app.world_mut(), CreatureKind::Zombie, Vec3::new(2.0, 64.0, 0.0));
        app.world_mut().get_mut::<Health>(villager).unwrap().current = 5.0;

        let projectile = throw(
            &mut app,
            PotionItem::splash(PotionType::StrongHealing),
            Some(thrower),
            ImpactResult::Entity { entity: villager, point: ORIGIN },
        );
        resolve(&mut app);

        // 4 << 1 = 8 лечения при прямом попадании
        assert_eq!(health(&app, villager), 13.0);
        // Нежить: (6 << 1) * 0.5 + 0.5 → 6 урона
        assert_eq!(health(&app, zombie), 14.0);

        let damage = damage_events(&app);
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].target, zombie);
        assert_eq!(damage[0].attacker, Some(thrower));
        assert_eq!(
            damage[0].source,
            DamageSource::IndirectMagic { source: projectile, owner: Some(thrower) }
        );

        let terminal = terminal_signals(&app);
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].code, SIGNAL_INSTANT_SPLASH_POTION);
    }

    fn died_events(app: &App) -> Vec<EntityDied> {
        app.world()
            .resource::<Events<EntityDied>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    #[test]
    fn test_killed_creature_is_not_healed_back() {
        let mut app = setup();
        let villager = spawn_creature(app.world_mut(), CreatureKind::Villager, ORIGIN);
        app.world_mut().get_mut::<Health>(villager).unwrap().current = 3.0;
        let direct = ImpactResult::Entity { entity: villager, point: ORIGIN };

        throw(&mut app, PotionItem::splash(PotionType::StrongHarming), None, direct);
        resolve(&mut app);

        assert_eq!(health(&app, villager), 0.0);
        assert!(app.world().get::<Dead>(villager).is_some());

        let healing = PotionItem::splash(PotionType::StrongHealing)
            .with_effect(StatusEffect::new(EffectKind::Speed, 300));
        throw(&mut app, healing, None, direct);
        resolve(&mut app);

        assert_eq!(health(&app, villager), 0.0);
        assert!(effects(&app, villager).is_empty());
        assert!(app.world().get::<Dead>(villager).is_some());

        let died = died_events(&app);
        assert_eq!(died.len(), 1);
        assert_eq!(died[0].entity, villager);
        assert_eq!(terminal_signals(&app).len(), 2);
    }

    #[test]
    fn test_kill_and_heal_in_same_tick() {
        let mut app = setup();
        let villager = spawn_creature(app.world_mut(), CreatureKind::Villager, ORIGIN);
        app.world_mut().get_mut::<Health>(villager).unwrap().current = 3.0;
        let direct = ImpactResult::Entity { entity: villager, point: ORIGIN };

        // Оба удара разрешаются одним запуском системы, Dead ещё не вставлен
        throw(&mut app, PotionItem::splash(PotionType::StrongHarming), None, direct);
        throw(&mut app, PotionItem::splash(PotionType::StrongRegeneration), None, direct);
        resolve(&mut app);

        assert_eq!(health(&app, villager), 0.0);
        assert!(effects(&app, villager).is_empty());
        assert!(app.world().get::<Dead>(villager).is_some());
        assert_eq!(died_events(&app).len(), 1);
    }

    #[test]
    fn test_pvp_denylist_when_pvp_disabled() {
        let mut app = setup();
        app.world_mut().insert_resource(ImpactConfig::default().with_pvp(false));

        let thrower = spawn_creature(app.world_mut(), CreatureKind::Player, Vec3::new(-10.0, 64.0, 0.0));
        let target = spawn_creature(app.world_mut(), CreatureKind::Player, Vec3::new(1.0, 64.0, 0.0));
        let villager = spawn_creature(app.world_mut(), CreatureKind::Villager, Vec3::new(-1.0, 64.0, 0.0));

        let item = PotionItem::splash(PotionType::Poison)
            .with_effect(StatusEffect::new(EffectKind::Speed, 900))
            .with_effect(StatusEffect::new(EffectKind::InstantDamage, 1));
        throw(&mut app, item, Some(thrower), block_hit());
        resolve(&mut app);

        let active = effects(&app, target);
        assert!(active.contains(EffectKind::Speed));
        assert!(!active.contains(EffectKind::Poison));
        assert_eq!(health(&app, target), 20.0);

        // Не-игроков правило не касается
        assert!(effects(&app, villager).contains(EffectKind::Poison));
        assert!(health(&app, villager) < 20.0);
    }

    #[test]
    fn test_pvp_enabled_applies_everything() {
        let mut app = setup();

        let thrower = spawn_creature(app.world_mut(), CreatureKind::Player, Vec3::new(-10.0, 64.0, 0.0));
        let target = spawn_creature(app.world_mut(), CreatureKind::Player, Vec3::new(1.0, 64.0, 0.0));

        let item = PotionItem::splash(PotionType::Poison).with_effect(StatusEffect::new(EffectKind::InstantDamage, 1));
        throw(&mut app, item, Some(thrower), block_hit());
        resolve(&mut app);

        // intensity 0.75: poison 900 → 675, урон 6 * 0.75 + 0.5 → 5
        assert_eq!(effects(&app, target).get(EffectKind::Poison).map(|e| e.duration), Some(675));
        assert_eq!(health(&app, target), 15.0);
    }

    #[test]
    fn test_cancelled_splash_still_terminates() {
        let mut app = setup();
        register(&mut app, CancelEverything);
        let villager = spawn_creature(app.world_mut(), CreatureKind::Villager, Vec3::new(1.0, 64.0, 0.0));

        let projectile = throw(&mut app, PotionItem::splash(PotionType::StrongHarming), None, block_hit());
        resolve(&mut app);

        assert_eq!(health(&app, villager), 20.0);
        assert!(effects(&app, villager).is_empty());
        assert_eq!(terminal_signals(&app).len(), 1);
        assert!(app.world().get::<ThrownPotion>(projectile).unwrap().is_dead());
    }

    #[test]
    fn test_hook_can_narrow_and_boost_targets() {
        let mut app = setup();
        let favourite = spawn_creature(app.world_mut(), CreatureKind::Villager, Vec3::new(3.0, 64.0, 0.0));
        let ignored = spawn_creature(app.world_mut(), CreatureKind::Villager, Vec3::new(-1.0, 64.0, 0.0));
        register(&mut app, Focus(favourite));

        throw(&mut app, PotionItem::splash(PotionType::Swiftness), None, block_hit());
        resolve(&mut app);

        // Без hook'а было бы 0.25 → 900
        assert_eq!(effects(&app, favourite).get(EffectKind::Speed).map(|e| e.duration), Some(3600));
        assert!(effects(&app, ignored).is_empty());
    }

    #[test]
    fn test_hook_fires_for_effectless_splash() {
        let mut app = setup();
        let recorder = Recorder::default();
        register(&mut app, recorder.clone());
        let villager = spawn_creature(app.world_mut(), CreatureKind::Villager, Vec3::new(1.0, 64.0, 0.0));

        throw(&mut app, PotionItem::splash(PotionType::Awkward), None, block_hit());
        resolve(&mut app);

        let splashes = recorder.splashes.lock().unwrap();
        assert_eq!(splashes.len(), 1);
        assert!(splashes[0].contains_key(&villager));
        assert!(effects(&app, villager).is_empty());

        let terminal = terminal_signals(&app);
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].data, PLAIN_POTION_COLOR);
    }

    #[test]
    fn test_lingering_spawns_cloud_instead_of_splash() {
        let mut app = setup();
        let recorder = Recorder::default();
        register(&mut app, recorder.clone());
        let thrower = spawn_creature(app.world_mut(), CreatureKind::Player, Vec3::new(-10.0, 64.0, 0.0));
        let villager = spawn_creature(app.world_mut(), CreatureKind::Villager, Vec3::new(1.0, 64.0, 0.0));

        let item = PotionItem::lingering(PotionType::Regeneration)
            .with_effect(StatusEffect::new(EffectKind::Glowing, 200))
            .with_color(0x00FF00);
        let projectile = throw(&mut app, item, Some(thrower), block_hit());
        resolve(&mut app);

        assert!(recorder.splashes.lock().unwrap().is_empty());
        assert_eq!(recorder.clouds.load(Ordering::SeqCst), 1);
        // Брызг нет — существо не задето сразу
        assert!(effects(&app, villager).is_empty());

        let spawned = clouds(&mut app);
        assert_eq!(spawned.len(), 1);
        let (cloud, position) = &spawned[0];
        assert_eq!(*position, ORIGIN);
        assert_eq!(cloud.owner, Some(thrower));
        assert_eq!(cloud.radius, 3.0);
        assert_eq!(cloud.radius_on_use, -0.5);
        assert_eq!(cloud.wait_time, 10);
        assert!((cloud.radius_per_tick - (-3.0 / cloud.duration as f32)).abs() < 1e-7);
        assert_eq!(cloud.color(), 0x00FF00);

        let kinds: Vec<EffectKind> = cloud.effects().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EffectKind::Regeneration, EffectKind::Glowing]);

        let terminal = terminal_signals(&app);
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].data, 0x00FF00);
        assert!(app.world().get::<ThrownPotion>(projectile).unwrap().is_dead());
    }

    #[test]
    fn test_lingering_water_is_plain_not_cloud() {
        let mut app = setup();
        app.world_mut()
            .resource_mut::<BlockGrid>()
            .set(IVec3::new(0, 64, 0), BlockKind::Fire);

        throw(&mut app, PotionItem::lingering(PotionType::Water), None, block_hit());
        resolve(&mut app);

        // Lingering-вода — plain: огонь тушится, облака нет
        assert_eq!(app.world().resource::<BlockGrid>().count(BlockKind::Fire), 0);
        assert!(clouds(&mut app).is_empty());
    }

    #[test]
    fn test_cloud_veto_suppresses_spawn() {
        let mut app = setup();
        register(&mut app, CancelEverything);

        let projectile = throw(&mut app, PotionItem::lingering(PotionType::Poison), None, block_hit());
        resolve(&mut app);

        assert!(clouds(&mut app).is_empty());
        assert_eq!(terminal_signals(&app).len(), 1);
        assert!(app.world().get::<ThrownPotion>(projectile).unwrap().is_dead());
    }

    #[test]
    fn test_cloud_killed_by_hook_is_not_spawned() {
        let mut app = setup();
        register(&mut app, KillCloud);

        throw(&mut app, PotionItem::lingering(PotionType::Poison), None, block_hit());
        resolve(&mut app);

        assert!(clouds(&mut app).is_empty());
        assert_eq!(terminal_signals(&app).len(), 1);
    }

    #[test]
    fn test_second_impact_is_ignored() {
        let mut app = setup();
        let villager = spawn_creature(app.world_mut(), CreatureKind::Villager, Vec3::new(1.0, 64.0, 0.0));

        let projectile = throw(&mut app, PotionItem::splash(PotionType::Harming), None, block_hit());
        app.world_mut().send_event(PotionImpact { projectile, hit: block_hit() });
        resolve(&mut app);

        // intensity 0.75: 6 * 0.75 + 0.5 → 5, только один раз
        assert_eq!(health(&app, villager), 15.0);
        assert_eq!(terminal_signals(&app).len(), 1);
    }

    #[test]
    fn test_anomalous_payload_resolves_as_uninitialized_splash() {
        let mut app = setup();
        let recorder = Recorder::default();
        register(&mut app, recorder.clone());

        let drinkable = PotionItem::new(PotionItemKind::Potion, PotionType::Healing);
        throw(&mut app, drinkable, None, block_hit());
        resolve(&mut app);

        assert_eq!(recorder.splashes.lock().unwrap().len(), 1);
        let terminal = terminal_signals(&app);
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].code, SIGNAL_SPLASH_POTION);
        assert_eq!(terminal[0].data, UNINITIALIZED_POTION_COLOR);
    }

    #[test]
    fn test_dead_projectiles_are_despawned() {
        let mut app = setup();
        let projectile = throw(&mut app, PotionItem::splash(PotionType::Water), None, block_hit());
        let untouched = spawn_thrown_potion(app.world_mut(), PotionItem::splash(PotionType::Water), None, ORIGIN);

        resolve(&mut app);
        app.world_mut()
            .run_system_once(despawn_dead_projectiles)
            .expect("despawn_dead_projectiles runs");

        assert!(app.world().get_entity(projectile).is_err());
        assert!(app.world().get_entity(untouched).is_ok());
    }
}
