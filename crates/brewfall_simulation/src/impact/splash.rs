//! Splash distributor — раздача эффектов брызгами
//!
//! Порядок:
//! 1. Цели в расширенном bounding box'е, которых задевают зелья
//! 2. Интенсивность от расстояния (прямое попадание = 1.0)
//! 3. AffectedSet → veto hooks (могут отменить или сузить)
//! 4. Применение эффектов по интенсивностям, которые вернули hooks
//!
//! Формулы:
//! - intensity = 1 - sqrt(d²) / 4, цели с d² ≥ 16 отбрасываются
//! - длительность = round(intensity × duration), применяется только если > 20 тиков

use bevy::prelude::*;

use super::damage::{add_lasting_effect, is_pvp_restricted, DamageSource};
use super::events::ImpactResult;
use super::hooks::{AffectedSet, PotionSplashEvent};
use super::world::{splash_bounds, ImpactWorld};
use crate::components::CreatureKind;
use crate::config::{MIN_SPLASH_DURATION, SPLASH_RADIUS, SPLASH_RADIUS_SQ};
use crate::potion::{EffectKind, StatusEffect};

/// Итог раздачи брызг
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashOutcome {
    /// Hook отменил брызги, эффекты не применялись
    Cancelled,
    Applied { targets: usize, applications: usize },
}

/// Интенсивность по квадрату расстояния; None — цель вне радиуса
pub fn splash_intensity(distance_sq: f64) -> Option<f64> {
    if distance_sq >= SPLASH_RADIUS_SQ {
        return None;
    }
    Some(1.0 - distance_sq.sqrt() / SPLASH_RADIUS)
}

/// Длительность эффекта, масштабированная интенсивностью (округление half-up)
pub fn scaled_duration(intensity: f64, duration: i32) -> i32 {
    (intensity * f64::from(duration) + 0.5) as i32
}

/// Блокирует ли PvP-правило эффект для цели
///
/// Срабатывает только если PvP выключен, бросил игрок, цель — другой игрок
/// и эффект в denylist'е.
pub fn pvp_blocks_effect(
    pvp: bool,
    thrower: Option<(Entity, CreatureKind)>,
    target: (Entity, CreatureKind),
    kind: EffectKind,
) -> bool {
    if pvp {
        return false;
    }

    let Some((thrower, thrower_kind)) = thrower else {
        return false;
    };

    thrower_kind.is_player() && target.1.is_player() && target.0 != thrower && is_pvp_restricted(kind)
}

/// AffectedSet из кандидатов (entity, позиция ног)
pub fn build_affected_set(origin: Vec3, candidates: &[(Entity, Vec3)], direct_hit: Option<Entity>) -> AffectedSet {
    let mut affected = AffectedSet::new();

    for &(entity, feet) in candidates {
        let distance_sq = f64::from(origin.distance_squared(feet));

        let Some(intensity) = splash_intensity(distance_sq) else {
            continue;
        };

        let intensity = if direct_hit == Some(entity) { 1.0 } else { intensity };
        affected.insert(entity, intensity);
    }

    affected
}

impl ImpactWorld<'_, '_> {
    /// Брызги: veto hook вызывается всегда, даже для пустого списка эффектов
    pub fn apply_splash(
        &mut self,
        projectile: Entity,
        origin: Vec3,
        thrower: Option<Entity>,
        hit: &ImpactResult,
        effects: &[StatusEffect],
    ) -> SplashOutcome {
        let candidates = self.entities_within(&splash_bounds(origin), |c| c.kind.can_be_hit_with_potion());
        let affected = build_affected_set(origin, &candidates, hit.struck_entity());

        let mut event = PotionSplashEvent::new(projectile, thrower, affected);
        self.hooks.fire_splash(&mut event);

        if event.is_cancelled() {
            crate::logger::log(&format!("Splash of {:?} cancelled by hook", projectile));
            return SplashOutcome::Cancelled;
        }

        let affected = event.into_affected();
        if effects.is_empty() {
            return SplashOutcome::Applied {
                targets: affected.len(),
                applications: 0,
            };
        }

        let pvp = self.config.pvp;
        let thrower_kind = thrower
            .and_then(|t| self.creatures.get(t).ok())
            .map(|(entity, _, creature, _, _)| (entity, creature.kind));
        let source = DamageSource::IndirectMagic {
            source: projectile,
            owner: thrower,
        };

        let mut applications = 0;

        for (&target, &intensity) in &affected {
            // Hook мог подсунуть не-существо
            let Ok((_, _, creature, mut health, mut active)) = self.creatures.get_mut(target) else {
                continue;
            };

            for effect in effects {
                if !health.is_alive() {
                    break;
                }

                if pvp_blocks_effect(pvp, thrower_kind, (target, creature.kind), effect.kind) {
                    continue;
                }

                if effect.kind.is_instant() {
                    self.damage
                        .apply_instant(effect, intensity, target, creature, &mut health, source);
                    applications += 1;
                    continue;
                }

                let duration = scaled_duration(intensity, effect.duration);
                if duration > MIN_SPLASH_DURATION
                    && add_lasting_effect(creature, &mut active, effect.with_duration(duration))
                {
                    applications += 1;
                }
            }
        }

        crate::logger::log(&format!(
            "💧 Splash {:?}: {} targets, {} effect applications",
            projectile,
            affected.len(),
            applications
        ));

        SplashOutcome::Applied {
            targets: affected.len(),
            applications,
        }
    }
}
