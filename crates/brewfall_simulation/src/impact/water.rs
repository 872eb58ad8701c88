//! Простая вода: тушение огня и урон водочувствительным существам
//!
//! Этот путь не проходит через veto hooks.

use bevy::prelude::*;

use super::damage::DamageSource;
use super::events::{WorldSignal, SIGNAL_FIRE_EXTINGUISHED};
use super::world::{splash_bounds, ImpactWorld};
use crate::components::{BlockKind, Face};
use crate::config::{SPLASH_RADIUS_SQ, WATER_DAMAGE};

impl ImpactWorld<'_, '_> {
    /// Если в `pos` огонь — гасим его (мир получает соседнюю клетку и
    /// противоположную грань, как при тушении игроком)
    pub fn extinguish_fires(&mut self, pos: IVec3, face: Face) -> bool {
        if self.blocks.get(pos) != BlockKind::Fire {
            return false;
        }

        let extinguished = self.blocks.extinguish_fire(None, pos + face.offset(), face.opposite());
        if extinguished {
            self.signals.write(WorldSignal {
                code: SIGNAL_FIRE_EXTINGUISHED,
                pos,
                data: 0,
            });
        }
        extinguished
    }

    /// Тушение вокруг точки удара: клетка перед гранью + 4 горизонтальных соседа
    pub fn extinguish_around(&mut self, block: IVec3, face: Face) -> usize {
        let base = block + face.offset();
        let mut count = usize::from(self.extinguish_fires(base, face));

        for side in Face::HORIZONTAL {
            count += usize::from(self.extinguish_fires(base + side.offset(), side));
        }

        count
    }

    /// Урон 1.0 каждому водочувствительному существу в радиусе
    pub fn apply_water(&mut self, origin: Vec3) -> usize {
        let candidates = self.entities_within(&splash_bounds(origin), |c| c.kind.is_water_sensitive());
        let mut hurt = 0;

        for (entity, feet) in candidates {
            if f64::from(origin.distance_squared(feet)) >= SPLASH_RADIUS_SQ {
                continue;
            }

            let Ok((_, _, _, mut health, _)) = self.creatures.get_mut(entity) else {
                continue;
            };

            self.damage.hurt(entity, &mut health, WATER_DAMAGE, DamageSource::Drown);
            hurt += 1;
        }

        hurt
    }
}
