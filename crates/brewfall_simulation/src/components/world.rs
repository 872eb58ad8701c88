//! Блоки мира: BlockGrid (resource), BlockKind, Face

use bevy::prelude::*;
use std::collections::HashMap;

/// Грань блока (направление от центра блока)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Face {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Face {
    /// Горизонтальные грани в каноническом порядке обхода
    pub const HORIZONTAL: [Face; 4] = [Face::North, Face::East, Face::South, Face::West];

    pub fn offset(self) -> IVec3 {
        match self {
            Face::Down => IVec3::NEG_Y,
            Face::Up => IVec3::Y,
            Face::North => IVec3::NEG_Z,
            Face::South => IVec3::Z,
            Face::West => IVec3::NEG_X,
            Face::East => IVec3::X,
        }
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::Down => Face::Up,
            Face::Up => Face::Down,
            Face::North => Face::South,
            Face::South => Face::North,
            Face::West => Face::East,
            Face::East => Face::West,
        }
    }
}

/// Содержимое клетки мира
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum BlockKind {
    #[default]
    Air,
    Fire,
    Stone,
    Grass,
}

/// Целочисленная позиция блока, содержащего точку
pub fn block_pos_of(point: Vec3) -> IVec3 {
    point.floor().as_ivec3()
}

/// Разреженная сетка блоков (всё, что не записано — воздух)
#[derive(Resource, Debug, Clone, Default)]
pub struct BlockGrid {
    blocks: HashMap<IVec3, BlockKind>,
}

impl BlockGrid {
    pub fn get(&self, pos: IVec3) -> BlockKind {
        self.blocks.get(&pos).copied().unwrap_or_default()
    }

    pub fn set(&mut self, pos: IVec3, block: BlockKind) {
        if block == BlockKind::Air {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
        }
    }

    /// Тушит огонь в соседней с `pos` клетке по грани `side`
    ///
    /// `actor` — игрок, погасивший огонь (None для снарядов).
    /// Возвращает true если огонь был и исчез.
    pub fn extinguish_fire(&mut self, actor: Option<Entity>, pos: IVec3, side: Face) -> bool {
        let target = pos + side.offset();

        if self.get(target) != BlockKind::Fire {
            return false;
        }

        self.set(target, BlockKind::Air);
        crate::logger::log(&format!(
            "🔥 Fire extinguished at {:?} (actor: {:?})",
            target, actor
        ));
        true
    }

    pub fn count(&self, block: BlockKind) -> usize {
        self.blocks.values().filter(|b| **b == block).count()
    }
}
