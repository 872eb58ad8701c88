//! Конфигурация разрешения ударов (resource)
//!
//! Серверные правила передаются явно через `ImpactConfig` resource.

use bevy::prelude::*;

/// Радиус брызг (в блоках); квадрат — порог отсечения целей
pub const SPLASH_RADIUS: f64 = 4.0;

/// Порог квадрата расстояния: цели с d² ≥ 16 не задеваются
pub const SPLASH_RADIUS_SQ: f64 = SPLASH_RADIUS * SPLASH_RADIUS;

/// Расширение bounding box'а снаряда для spatial query (x, y, z)
pub const SPLASH_QUERY_GROWTH: Vec3 = Vec3::new(4.0, 2.0, 4.0);

/// Размер брошенного снаряда (куб)
pub const THROWN_SIZE: f32 = 0.25;

/// Минимальная масштабированная длительность (тиков), эффект с меньшей или равной отбрасывается
pub const MIN_SPLASH_DURATION: i32 = 20;

/// Урон от воды водочувствительным существам
pub const WATER_DAMAGE: f32 = 1.0;

/// Правила сервера для зелий
#[derive(Resource, Debug, Clone)]
pub struct ImpactConfig {
    /// PvP разрешён. Если false — вредные эффекты (denylist) не действуют
    /// игрок → другой игрок.
    pub pvp: bool,
    /// Начальный радиус облака lingering-зелья
    pub cloud_radius: f32,
    /// Изменение радиуса облака на каждое задетое существо
    pub cloud_radius_on_use: f32,
    /// Тиков до начала действия/сжатия облака
    pub cloud_wait_time: i32,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            pvp: true,
            cloud_radius: 3.0,
            cloud_radius_on_use: -0.5,
            cloud_wait_time: 10,
        }
    }
}

impl ImpactConfig {
    pub fn with_pvp(mut self, pvp: bool) -> Self {
        self.pvp = pvp;
        self
    }
}
