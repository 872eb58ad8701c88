//! Area effects — облака lingering-зелий
//!
//! Создаются при ударе (impact::cloud), дальше живут сами по себе
//! в `tick_area_effect_clouds`.

pub mod cloud;


pub use cloud::*;
