//! ThrownPotion — брошенная бутылка с зельем
//!
//! Жизненный цикл: `Armed → Resolving → Terminated`. Удар разрешается
//! ровно один раз; повторный `PotionImpact` для того же снаряда игнорируется.
//!
//! Persistence: payload хранится в durable-записи под ключом `"Potion"`.

use bevy::prelude::*;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::potion::PotionItem;

/// Ключ payload'а в durable-записи снаряда
pub const POTION_RECORD_KEY: &str = "Potion";

/// Состояние разрешения удара
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ImpactState {
    #[default]
    Armed,
    Resolving,
    Terminated,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to encode potion item: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("malformed potion record: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Снаряд-зелье
///
/// `thrower` — не владеющая ссылка: бросивший может исчезнуть раньше снаряда.
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct ThrownPotion {
    item: Option<PotionItem>,
    pub thrower: Option<Entity>,
    state: ImpactState,
}

impl ThrownPotion {
    pub fn new(item: PotionItem, thrower: Option<Entity>) -> Self {
        let item = (!item.is_empty()).then_some(item);
        Self {
            item,
            thrower,
            state: ImpactState::Armed,
        }
    }

    pub fn state(&self) -> ImpactState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == ImpactState::Terminated
    }

    /// Raw слот предмета (None = снаряд без payload'а)
    pub fn item(&self) -> Option<&PotionItem> {
        self.item.as_ref()
    }

    /// Payload для удара
    ///
    /// Пустой/не-бросаемый предмет — аномалия данных: логируем и отдаём
    /// нейтральную splash-бутылку, разрешение удара продолжается.
    pub fn potion(&self, entity: Entity) -> PotionItem {
        match &self.item {
            Some(item) if item.kind.is_throwable() && !item.is_empty() => item.clone(),
            _ => {
                crate::logger::log_error(&format!("ThrownPotion entity {:?} has no item?!", entity));
                PotionItem::default()
            }
        }
    }

    /// `Armed → Resolving`; false если удар уже разрешался
    pub fn begin_resolving(&mut self) -> bool {
        if self.state != ImpactState::Armed {
            return false;
        }
        self.state = ImpactState::Resolving;
        true
    }

    /// Терминальное состояние (идемпотентно)
    pub fn set_dead(&mut self) {
        self.state = ImpactState::Terminated;
    }

    /// Запись payload'а; пустой payload не пишется вовсе
    pub fn write_to_record(&self, record: &mut Map<String, Value>) -> Result<(), PersistenceError> {
        match self.item.as_ref().filter(|item| !item.is_empty()) {
            Some(item) => {
                let value = serde_json::to_value(item).map_err(PersistenceError::Encode)?;
                record.insert(POTION_RECORD_KEY.to_string(), value);
            }
            None => {
                record.remove(POTION_RECORD_KEY);
            }
        }
        Ok(())
    }

    /// Чтение payload'а; отсутствующий/пустой/битый payload деактивирует снаряд
    ///
    /// Битая запись возвращается как `Err` (снаряд к этому моменту уже мёртв).
    pub fn read_from_record(&mut self, record: &Map<String, Value>) -> Result<(), PersistenceError> {
        let Some(value) = record.get(POTION_RECORD_KEY) else {
            crate::logger::log_warning("ThrownPotion record has no payload, deactivating");
            self.item = None;
            self.set_dead();
            return Ok(());
        };

        match decode_item(value) {
            Ok(item) if !item.is_empty() => {
                self.item = Some(item);
                Ok(())
            }
            Ok(_) => {
                crate::logger::log_warning("ThrownPotion record has empty payload, deactivating");
                self.item = None;
                self.set_dead();
                Ok(())
            }
            Err(err) => {
                crate::logger::log_warning(&format!("ThrownPotion record unreadable ({}), deactivating", err));
                self.item = None;
                self.set_dead();
                Err(err)
            }
        }
    }

    /// Восстановление снаряда из записи (thrower восстанавливает entity-framework)
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let mut potion = Self {
            item: None,
            thrower: None,
            state: ImpactState::Armed,
        };
        // Ошибка уже залогирована, снаряд деактивирован
        let _ = potion.read_from_record(record);
        potion
    }
}

fn decode_item(value: &Value) -> Result<PotionItem, PersistenceError> {
    serde_json::from_value(value.clone()).map_err(PersistenceError::Decode)
}
