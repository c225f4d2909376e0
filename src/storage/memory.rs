//! Process-local cafe table.

use crate::domain::cafe::{Cafe, CafeField, FieldKind, NewCafe};
use crate::storage::{CafeStore, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Cafe>,
}

/// In-memory [`CafeStore`] with the same constraints as the SQL table.
#[derive(Default)]
pub struct MemoryCafeStore {
    table: RwLock<Table>,
}

impl MemoryCafeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn text_column(cafe: &Cafe, field: CafeField) -> &str {
    match field {
        CafeField::Name => &cafe.name,
        CafeField::MapUrl => &cafe.map_url,
        CafeField::ImgUrl => &cafe.img_url,
        CafeField::Location => &cafe.location,
        CafeField::Seats => &cafe.seats,
        CafeField::CoffeePrice => &cafe.coffee_price,
        // Guarded by the caller.
        CafeField::HasToilet
        | CafeField::HasWifi
        | CafeField::HasSockets
        | CafeField::CanTakeCalls => "",
    }
}

#[async_trait]
impl CafeStore for MemoryCafeStore {
    async fn insert(&self, cafe: NewCafe) -> Result<Cafe, StoreError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|row| row.name == cafe.name) {
            return Err(StoreError::UniqueViolation(CafeField::Name.as_str().to_string()));
        }
        table.next_id += 1;
        let cafe = cafe.into_cafe(table.next_id);
        table.rows.insert(cafe.id, cafe.clone());
        Ok(cafe)
    }

    async fn update(&self, cafe: &Cafe) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&cafe.id) {
            return Ok(false);
        }
        if table
            .rows
            .values()
            .any(|row| row.id != cafe.id && row.name == cafe.name)
        {
            return Err(StoreError::UniqueViolation(CafeField::Name.as_str().to_string()));
        }
        table.rows.insert(cafe.id, cafe.clone());
        Ok(true)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Cafe>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn query_by_field(&self, field: CafeField, value: &str) -> Result<Vec<Cafe>, StoreError> {
        if !matches!(field.kind(), FieldKind::Text | FieldKind::Url | FieldKind::Price) {
            return Err(StoreError::UnsupportedFilter(field));
        }
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|row| text_column(row, field) == value)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Cafe>, StoreError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
