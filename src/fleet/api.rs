//! In-memory stand-in for the dashboard's REST-like API.
//!
//! Each entity lives in a [`Collection`] offering the four operations the
//! views call: create, update, list and deactivate. Methods are `async` so
//! callers treat them exactly like the network client they replace.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use super::maintenance::MaintenanceScheduleDraft;
use super::trucks::TruckDraft;
use super::work_orders::WorkOrderDraft;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("{kind} {id} is deactivated")]
    Inactive { kind: &'static str, id: Uuid },
}

/// Payload types the API stores.
pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    const KIND: &'static str;

    /// Key that must be unique among active records, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }
}

/// Stored entity with server-assigned metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<T> {
    pub id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: T,
}

pub struct Collection<T> {
    records: Mutex<Vec<Record<T>>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, data: T) -> Result<Record<T>, ApiError> {
        let mut records = self.records.lock();
        Self::ensure_unique(&records, &data, None)?;
        let now = Utc::now();
        let record = Record {
            id: Uuid::new_v4(),
            active: true,
            created_at: now,
            updated_at: now,
            data,
        };
        records.push(record.clone());
        debug!(kind = T::KIND, id = %record.id, "record created");
        Ok(record)
    }

    pub async fn update(&self, id: Uuid, data: T) -> Result<Record<T>, ApiError> {
        let mut records = self.records.lock();
        Self::ensure_unique(&records, &data, Some(id))?;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(ApiError::NotFound { kind: T::KIND, id })?;
        if !record.active {
            return Err(ApiError::Inactive { kind: T::KIND, id });
        }
        record.data = data;
        record.updated_at = Utc::now();
        debug!(kind = T::KIND, %id, "record updated");
        Ok(record.clone())
    }

    pub async fn get(&self, id: Uuid) -> Result<Record<T>, ApiError> {
        self.records
            .lock()
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(ApiError::NotFound { kind: T::KIND, id })
    }

    /// Every record, deactivated ones included, in creation order.
    pub async fn list(&self) -> Vec<Record<T>> {
        self.records.lock().clone()
    }

    pub async fn list_active(&self) -> Vec<Record<T>> {
        self.records
            .lock()
            .iter()
            .filter(|record| record.active)
            .cloned()
            .collect()
    }

    /// Soft-deletes a record. Deactivating twice is a no-op.
    pub async fn deactivate(&self, id: Uuid) -> Result<Record<T>, ApiError> {
        let mut records = self.records.lock();
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(ApiError::NotFound { kind: T::KIND, id })?;
        if record.active {
            record.active = false;
            record.updated_at = Utc::now();
            debug!(kind = T::KIND, %id, "record deactivated");
        }
        Ok(record.clone())
    }

    fn ensure_unique(records: &[Record<T>], data: &T, skip: Option<Uuid>) -> Result<(), ApiError> {
        let Some(key) = data.unique_key() else {
            return Ok(());
        };
        let clash = records.iter().any(|record| {
            record.active
                && Some(record.id) != skip
                && record.data.unique_key().as_deref() == Some(key.as_str())
        });
        if clash {
            warn!(kind = T::KIND, key = %key, "unique key conflict");
            Err(ApiError::Conflict(format!("{} `{}` already exists", T::KIND, key)))
        } else {
            Ok(())
        }
    }
}

/// All collections behind the dashboard.
#[derive(Default)]
pub struct FleetApi {
    pub trucks: Collection<TruckDraft>,
    pub work_orders: Collection<WorkOrderDraft>,
    pub schedules: Collection<MaintenanceScheduleDraft>,
}

impl FleetApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrations of active trucks, for uniqueness checks in the wizard.
    pub async fn active_registrations(&self) -> std::collections::HashSet<String> {
        self.trucks
            .list_active()
            .await
            .into_iter()
            .map(|record| record.data.registration)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::trucks::FuelType;

    fn truck(registration: &str) -> TruckDraft {
        TruckDraft {
            registration: registration.into(),
            make: "Scania".into(),
            model: "R450".into(),
            year: 2019,
            fuel_type: FuelType::Diesel,
            capacity_tonnes: 18.0,
            axle_count: 3,
            depot: "South".into(),
            driver: None,
            active: true,
        }
    }

    #[tokio::test]
    async fn create_then_list() {
        let api = FleetApi::new();
        let record = api.trucks.create(truck("AB-123")).await.unwrap();
        assert!(record.active);
        assert_eq!(record.created_at, record.updated_at);
        let listed = api.trucks.list().await;
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let api = FleetApi::new();
        api.trucks.create(truck("AB-123")).await.unwrap();
        let err = api.trucks.create(truck("ab 123")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(message) if message.contains("AB123")));
    }

    #[tokio::test]
    async fn deactivated_records_free_their_key_and_refuse_updates() {
        let api = FleetApi::new();
        let first = api.trucks.create(truck("AB-123")).await.unwrap();
        let gone = api.trucks.deactivate(first.id).await.unwrap();
        assert!(!gone.active);
        assert!(api.trucks.list_active().await.is_empty());

        api.trucks.create(truck("AB-123")).await.unwrap();
        let err = api.trucks.update(first.id, truck("XY-9")).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Inactive {
                kind: "truck",
                id: first.id
            }
        );
    }

    #[tokio::test]
    async fn update_keeps_own_key_and_bumps_timestamp() {
        let api = FleetApi::new();
        let record = api.trucks.create(truck("AB-123")).await.unwrap();
        let mut changed = truck("AB-123");
        changed.depot = "North".into();
        let updated = api.trucks.update(record.id, changed).await.unwrap();
        assert_eq!(updated.data.depot, "North");
        assert!(updated.updated_at >= record.updated_at);
        assert_eq!(api.trucks.get(record.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let api = FleetApi::new();
        let id = Uuid::new_v4();
        assert_eq!(
            api.trucks.deactivate(id).await.unwrap_err(),
            ApiError::NotFound { kind: "truck", id }
        );
        assert!(api.work_orders.get(id).await.is_err());
    }
}
