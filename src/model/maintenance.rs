use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceLogDto {
    pub id: i32,
    pub description: String,
    pub date: NaiveDate,
    pub resolved: bool,
    pub order_id: i32,
    pub technician_id: i32,
    pub created_at: NaiveDateTime,
    /// Devices inspected during the visit
    pub devices: Vec<MaintenanceDeviceDto>,
}

impl MaintenanceLogDto {
    pub fn from_models(
        log: entity::maintenance_log::Model,
        devices: Vec<entity::maintenance_device::Model>,
    ) -> Self {
        Self {
            id: log.id,
            description: log.description,
            date: log.date,
            resolved: log.resolved,
            order_id: log.order_id,
            technician_id: log.technician_id,
            created_at: log.created_at,
            devices: devices.into_iter().map(MaintenanceDeviceDto::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceDeviceDto {
    pub id: i32,
    pub installed_device_id: i32,
    pub notes: Option<String>,
    pub require_replacement: bool,
    pub is_fixed: bool,
}

impl From<entity::maintenance_device::Model> for MaintenanceDeviceDto {
    fn from(device: entity::maintenance_device::Model) -> Self {
        Self {
            id: device.id,
            installed_device_id: device.installed_device_id,
            notes: device.notes,
            require_replacement: device.require_replacement,
            is_fixed: device.is_fixed,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateMaintenanceLogDto {
    pub order_id: i32,
    #[validate(length(min = 1, max = 1000))]
    pub description: String,
    pub date: NaiveDate,
    #[validate]
    #[serde(default)]
    pub devices: Vec<MaintenanceDeviceFormDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct MaintenanceDeviceFormDto {
    pub installed_device_id: i32,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    #[serde(default)]
    pub require_replacement: bool,
    #[serde(default)]
    pub is_fixed: bool,
}
