use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    data::{Page, Repository},
    model::db::{MaintenanceDeviceModel, MaintenanceLogModel},
};

pub struct MaintenanceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MaintenanceRepository<'a, C> {
    /// Creates a new instance of [`MaintenanceRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn base(&self) -> Repository<'a, C, entity::maintenance_log::Entity> {
        Repository::new(self.db)
    }

    pub async fn create(
        &self,
        log: entity::maintenance_log::ActiveModel,
    ) -> Result<MaintenanceLogModel, DbErr> {
        self.base().save(log).await
    }

    pub async fn get(&self, log_id: i32) -> Result<Option<MaintenanceLogModel>, DbErr> {
        self.base().get_by_id(log_id).await
    }

    /// Number of logs written by the technician
    pub async fn count_for_technician(&self, technician_id: i32) -> Result<u64, DbErr> {
        entity::prelude::MaintenanceLog::find()
            .filter(entity::maintenance_log::Column::TechnicianId.eq(technician_id))
            .count(self.db)
            .await
    }

    pub async fn get_page(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<Page<MaintenanceLogModel>, DbErr> {
        self.base().get_with_pagination(page, page_size).await
    }

    /// Logs written by the technician
    pub async fn get_page_for_technician(
        &self,
        technician_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<Page<MaintenanceLogModel>, DbErr> {
        let select = entity::prelude::MaintenanceLog::find()
            .filter(entity::maintenance_log::Column::TechnicianId.eq(technician_id));

        self.base()
            .get_with_pagination_filtered(select, page, page_size)
            .await
    }

    /// Logs for orders placed by the client
    pub async fn get_page_for_client(
        &self,
        client_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<Page<MaintenanceLogModel>, DbErr> {
        let select = entity::prelude::MaintenanceLog::find()
            .inner_join(entity::security_system_order::Entity)
            .filter(entity::security_system_order::Column::ClientId.eq(client_id));

        self.base()
            .get_with_pagination_filtered(select, page, page_size)
            .await
    }

    pub async fn mark_resolved(
        &self,
        log: MaintenanceLogModel,
    ) -> Result<MaintenanceLogModel, DbErr> {
        let mut log_am = log.into_active_model();
        log_am.resolved = ActiveValue::Set(true);

        log_am.update(self.db).await
    }

    pub async fn delete(&self, log_id: i32) -> Result<DeleteResult, DbErr> {
        self.base().delete(log_id).await
    }

    pub async fn add_devices(
        &self,
        devices: Vec<entity::maintenance_device::ActiveModel>,
    ) -> Result<(), DbErr> {
        if devices.is_empty() {
            return Ok(());
        }

        entity::prelude::MaintenanceDevice::insert_many(devices)
            .exec(self.db)
            .await?;

        Ok(())
    }

    pub async fn get_devices(&self, log_id: i32) -> Result<Vec<MaintenanceDeviceModel>, DbErr> {
        entity::prelude::MaintenanceDevice::find()
            .filter(entity::maintenance_device::Column::MaintenanceLogId.eq(log_id))
            .order_by_asc(entity::maintenance_device::Column::Id)
            .all(self.db)
            .await
    }

    /// Devices keyed by maintenance log id, for every log in `log_ids`
    pub async fn get_devices_for_logs(
        &self,
        log_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<MaintenanceDeviceModel>>, DbErr> {
        let devices = entity::prelude::MaintenanceDevice::find()
            .filter(
                entity::maintenance_device::Column::MaintenanceLogId
                    .is_in(log_ids.iter().copied()),
            )
            .order_by_asc(entity::maintenance_device::Column::Id)
            .all(self.db)
            .await?;

        let mut by_log: HashMap<i32, Vec<MaintenanceDeviceModel>> = HashMap::new();
        for device in devices {
            by_log
                .entry(device.maintenance_log_id)
                .or_default()
                .push(device);
        }

        Ok(by_log)
    }
}
