use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{PageDto, PageParams},
        maintenance::{CreateMaintenanceLogDto, MaintenanceLogDto},
        user::Role,
    },
    server::{
        data::{
            device::DeviceRepository, maintenance::MaintenanceRepository, order::OrderRepository,
            Page,
        },
        error::{auth::AuthError, Error},
        model::{auth::CurrentUser, db::MaintenanceLogModel},
        service::{notification::NotificationService, order::OrderService},
    },
};

/// Maintenance visits and the devices inspected during them.
///
/// Admins and managers see every log, technicians the logs they wrote, clients the logs of
/// their orders.
pub struct MaintenanceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MaintenanceService<'a> {
    /// Creates a new instance of [`MaintenanceService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_logs(
        &self,
        caller: &CurrentUser,
        params: PageParams,
    ) -> Result<PageDto<MaintenanceLogDto>, Error> {
        let maintenance_repo = MaintenanceRepository::new(self.db);
        let (page, page_size) = (params.page(), params.page_size());

        let page = match caller.role {
            Role::Admin | Role::Manager => maintenance_repo.get_page(page, page_size).await?,
            Role::Technician => {
                maintenance_repo
                    .get_page_for_technician(caller.id, page, page_size)
                    .await?
            }
            Role::Client => {
                maintenance_repo
                    .get_page_for_client(caller.id, page, page_size)
                    .await?
            }
        };

        Ok(self.with_devices(page).await?.into())
    }

    pub async fn get_log(
        &self,
        caller: &CurrentUser,
        log_id: i32,
    ) -> Result<MaintenanceLogDto, Error> {
        let log = self.find_visible(caller, log_id).await?;
        let devices = MaintenanceRepository::new(self.db)
            .get_devices(log.id)
            .await?;

        Ok(MaintenanceLogDto::from_models(log, devices))
    }

    /// Records a maintenance visit with its inspected devices in one transaction
    ///
    /// Every listed device must be installed on the log's order.
    pub async fn create_log(
        &self,
        caller: &CurrentUser,
        dto: CreateMaintenanceLogDto,
    ) -> Result<MaintenanceLogDto, Error> {
        let order = OrderService::new(self.db)
            .find_workable(caller, dto.order_id, "log maintenance on this order")
            .await?;

        let order_devices: HashSet<i32> = DeviceRepository::new(self.db)
            .get_by_order(order.id)
            .await?
            .into_iter()
            .map(|device| device.id)
            .collect();

        if let Some(foreign) = dto
            .devices
            .iter()
            .find(|device| !order_devices.contains(&device.installed_device_id))
        {
            return Err(Error::BadRequest(format!(
                "Device {} is not installed on order {}",
                foreign.installed_device_id, order.id
            )));
        }

        let txn = self.db.begin().await?;
        let maintenance_repo = MaintenanceRepository::new(&txn);

        let log = maintenance_repo
            .create(entity::maintenance_log::ActiveModel {
                description: ActiveValue::Set(dto.description),
                date: ActiveValue::Set(dto.date),
                resolved: ActiveValue::Set(false),
                order_id: ActiveValue::Set(order.id),
                technician_id: ActiveValue::Set(caller.id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .await?;

        let devices = dto
            .devices
            .into_iter()
            .map(|device| entity::maintenance_device::ActiveModel {
                maintenance_log_id: ActiveValue::Set(log.id),
                installed_device_id: ActiveValue::Set(device.installed_device_id),
                notes: ActiveValue::Set(device.notes),
                require_replacement: ActiveValue::Set(device.require_replacement),
                is_fixed: ActiveValue::Set(device.is_fixed),
                ..Default::default()
            })
            .collect();
        maintenance_repo.add_devices(devices).await?;

        let devices = maintenance_repo.get_devices(log.id).await?;
        txn.commit().await?;

        tracing::info!(log_id = log.id, order_id = order.id, "Logged maintenance");

        NotificationService::new(self.db)
            .notify_quietly(
                &[order.client_id],
                &format!("Maintenance was logged for your order #{}", order.id),
            )
            .await;

        Ok(MaintenanceLogDto::from_models(log, devices))
    }

    /// Staff or the technician who wrote the log may mark it resolved
    pub async fn resolve_log(
        &self,
        caller: &CurrentUser,
        log_id: i32,
    ) -> Result<MaintenanceLogDto, Error> {
        let maintenance_repo = MaintenanceRepository::new(self.db);
        let Some(log) = maintenance_repo.get(log_id).await? else {
            return Err(Error::not_found("maintenance log", log_id));
        };

        if !caller.is_staff() && log.technician_id != caller.id {
            return Err(AuthError::forbidden(caller.id, "resolve this maintenance log").into());
        }

        let log = maintenance_repo.mark_resolved(log).await?;
        let devices = maintenance_repo.get_devices(log.id).await?;

        Ok(MaintenanceLogDto::from_models(log, devices))
    }

    pub async fn delete_log(&self, caller: &CurrentUser, log_id: i32) -> Result<(), Error> {
        caller.require_staff("delete maintenance logs")?;

        let result = MaintenanceRepository::new(self.db).delete(log_id).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("maintenance log", log_id));
        }

        Ok(())
    }

    async fn find_visible(
        &self,
        caller: &CurrentUser,
        log_id: i32,
    ) -> Result<MaintenanceLogModel, Error> {
        let Some(log) = MaintenanceRepository::new(self.db).get(log_id).await? else {
            return Err(Error::not_found("maintenance log", log_id));
        };

        let visible = match caller.role {
            Role::Admin | Role::Manager => true,
            Role::Technician => log.technician_id == caller.id,
            Role::Client => OrderRepository::new(self.db)
                .get(log.order_id)
                .await?
                .is_some_and(|order| order.client_id == caller.id),
        };

        if !visible {
            return Err(Error::not_found("maintenance log", log_id));
        }

        Ok(log)
    }

    async fn with_devices(
        &self,
        page: Page<MaintenanceLogModel>,
    ) -> Result<Page<MaintenanceLogDto>, Error> {
        let log_ids: Vec<i32> = page.items.iter().map(|log| log.id).collect();
        let mut devices = MaintenanceRepository::new(self.db)
            .get_devices_for_logs(&log_ids)
            .await?;

        Ok(page.try_map(|log| {
            let log_devices = devices.remove(&log.id).unwrap_or_default();
            Ok::<_, Error>(MaintenanceLogDto::from_models(log, log_devices))
        })?)
    }
}
