use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{sea_query::Expr, ActiveValue, ColumnTrait, EntityTrait, QueryFilter};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn order<'a>(&'a self) -> OrderFixtures<'a> {
        OrderFixtures { setup: self }
    }
}

pub struct OrderFixtures<'a> {
    setup: &'a TestContext,
}

fn fixture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or_default()
}

impl<'a> OrderFixtures<'a> {
    pub async fn insert_location(
        &self,
        client_id: i32,
    ) -> Result<entity::location::Model, TestError> {
        Ok(
            entity::prelude::Location::insert(entity::location::ActiveModel {
                name: ActiveValue::Set("Warehouse".to_string()),
                address: ActiveValue::Set("1 Test Street".to_string()),
                description: ActiveValue::Set(None),
                client_id: ActiveValue::Set(client_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert a `Pending` order at an existing location
    pub async fn insert_order(
        &self,
        client_id: i32,
        location_id: i32,
    ) -> Result<entity::security_system_order::Model, TestError> {
        Ok(entity::prelude::SecuritySystemOrder::insert(
            entity::security_system_order::ActiveModel {
                title: ActiveValue::Set("Camera installation".to_string()),
                description: ActiveValue::Set("Four outdoor cameras".to_string()),
                phone_number: ActiveValue::Set("+10000000000".to_string()),
                status: ActiveValue::Set("Pending".to_string()),
                requested_date: ActiveValue::Set(fixture_date()),
                location_id: ActiveValue::Set(location_id),
                client_id: ActiveValue::Set(client_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            },
        )
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    /// Insert a location for the client and a `Pending` order at it
    pub async fn insert_order_for_client(
        &self,
        client_id: i32,
    ) -> Result<entity::security_system_order::Model, TestError> {
        let location = self.insert_location(client_id).await?;

        self.insert_order(client_id, location.id).await
    }

    /// Move an order to another status, e.g. `Completed`
    pub async fn set_order_status(
        &self,
        order_id: i32,
        status: &str,
    ) -> Result<(), TestError> {
        entity::prelude::SecuritySystemOrder::update_many()
            .col_expr(
                entity::security_system_order::Column::Status,
                Expr::value(status),
            )
            .filter(entity::security_system_order::Column::Id.eq(order_id))
            .exec(&self.setup.db)
            .await?;

        Ok(())
    }

    pub async fn assign_technician(
        &self,
        order_id: i32,
        technician_id: i32,
    ) -> Result<(), TestError> {
        entity::prelude::OrderTechnician::insert(entity::order_technician::ActiveModel {
            order_id: ActiveValue::Set(order_id),
            technician_id: ActiveValue::Set(technician_id),
            assigned_at: ActiveValue::Set(Utc::now().naive_utc()),
        })
        .exec_without_returning(&self.setup.db)
        .await?;

        Ok(())
    }

    pub async fn insert_device(
        &self,
        order_id: i32,
    ) -> Result<entity::installed_device::Model, TestError> {
        Ok(
            entity::prelude::InstalledDevice::insert(entity::installed_device::ActiveModel {
                device_type: ActiveValue::Set("Camera".to_string()),
                brand: ActiveValue::Set("Hikvision".to_string()),
                model: ActiveValue::Set("DS-2CD".to_string()),
                quantity: ActiveValue::Set(1),
                date_installed: ActiveValue::Set(fixture_date()),
                image_url: ActiveValue::Set(None),
                order_id: ActiveValue::Set(order_id),
                installed_by_id: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    pub async fn insert_maintenance_log(
        &self,
        order_id: i32,
        technician_id: i32,
    ) -> Result<entity::maintenance_log::Model, TestError> {
        Ok(
            entity::prelude::MaintenanceLog::insert(entity::maintenance_log::ActiveModel {
                description: ActiveValue::Set("Routine check".to_string()),
                date: ActiveValue::Set(fixture_date()),
                resolved: ActiveValue::Set(false),
                order_id: ActiveValue::Set(order_id),
                technician_id: ActiveValue::Set(technician_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    pub async fn insert_maintenance_device(
        &self,
        maintenance_log_id: i32,
        installed_device_id: i32,
    ) -> Result<entity::maintenance_device::Model, TestError> {
        Ok(entity::prelude::MaintenanceDevice::insert(
            entity::maintenance_device::ActiveModel {
                maintenance_log_id: ActiveValue::Set(maintenance_log_id),
                installed_device_id: ActiveValue::Set(installed_device_id),
                notes: ActiveValue::Set(None),
                require_replacement: ActiveValue::Set(false),
                is_fixed: ActiveValue::Set(true),
                ..Default::default()
            },
        )
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    pub async fn insert_invoice(
        &self,
        order_id: i32,
        client_id: i32,
        amount: Decimal,
    ) -> Result<entity::invoice::Model, TestError> {
        Ok(
            entity::prelude::Invoice::insert(entity::invoice::ActiveModel {
                title: ActiveValue::Set("Installation".to_string()),
                description: ActiveValue::Set(None),
                amount: ActiveValue::Set(amount),
                issued_on: ActiveValue::Set(fixture_date()),
                is_paid: ActiveValue::Set(false),
                order_id: ActiveValue::Set(order_id),
                client_id: ActiveValue::Set(client_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
