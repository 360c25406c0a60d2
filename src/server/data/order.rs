use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{
    data::{Page, Repository},
    model::db::OrderModel,
};

pub struct OrderRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OrderRepository<'a, C> {
    /// Creates a new instance of [`OrderRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn base(&self) -> Repository<'a, C, entity::security_system_order::Entity> {
        Repository::new(self.db)
    }

    pub async fn create(
        &self,
        order: entity::security_system_order::ActiveModel,
    ) -> Result<OrderModel, DbErr> {
        self.base().save(order).await
    }

    pub async fn get(&self, order_id: i32) -> Result<Option<OrderModel>, DbErr> {
        self.base().get_by_id(order_id).await
    }

    pub async fn get_page(&self, page: u64, page_size: u64) -> Result<Page<OrderModel>, DbErr> {
        self.base().get_with_pagination(page, page_size).await
    }

    pub async fn get_page_for_client(
        &self,
        client_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<Page<OrderModel>, DbErr> {
        let select = entity::prelude::SecuritySystemOrder::find()
            .filter(entity::security_system_order::Column::ClientId.eq(client_id));

        self.base()
            .get_with_pagination_filtered(select, page, page_size)
            .await
    }

    /// Orders the technician is assigned to
    pub async fn get_page_for_technician(
        &self,
        technician_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<Page<OrderModel>, DbErr> {
        let select = entity::prelude::SecuritySystemOrder::find()
            .inner_join(entity::order_technician::Entity)
            .filter(entity::order_technician::Column::TechnicianId.eq(technician_id));

        self.base()
            .get_with_pagination_filtered(select, page, page_size)
            .await
    }

    /// Updates the order status, returning `None` if the order does not exist
    pub async fn update_status(
        &self,
        order_id: i32,
        status: &str,
    ) -> Result<Option<OrderModel>, DbErr> {
        let Some(order) = self.get(order_id).await? else {
            return Ok(None);
        };

        let mut order_am = order.into_active_model();
        order_am.status = ActiveValue::Set(status.to_string());

        Ok(Some(order_am.update(self.db).await?))
    }

    pub async fn delete(&self, order_id: i32) -> Result<DeleteResult, DbErr> {
        self.base().delete(order_id).await
    }

    /// Number of orders at the location whose status differs from `status`
    pub async fn count_at_location_not_in(
        &self,
        location_id: i32,
        status: &str,
    ) -> Result<u64, DbErr> {
        entity::prelude::SecuritySystemOrder::find()
            .filter(entity::security_system_order::Column::LocationId.eq(location_id))
            .filter(entity::security_system_order::Column::Status.ne(status))
            .count(self.db)
            .await
    }

    /// Number of orders placed by the client
    pub async fn count_for_client(&self, client_id: i32) -> Result<u64, DbErr> {
        entity::prelude::SecuritySystemOrder::find()
            .filter(entity::security_system_order::Column::ClientId.eq(client_id))
            .count(self.db)
            .await
    }

    /// Ids of technicians assigned to the order, ascending
    pub async fn get_technician_ids(&self, order_id: i32) -> Result<Vec<i32>, DbErr> {
        entity::prelude::OrderTechnician::find()
            .select_only()
            .column(entity::order_technician::Column::TechnicianId)
            .filter(entity::order_technician::Column::OrderId.eq(order_id))
            .order_by_asc(entity::order_technician::Column::TechnicianId)
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// Assigned technician ids keyed by order id, for every order in `order_ids`
    pub async fn get_technician_ids_for_orders(
        &self,
        order_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<i32>>, DbErr> {
        let pairs: Vec<(i32, i32)> = entity::prelude::OrderTechnician::find()
            .select_only()
            .column(entity::order_technician::Column::OrderId)
            .column(entity::order_technician::Column::TechnicianId)
            .filter(entity::order_technician::Column::OrderId.is_in(order_ids.iter().copied()))
            .order_by_asc(entity::order_technician::Column::TechnicianId)
            .into_tuple()
            .all(self.db)
            .await?;

        let mut assigned: HashMap<i32, Vec<i32>> = HashMap::new();
        for (order_id, technician_id) in pairs {
            assigned.entry(order_id).or_default().push(technician_id);
        }

        Ok(assigned)
    }

    pub async fn is_assigned(&self, order_id: i32, technician_id: i32) -> Result<bool, DbErr> {
        let found = entity::prelude::OrderTechnician::find_by_id((order_id, technician_id))
            .one(self.db)
            .await?;

        Ok(found.is_some())
    }

    /// Assigns a technician to an order
    ///
    /// Returns `false` without changes if the technician was already assigned.
    pub async fn assign_technician(
        &self,
        order_id: i32,
        technician_id: i32,
    ) -> Result<bool, DbErr> {
        if self.is_assigned(order_id, technician_id).await? {
            return Ok(false);
        }

        entity::order_technician::ActiveModel {
            order_id: ActiveValue::Set(order_id),
            technician_id: ActiveValue::Set(technician_id),
            assigned_at: ActiveValue::Set(Utc::now().naive_utc()),
        }
        .insert(self.db)
        .await?;

        Ok(true)
    }

    /// Removes a technician assignment
    ///
    /// Check [`DeleteResult::rows_affected`] to see whether an assignment existed.
    pub async fn unassign_technician(
        &self,
        order_id: i32,
        technician_id: i32,
    ) -> Result<DeleteResult, DbErr> {
        entity::prelude::OrderTechnician::delete_by_id((order_id, technician_id))
            .exec(self.db)
            .await
    }
}
