use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, QueryFilter, QuerySelect,
    RelationTrait,
};

use crate::server::{
    data::{Page, Repository},
    model::db::LocationModel,
};

pub struct LocationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LocationRepository<'a, C> {
    /// Creates a new instance of [`LocationRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn base(&self) -> Repository<'a, C, entity::location::Entity> {
        Repository::new(self.db)
    }

    pub async fn get_page(&self, page: u64, page_size: u64) -> Result<Page<LocationModel>, DbErr> {
        self.base().get_with_pagination(page, page_size).await
    }

    /// Locations owned by a client
    pub async fn get_page_for_client(
        &self,
        client_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<Page<LocationModel>, DbErr> {
        let select = entity::prelude::Location::find()
            .filter(entity::location::Column::ClientId.eq(client_id));

        self.base()
            .get_with_pagination_filtered(select, page, page_size)
            .await
    }

    /// Locations of orders the technician is assigned to
    pub async fn get_page_for_technician(
        &self,
        technician_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<Page<LocationModel>, DbErr> {
        let select = entity::prelude::Location::find()
            .inner_join(entity::security_system_order::Entity)
            .join(
                JoinType::InnerJoin,
                entity::security_system_order::Relation::OrderTechnician.def(),
            )
            .filter(entity::order_technician::Column::TechnicianId.eq(technician_id))
            .distinct();

        self.base()
            .get_with_pagination_filtered(select, page, page_size)
            .await
    }

    /// Whether any of the technician's assigned orders is at the location
    pub async fn is_technician_location(
        &self,
        location_id: i32,
        technician_id: i32,
    ) -> Result<bool, DbErr> {
        let found = entity::prelude::SecuritySystemOrder::find()
            .inner_join(entity::order_technician::Entity)
            .filter(entity::security_system_order::Column::LocationId.eq(location_id))
            .filter(entity::order_technician::Column::TechnicianId.eq(technician_id))
            .one(self.db)
            .await?;

        Ok(found.is_some())
    }
}
