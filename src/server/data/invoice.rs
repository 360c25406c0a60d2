use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, JoinType, PaginatorTrait, QueryFilter, QuerySelect,
    RelationTrait,
};

use crate::server::{
    data::{Page, Repository},
    model::db::InvoiceModel,
};

pub struct InvoiceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> InvoiceRepository<'a, C> {
    /// Creates a new instance of [`InvoiceRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn base(&self) -> Repository<'a, C, entity::invoice::Entity> {
        Repository::new(self.db)
    }

    pub async fn create(
        &self,
        invoice: entity::invoice::ActiveModel,
    ) -> Result<InvoiceModel, DbErr> {
        self.base().save(invoice).await
    }

    pub async fn get(&self, invoice_id: i32) -> Result<Option<InvoiceModel>, DbErr> {
        self.base().get_by_id(invoice_id).await
    }

    pub async fn get_page(&self, page: u64, page_size: u64) -> Result<Page<InvoiceModel>, DbErr> {
        self.base().get_with_pagination(page, page_size).await
    }

    /// Invoices billed to the client
    pub async fn get_page_for_client(
        &self,
        client_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<Page<InvoiceModel>, DbErr> {
        let select = entity::prelude::Invoice::find()
            .filter(entity::invoice::Column::ClientId.eq(client_id));

        self.base()
            .get_with_pagination_filtered(select, page, page_size)
            .await
    }

    /// Invoices for orders the technician is assigned to
    pub async fn get_page_for_technician(
        &self,
        technician_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<Page<InvoiceModel>, DbErr> {
        let select = entity::prelude::Invoice::find()
            .inner_join(entity::security_system_order::Entity)
            .join(
                JoinType::InnerJoin,
                entity::security_system_order::Relation::OrderTechnician.def(),
            )
            .filter(entity::order_technician::Column::TechnicianId.eq(technician_id));

        self.base()
            .get_with_pagination_filtered(select, page, page_size)
            .await
    }

    pub async fn mark_paid(&self, invoice: InvoiceModel) -> Result<InvoiceModel, DbErr> {
        let mut invoice_am = invoice.into_active_model();
        invoice_am.is_paid = ActiveValue::Set(true);

        invoice_am.update(self.db).await
    }

    pub async fn delete(&self, invoice_id: i32) -> Result<DeleteResult, DbErr> {
        self.base().delete(invoice_id).await
    }

    pub async fn count_for_client(&self, client_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Invoice::find()
            .filter(entity::invoice::Column::ClientId.eq(client_id))
            .count(self.db)
            .await
    }
}
