use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection};

use crate::{
    model::{
        api::{PageDto, PageParams},
        invoice::{CreateInvoiceDto, InvoiceDto},
        user::Role,
    },
    server::{
        data::{invoice::InvoiceRepository, order::OrderRepository},
        error::Error,
        model::{auth::CurrentUser, db::InvoiceModel},
        service::{notification::NotificationService, CrudService},
    },
};

/// Invoices billed to clients for their orders.
///
/// Admins and managers see every invoice, clients the invoices billed to them, technicians the
/// invoices of orders they are assigned to.
pub struct InvoiceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> InvoiceService<'a> {
    /// Creates a new instance of [`InvoiceService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    fn crud(&self) -> CrudService<'a, entity::invoice::Entity, InvoiceDto> {
        CrudService::new(self.db, "invoice")
    }

    pub async fn get_invoices(
        &self,
        caller: &CurrentUser,
        params: PageParams,
    ) -> Result<PageDto<InvoiceDto>, Error> {
        let invoice_repo = InvoiceRepository::new(self.db);
        let (page, page_size) = (params.page(), params.page_size());

        let page = match caller.role {
            Role::Admin | Role::Manager => return self.crud().get_page(params).await,
            Role::Client => {
                invoice_repo
                    .get_page_for_client(caller.id, page, page_size)
                    .await?
            }
            Role::Technician => {
                invoice_repo
                    .get_page_for_technician(caller.id, page, page_size)
                    .await?
            }
        };

        Ok(page.try_map(InvoiceDto::try_from)?.into())
    }

    pub async fn get_invoice(
        &self,
        caller: &CurrentUser,
        invoice_id: i32,
    ) -> Result<InvoiceDto, Error> {
        let invoice = self.find_visible(caller, invoice_id).await?;

        Ok(invoice.into())
    }

    /// Staff bill the client who placed the order; the client is notified
    pub async fn create_invoice(
        &self,
        caller: &CurrentUser,
        dto: CreateInvoiceDto,
    ) -> Result<InvoiceDto, Error> {
        caller.require_staff("create invoices")?;

        let Some(order) = OrderRepository::new(self.db).get(dto.order_id).await? else {
            return Err(Error::not_found("order", dto.order_id));
        };

        let invoice = InvoiceRepository::new(self.db)
            .create(entity::invoice::ActiveModel {
                title: ActiveValue::Set(dto.title),
                description: ActiveValue::Set(dto.description),
                amount: ActiveValue::Set(dto.amount),
                issued_on: ActiveValue::Set(dto.issued_on),
                is_paid: ActiveValue::Set(false),
                order_id: ActiveValue::Set(order.id),
                client_id: ActiveValue::Set(order.client_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .await?;

        tracing::info!(invoice_id = invoice.id, order_id = order.id, "Issued invoice");

        NotificationService::new(self.db)
            .notify_quietly(
                &[invoice.client_id],
                &format!(
                    "New invoice \"{}\" of {:.2} for order #{}",
                    invoice.title, invoice.amount, order.id
                ),
            )
            .await;

        Ok(invoice.into())
    }

    pub async fn mark_paid(
        &self,
        caller: &CurrentUser,
        invoice_id: i32,
    ) -> Result<InvoiceDto, Error> {
        caller.require_staff("mark invoices paid")?;

        let invoice_repo = InvoiceRepository::new(self.db);
        let Some(invoice) = invoice_repo.get(invoice_id).await? else {
            return Err(Error::not_found("invoice", invoice_id));
        };

        Ok(invoice_repo.mark_paid(invoice).await?.into())
    }

    pub async fn delete_invoice(&self, caller: &CurrentUser, invoice_id: i32) -> Result<(), Error> {
        caller.require_role(&[Role::Admin], "delete invoices")?;

        self.crud().delete(invoice_id).await
    }

    async fn find_visible(
        &self,
        caller: &CurrentUser,
        invoice_id: i32,
    ) -> Result<InvoiceModel, Error> {
        let Some(invoice) = InvoiceRepository::new(self.db).get(invoice_id).await? else {
            return Err(Error::not_found("invoice", invoice_id));
        };

        let visible = match caller.role {
            Role::Admin | Role::Manager => true,
            Role::Client => invoice.client_id == caller.id,
            Role::Technician => {
                OrderRepository::new(self.db)
                    .is_assigned(invoice.order_id, caller.id)
                    .await?
            }
        };

        if !visible {
            return Err(Error::not_found("invoice", invoice_id));
        }

        Ok(invoice)
    }
}
