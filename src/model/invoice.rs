use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub issued_on: NaiveDate,
    pub is_paid: bool,
    pub order_id: i32,
    pub client_id: i32,
    pub created_at: NaiveDateTime,
}

impl From<entity::invoice::Model> for InvoiceDto {
    fn from(invoice: entity::invoice::Model) -> Self {
        Self {
            id: invoice.id,
            title: invoice.title,
            description: invoice.description,
            amount: invoice.amount,
            issued_on: invoice.issued_on,
            is_paid: invoice.is_paid,
            order_id: invoice.order_id,
            client_id: invoice.client_id,
            created_at: invoice.created_at,
        }
    }
}

/// New invoice; the billed client is taken from the order
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateInvoiceDto {
    pub order_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Positive, with at most two decimal places
    #[validate(custom = "validate_amount")]
    pub amount: Decimal,
    pub issued_on: NaiveDate,
}

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    // Largest value a decimal(12, 2) column holds
    let max_amount = Decimal::new(999_999_999_999, 2);

    if amount.is_sign_negative() || amount.is_zero() {
        return Err(ValidationError::new("amount_not_positive"));
    }
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::new("amount_scale"));
    }
    if *amount > max_amount {
        return Err(ValidationError::new("amount_too_large"));
    }

    Ok(())
}
