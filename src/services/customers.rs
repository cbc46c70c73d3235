//! Customer master-data maintenance.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::media::ImageData;
use crate::models::{AuditAction, Customer};
use crate::state::AppState;

/// Editable customer fields, used for both create and update.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct CustomerInput {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 30))]
    pub phone: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 50))]
    pub country: String,
    pub image: Option<ImageData>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[instrument(skip(state, input), fields(name = %input.name))]
pub fn create(
    state: &AppState,
    input: &CustomerInput,
    actor: &str,
) -> Result<(AppState, Uuid), ServiceError> {
    input.validate()?;
    let id = Uuid::new_v4();
    let mut next = state.clone();
    next.customers.push(Customer {
        id,
        name: input.name.clone(),
        email: input.email.clone(),
        phone: input.phone.clone(),
        address: input.address.clone(),
        city: input.city.clone(),
        country: input.country.clone(),
        image: input.image.clone(),
        note: input.note.clone(),
        created_at: Utc::now(),
    });
    next.record_audit(actor, AuditAction::CustomerCreated, id, input.name.clone());
    info!(customer_id = %id, "customer created");
    Ok((next, id))
}

#[instrument(skip(state, input), fields(customer_id = %customer_id))]
pub fn update(
    state: &AppState,
    customer_id: Uuid,
    input: &CustomerInput,
    actor: &str,
) -> Result<AppState, ServiceError> {
    input.validate()?;
    state.customer(customer_id)?;

    let mut next = state.clone();
    let customer = next.customer_mut(customer_id)?;
    customer.name = input.name.clone();
    customer.email = input.email.clone();
    customer.phone = input.phone.clone();
    customer.address = input.address.clone();
    customer.city = input.city.clone();
    customer.country = input.country.clone();
    customer.image = input.image.clone();
    customer.note = input.note.clone();
    next.record_audit(
        actor,
        AuditAction::CustomerUpdated,
        customer_id,
        input.name.clone(),
    );
    info!("customer updated");
    Ok(next)
}
