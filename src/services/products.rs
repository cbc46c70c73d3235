//! Product catalog maintenance.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::media::ImageData;
use crate::models::product::{FX_RATE, FX_TOLERANCE};
use crate::models::{AuditAction, Product, StockRecord};
use crate::state::AppState;

/// Full set of editable product fields, used for both create and update.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub image: Option<ImageData>,
    pub cost_price: Decimal,
    pub wholesale_price: Decimal,
    pub retail_price: Decimal,
    pub retail_price_usd: Decimal,
    #[validate(range(min = 0))]
    pub reorder_level: i32,
    pub locations: Vec<StockRecord>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

fn validate_input(state: &AppState, input: &ProductInput) -> Result<(), ServiceError> {
    input.validate()?;
    for price in [
        input.cost_price,
        input.wholesale_price,
        input.retail_price,
        input.retail_price_usd,
    ] {
        if price < Decimal::ZERO {
            return Err(ServiceError::InvalidInput("prices cannot be negative".into()));
        }
    }
    if (input.retail_price - input.retail_price_usd * FX_RATE).abs() > FX_TOLERANCE {
        return Err(ServiceError::ValidationError(format!(
            "retail price {} does not match USD price {} at rate {}",
            input.retail_price, input.retail_price_usd, FX_RATE
        )));
    }
    for (idx, record) in input.locations.iter().enumerate() {
        if record.quantity < 0 {
            return Err(ServiceError::InvalidInput(
                "stock quantities cannot be negative".into(),
            ));
        }
        if !state.is_known_location(record.location_id) {
            return Err(ServiceError::not_found("location", record.location_id));
        }
        if input.locations[..idx]
            .iter()
            .any(|r| r.location_id == record.location_id)
        {
            return Err(ServiceError::Conflict(format!(
                "duplicate stock record for location {}",
                record.location_id
            )));
        }
    }
    Ok(())
}

/// Normalizes the `is_sub_location` flags against the location tree so a
/// caller cannot store a record that contradicts the hierarchy.
fn normalized_records(
    state: &AppState,
    records: &[StockRecord],
) -> Result<Vec<StockRecord>, ServiceError> {
    records
        .iter()
        .map(|r| {
            Ok(StockRecord {
                location_id: r.location_id,
                quantity: r.quantity,
                is_sub_location: state.is_sub_location(r.location_id)?,
            })
        })
        .collect()
}

#[instrument(skip(state, input), fields(name = %input.name))]
pub fn create(
    state: &AppState,
    input: &ProductInput,
    actor: &str,
) -> Result<(AppState, Uuid), ServiceError> {
    validate_input(state, input)?;
    let id = Uuid::new_v4();
    let mut next = state.clone();
    next.products.push(Product {
        id,
        name: input.name.clone(),
        category: input.category.clone(),
        image: input.image.clone(),
        cost_price: input.cost_price,
        wholesale_price: input.wholesale_price,
        retail_price: input.retail_price,
        retail_price_usd: input.retail_price_usd,
        reorder_level: input.reorder_level,
        locations: normalized_records(state, &input.locations)?,
        note: input.note.clone(),
        created_at: Utc::now(),
    });
    next.record_audit(actor, AuditAction::ProductCreated, id, input.name.clone());
    info!(product_id = %id, "product created");
    Ok((next, id))
}

#[instrument(skip(state, input), fields(product_id = %product_id))]
pub fn update(
    state: &AppState,
    product_id: Uuid,
    input: &ProductInput,
    actor: &str,
) -> Result<AppState, ServiceError> {
    validate_input(state, input)?;
    state.product(product_id)?;
    let records = normalized_records(state, &input.locations)?;

    let mut next = state.clone();
    let product = next.product_mut(product_id)?;
    product.name = input.name.clone();
    product.category = input.category.clone();
    product.image = input.image.clone();
    product.cost_price = input.cost_price;
    product.wholesale_price = input.wholesale_price;
    product.retail_price = input.retail_price;
    product.retail_price_usd = input.retail_price_usd;
    product.reorder_level = input.reorder_level;
    product.locations = records;
    product.note = input.note.clone();
    next.record_audit(
        actor,
        AuditAction::ProductUpdated,
        product_id,
        input.name.clone(),
    );
    info!("product updated");
    Ok(next)
}
