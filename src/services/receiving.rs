//! Incoming-shipment intake: logging inbound deliveries and booking them
//! into stock on arrival.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::models::{
    AuditAction, IncomingShipment, ShipmentLine, ShipmentStatus, StockRecord,
};
use crate::state::AppState;

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct NewShipmentLine {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Request to log an inbound delivery headed for one location.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct LogShipmentRequest {
    #[validate(length(min = 1, max = 100))]
    pub reference: String,
    #[validate(length(min = 1, max = 200))]
    pub supplier: String,
    pub location_id: Uuid,
    #[validate]
    pub lines: Vec<NewShipmentLine>,
    pub expected_at: DateTime<Utc>,
}

/// Records a shipment as in transit. No stock is touched until it is
/// received.
#[instrument(skip(state, req), fields(reference = %req.reference))]
pub fn log_shipment(
    state: &AppState,
    req: &LogShipmentRequest,
    actor: &str,
) -> Result<(AppState, Uuid), ServiceError> {
    req.validate()?;
    if req.lines.is_empty() {
        return Err(ServiceError::ValidationError(
            "a shipment needs at least one line".into(),
        ));
    }
    let location_name = state.location_display_name(req.location_id)?;

    let mut lines = Vec::with_capacity(req.lines.len());
    for line in &req.lines {
        let product = state.product(line.product_id)?;
        lines.push(ShipmentLine {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: line.quantity,
        });
    }

    let id = Uuid::new_v4();
    let mut next = state.clone();
    next.shipments.push(IncomingShipment {
        id,
        reference: req.reference.clone(),
        supplier: req.supplier.clone(),
        location_id: req.location_id,
        location_name: location_name.clone(),
        lines,
        status: ShipmentStatus::InTransit,
        expected_at: req.expected_at,
        received_at: None,
        created_at: Utc::now(),
    });
    next.record_audit(
        actor,
        AuditAction::ShipmentLogged,
        id,
        format!("{} from {} to {}", req.reference, req.supplier, location_name),
    );
    info!(shipment_id = %id, "incoming shipment logged");
    Ok((next, id))
}

/// Books an in-transit shipment into stock at its destination location,
/// creating stock records on demand, and marks it received.
#[instrument(skip(state))]
pub fn receive(
    state: &AppState,
    shipment_id: Uuid,
    actor: &str,
) -> Result<AppState, ServiceError> {
    let shipment = state.shipment(shipment_id)?;
    if shipment.status != ShipmentStatus::InTransit {
        return Err(ServiceError::InvalidStatus(format!(
            "shipment {} is {}; only in-transit shipments can be received",
            shipment_id, shipment.status
        )));
    }
    for line in &shipment.lines {
        state.product(line.product_id)?;
    }
    let location_id = shipment.location_id;
    let location_name = shipment.location_name.clone();
    let is_sub = state.is_sub_location(location_id)?;
    let lines = shipment.lines.clone();
    let now = Utc::now();

    let mut next = state.clone();
    for line in &lines {
        let product = next.product_mut(line.product_id)?;
        match product.stock_record_mut(location_id) {
            Some(record) => {
                record.quantity = record.quantity.checked_add(line.quantity).ok_or_else(|| {
                    ServiceError::InvalidInput(format!(
                        "receiving {} of {} overflows the stock counter",
                        line.quantity, line.product_name
                    ))
                })?;
            }
            None => product.locations.push(StockRecord {
                location_id,
                quantity: line.quantity,
                is_sub_location: is_sub,
            }),
        }
    }
    let doc = next.shipment_mut(shipment_id)?;
    doc.status = ShipmentStatus::Received;
    doc.received_at = Some(now);
    next.record_audit(
        actor,
        AuditAction::ShipmentReceived,
        shipment_id,
        format!("{} line(s) into {}", lines.len(), location_name),
    );
    info!(shipment_id = %shipment_id, lines = lines.len(), "shipment received");
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::demo_state;
    use assert_matches::assert_matches;

    fn request(state: &AppState) -> LogShipmentRequest {
        LogShipmentRequest {
            reference: "PO-7781".into(),
            supplier: "Acme Foods".into(),
            location_id: state.locations[0].id,
            lines: vec![NewShipmentLine {
                product_id: state.products[0].id,
                quantity: 25,
            }],
            expected_at: Utc::now(),
        }
    }

    #[test]
    fn log_requires_lines_and_known_entities() {
        let state = demo_state(4);
        let mut empty = request(&state);
        empty.lines.clear();
        assert_matches!(
            log_shipment(&state, &empty, "clerk").unwrap_err(),
            ServiceError::ValidationError(_)
        );

        let mut unknown = request(&state);
        unknown.lines[0].product_id = Uuid::new_v4();
        assert_matches!(
            log_shipment(&state, &unknown, "clerk").unwrap_err(),
            ServiceError::NotFound(_)
        );
    }

    #[test]
    fn receive_refuses_stock_counter_overflow() {
        let mut state = demo_state(4);
        let product_id = state.products[0].id;
        let location_id = state.locations[0].id;
        state
            .product_mut(product_id)
            .unwrap()
            .stock_record_mut(location_id)
            .unwrap()
            .quantity = i32::MAX - 5;

        let (next, id) = log_shipment(&state, &request(&state), "clerk").unwrap();
        let err = receive(&next, id, "clerk").unwrap_err();
        assert_matches!(err, ServiceError::InvalidInput(_));
        // Nothing was booked and the shipment stays in transit.
        assert_eq!(
            next.product(product_id).unwrap().quantity_at(location_id),
            i32::MAX - 5
        );
        assert_eq!(next.shipment(id).unwrap().status, ShipmentStatus::InTransit);
    }

    #[test]
    fn receive_books_stock_once() {
        let state = demo_state(4);
        let product_id = state.products[0].id;
        let location_id = state.locations[0].id;
        let before = state.product(product_id).unwrap().quantity_at(location_id);

        let (next, id) = log_shipment(&state, &request(&state), "clerk").unwrap();
        // Logging alone does not move stock.
        assert_eq!(
            next.product(product_id).unwrap().quantity_at(location_id),
            before
        );

        let received = receive(&next, id, "clerk").unwrap();
        assert_eq!(
            received.product(product_id).unwrap().quantity_at(location_id),
            before + 25
        );
        let doc = received.shipment(id).unwrap();
        assert_eq!(doc.status, ShipmentStatus::Received);
        assert!(doc.received_at.is_some());

        // Receiving twice must fail, not double-book.
        assert_matches!(
            receive(&received, id, "clerk").unwrap_err(),
            ServiceError::InvalidStatus(_)
        );
    }
}
