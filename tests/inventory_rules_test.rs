//! Aggregation, reorder, transfer, and intake rules over the demo snapshot.

use chrono::Utc;
use rust_decimal_macros::dec;
use stockroom::fixtures::demo_state;
use stockroom::models::{Product, StockRecord};
use stockroom::services::inventory::{
    evaluate, quantity_in_locations, set_reorder_levels, total_quantity, transfer_stock,
    ReorderLevelEdit, TransferStockRequest,
};
use stockroom::services::receiving::{log_shipment, receive, LogShipmentRequest, NewShipmentLine};
use test_case::test_case;
use uuid::Uuid;

fn product(reorder_level: i32, quantities: &[i32]) -> Product {
    Product {
        id: Uuid::new_v4(),
        name: "Test Product".into(),
        category: "Misc".into(),
        image: None,
        cost_price: dec!(10),
        wholesale_price: dec!(12.5),
        retail_price: dec!(35),
        retail_price_usd: dec!(2),
        reorder_level,
        locations: quantities
            .iter()
            .map(|&quantity| StockRecord {
                location_id: Uuid::new_v4(),
                quantity,
                is_sub_location: false,
            })
            .collect(),
        note: None,
        created_at: Utc::now(),
    }
}

#[test_case(10, &[3, 2], 5, 5, 0 ; "shortage when below level")]
#[test_case(10, &[7, 8], 15, 0, 5 ; "surplus when above level")]
#[test_case(10, &[10], 10, 0, 0 ; "balanced at exact level")]
#[test_case(5, &[], 0, 5, 0 ; "empty stock is all shortage")]
#[test_case(0, &[4], 4, 0, 4 ; "zero level is all surplus")]
fn reorder_classification(
    level: i32,
    quantities: &[i32],
    total: i64,
    shortage: i64,
    surplus: i64,
) {
    let p = product(level, quantities);
    assert_eq!(total_quantity(&p), total);
    let report = evaluate(&p);
    assert_eq!(report.total_quantity, total);
    assert_eq!(report.shortage, shortage);
    assert_eq!(report.surplus, surplus);
}

#[test]
fn hierarchy_rule_on_demo_tree() {
    let state = demo_state(50);
    let warehouse = &state.locations[0];
    let sub = warehouse.sub_locations[0].id;

    // A product stocked both at the warehouse itself and inside one aisle.
    let mut p = product(0, &[]);
    p.locations = vec![
        StockRecord {
            location_id: warehouse.id,
            quantity: 6,
            is_sub_location: false,
        },
        StockRecord {
            location_id: sub,
            quantity: 4,
            is_sub_location: true,
        },
    ];

    assert_eq!(quantity_in_locations(&p, &[warehouse.id], &state.locations), 10);
    assert_eq!(quantity_in_locations(&p, &[sub], &state.locations), 4);
    assert_eq!(
        quantity_in_locations(&p, &[warehouse.id, sub], &state.locations),
        10
    );
}

#[test]
fn reorder_edits_report_fresh_levels() {
    let state = demo_state(51);
    let targets: Vec<ReorderLevelEdit> = state
        .products
        .iter()
        .take(3)
        .map(|p| ReorderLevelEdit {
            product_id: p.id,
            reorder_level: 1_000,
        })
        .collect();

    let (next, reports) = set_reorder_levels(&state, &targets, "planner").unwrap();
    assert_eq!(reports.len(), 3);
    for (product_id, level) in &reports {
        let p = next.product(*product_id).unwrap();
        assert_eq!(level.total_quantity, p.total_quantity());
        // Every demo product holds far less than 1000 units.
        assert!(level.shortage > 0);
        assert_eq!(level.surplus, 0);
    }
}

#[test]
fn transfer_then_receive_keeps_books_consistent() {
    let state = demo_state(52);
    let product_id = state.products[0].id;
    let central = state.locations[0].id;
    let store = state.locations[2].id;
    let total_before = state.product(product_id).unwrap().total_quantity();
    let store_before = state.product(product_id).unwrap().quantity_at(store);

    // Move two units to the store, then receive a shipment of ten at the
    // store; only the shipment changes the total.
    let state = transfer_stock(
        &state,
        &TransferStockRequest {
            product_id,
            from_location_id: central,
            to_location_id: store,
            quantity: 2,
        },
        "ops",
    )
    .unwrap();
    assert_eq!(state.product(product_id).unwrap().total_quantity(), total_before);

    let (state, shipment_id) = log_shipment(
        &state,
        &LogShipmentRequest {
            reference: "PO-9001".into(),
            supplier: "Acme Foods".into(),
            location_id: store,
            lines: vec![NewShipmentLine {
                product_id,
                quantity: 10,
            }],
            expected_at: Utc::now(),
        },
        "ops",
    )
    .unwrap();
    let state = receive(&state, shipment_id, "ops").unwrap();

    let p = state.product(product_id).unwrap();
    assert_eq!(p.total_quantity(), total_before + 10);
    assert_eq!(p.quantity_at(store), store_before + 12);
}
