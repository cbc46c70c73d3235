//! Deterministic demo data.
//!
//! The generator is driven entirely by a caller-supplied seed: the same seed
//! always yields the same snapshot, ids and quantities included, so demos
//! and tests are reproducible.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::models::adjustment::reason_by_code;
use crate::models::{
    AdjustmentLine, AdjustmentStatus, AdjustmentType, Customer, CustomerPrice, IncomingShipment,
    Location, LocationKind, Product, ShipmentLine, ShipmentStatus, StockAdjustment, StockRecord,
    SubLocation, FX_RATE,
};
use crate::state::AppState;

const PRODUCT_NAMES: &[(&str, &str)] = &[
    ("Sparkling Water 12-pack", "Beverages"),
    ("Cold Brew Coffee", "Beverages"),
    ("Orange Juice 1L", "Beverages"),
    ("Tortilla Chips", "Snacks"),
    ("Salted Peanuts", "Snacks"),
    ("Granola Bars", "Snacks"),
    ("Whole Milk 1L", "Dairy"),
    ("Greek Yogurt", "Dairy"),
    ("Cheddar Block", "Dairy"),
    ("Dish Soap", "Cleaning"),
    ("Laundry Detergent", "Cleaning"),
    ("Glass Cleaner", "Cleaning"),
    ("Sourdough Loaf", "Bakery"),
    ("Croissants 6-pack", "Bakery"),
    ("Bagels 4-pack", "Bakery"),
    ("Paper Towels", "Household"),
    ("Trash Bags 30ct", "Household"),
    ("Light Bulbs 4-pack", "Household"),
    ("Olive Oil 500ml", "Pantry"),
    ("Basmati Rice 2kg", "Pantry"),
];

const CUSTOMER_NAMES: &[(&str, &str)] = &[
    ("La Esquina Market", "compras@laesquina.example"),
    ("Blue Door Cafe", "supplies@bluedoor.example"),
    ("Hotel Mirador", "procurement@mirador.example"),
    ("Rapid Mart", "orders@rapidmart.example"),
    ("Green Grocer Co", "buying@greengrocer.example"),
    ("Plaza Kitchen", "kitchen@plaza.example"),
];

fn gen_id(rng: &mut StdRng) -> Uuid {
    Uuid::from_u128(rng.gen())
}

fn base_time() -> DateTime<Utc> {
    // 2024-01-15T08:00:00Z
    DateTime::from_timestamp(1_705_305_600, 0).unwrap_or_default()
}

/// Builds a fully populated demo snapshot from a seed.
pub fn demo_state(seed: u64) -> AppState {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = base_time();

    // Location tree: two warehouses with sub-locations and one store.
    let central_id = gen_id(&mut rng);
    let central = Location {
        id: central_id,
        name: "Central Warehouse".into(),
        kind: LocationKind::Warehouse,
        sub_locations: ["Aisle A", "Aisle B", "Cold Room"]
            .iter()
            .map(|name| SubLocation {
                id: gen_id(&mut rng),
                parent_id: central_id,
                name: (*name).into(),
                kind: LocationKind::Warehouse,
            })
            .collect(),
    };
    let north_id = gen_id(&mut rng);
    let north = Location {
        id: north_id,
        name: "North Warehouse".into(),
        kind: LocationKind::Warehouse,
        sub_locations: vec![SubLocation {
            id: gen_id(&mut rng),
            parent_id: north_id,
            name: "Receiving Dock".into(),
            kind: LocationKind::Warehouse,
        }],
    };
    let store = Location {
        id: gen_id(&mut rng),
        name: "Downtown Store".into(),
        kind: LocationKind::Store,
        sub_locations: vec![],
    };

    // Leaf ids a product may hold extra stock at, beyond Central.
    let mut extra_sites: Vec<(Uuid, bool)> = Vec::new();
    extra_sites.extend(central.sub_locations.iter().map(|s| (s.id, true)));
    extra_sites.push((north.id, false));
    extra_sites.extend(north.sub_locations.iter().map(|s| (s.id, true)));
    extra_sites.push((store.id, false));

    let products: Vec<Product> = PRODUCT_NAMES
        .iter()
        .enumerate()
        .map(|(i, &(name, category))| {
            let cost = Decimal::from(rng.gen_range(20..200));
            let retail_usd = Decimal::from(rng.gen_range(2..40));
            let mut locations = vec![StockRecord {
                location_id: central.id,
                quantity: rng.gen_range(5..150),
                is_sub_location: false,
            }];
            let mut candidates = extra_sites.clone();
            for _ in 0..rng.gen_range(0..3) {
                let (location_id, is_sub_location) =
                    candidates.remove(rng.gen_range(0..candidates.len()));
                locations.push(StockRecord {
                    location_id,
                    quantity: rng.gen_range(0..120),
                    is_sub_location,
                });
            }
            Product {
                id: gen_id(&mut rng),
                name: name.into(),
                category: category.into(),
                image: None,
                cost_price: cost,
                wholesale_price: cost * dec!(1.25),
                retail_price: retail_usd * FX_RATE,
                retail_price_usd: retail_usd,
                reorder_level: rng.gen_range(5..50),
                locations,
                note: None,
                created_at: base + Duration::days(i as i64),
            }
        })
        .collect();

    let customers: Vec<Customer> = CUSTOMER_NAMES
        .iter()
        .enumerate()
        .map(|(i, &(name, email))| Customer {
            id: gen_id(&mut rng),
            name: name.into(),
            email: email.into(),
            phone: format!("+52 55 {:04} {:04}", rng.gen_range(1000..10000), i),
            address: format!("Calle {} #{}", i + 1, rng.gen_range(1..200)),
            city: "Mexico City".into(),
            country: "Mexico".into(),
            image: None,
            note: None,
            created_at: base + Duration::days(i as i64),
        })
        .collect();

    // Overlays for a couple of pairs; indices chosen so tests can freely
    // assign overlays to the first customer and product.
    let customer_prices = vec![
        CustomerPrice {
            id: gen_id(&mut rng),
            customer_id: customers[1].id,
            product_id: products[3].id,
            special_price: None,
            discount: Some(Decimal::from(rng.gen_range(5..30))),
            note: None,
            created_at: base + Duration::days(20),
        },
        CustomerPrice {
            id: gen_id(&mut rng),
            customer_id: customers[2].id,
            product_id: products[4].id,
            special_price: Some((products[4].wholesale_price - dec!(5)).max(dec!(1))),
            discount: None,
            note: Some("negotiated at trade fair".into()),
            created_at: base + Duration::days(21),
        },
    ];

    // One pending adjustment awaiting review at Central.
    let damaged = reason_by_code("DAMAGED").map(|r| r.id).unwrap_or_default();
    let stock_take = reason_by_code("STOCK_TAKING_ERROR")
        .map(|r| r.id)
        .unwrap_or_default();
    let adj_lines = vec![
        AdjustmentLine {
            product_id: products[0].id,
            product_name: products[0].name.clone(),
            product_image: None,
            category: products[0].category.clone(),
            adjustment_type: AdjustmentType::Remove,
            quantity: 2,
            previous_quantity: products[0].quantity_at(central.id),
            new_quantity: products[0].quantity_at(central.id) - 2,
            reason_id: damaged,
            custom_reason: None,
            proof: None,
        },
        AdjustmentLine {
            product_id: products[1].id,
            product_name: products[1].name.clone(),
            product_image: None,
            category: products[1].category.clone(),
            adjustment_type: AdjustmentType::Add,
            quantity: 10,
            previous_quantity: products[1].quantity_at(central.id),
            new_quantity: products[1].quantity_at(central.id) + 10,
            reason_id: stock_take,
            custom_reason: None,
            proof: None,
        },
    ];
    let adjustments = vec![StockAdjustment {
        id: gen_id(&mut rng),
        location_id: central.id,
        location_name: central.name.clone(),
        lines: adj_lines,
        status: AdjustmentStatus::Pending,
        note: None,
        created_at: base + Duration::days(25),
        completed_at: None,
        approved_by: None,
        approved_at: None,
        rejected_by: None,
        rejected_at: None,
    }];

    let shipments = vec![IncomingShipment {
        id: gen_id(&mut rng),
        reference: "PO-1042".into(),
        supplier: "Altiplano Distribution".into(),
        location_id: north.id,
        location_name: north.name.clone(),
        lines: vec![
            ShipmentLine {
                product_id: products[2].id,
                product_name: products[2].name.clone(),
                quantity: 40,
            },
            ShipmentLine {
                product_id: products[3].id,
                product_name: products[3].name.clone(),
                quantity: 16,
            },
        ],
        status: ShipmentStatus::InTransit,
        expected_at: base + Duration::days(27),
        received_at: None,
        created_at: base + Duration::days(24),
    }];

    AppState {
        locations: vec![central, north, store],
        products,
        customers,
        customer_prices,
        adjustments,
        shipments,
        audit_log: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_state() {
        let a = demo_state(42);
        let b = demo_state(42);
        assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
    }

    #[test]
    fn different_seeds_differ() {
        let a = demo_state(1);
        let b = demo_state(2);
        assert_ne!(a.products[0].id, b.products[0].id);
    }

    #[test]
    fn fixture_respects_model_invariants() {
        let state = demo_state(99);
        for location in &state.locations {
            for sub in &location.sub_locations {
                assert_eq!(sub.parent_id, location.id);
            }
        }
        for product in &state.products {
            assert!(product.retail_prices_consistent());
            assert!(product.locations.iter().all(|r| r.quantity >= 0));
            // At most one record per location id.
            for (i, record) in product.locations.iter().enumerate() {
                assert!(product.locations[i + 1..]
                    .iter()
                    .all(|r| r.location_id != record.location_id));
            }
        }
        for adjustment in &state.adjustments {
            for line in &adjustment.lines {
                assert!(line.new_quantity >= 0);
                assert_eq!(
                    line.new_quantity,
                    line.previous_quantity + line.signed_delta()
                );
            }
        }
    }
}
