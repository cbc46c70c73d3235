//! Customer pricing overlay behavior.

use assert_matches::assert_matches;
use chrono::Utc;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use stockroom::fixtures::demo_state;
use stockroom::models::CustomerPrice;
use stockroom::services::pricing::{
    assign, effective_price, selectable_products, AssignPriceRequest,
};
use stockroom::ServiceError;
use uuid::Uuid;

fn overlay(special: Option<Decimal>, discount: Option<Decimal>) -> CustomerPrice {
    CustomerPrice {
        id: Uuid::new_v4(),
        customer_id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        special_price: special,
        discount,
        note: None,
        created_at: Utc::now(),
    }
}

#[rstest]
#[case::special_wins(Some(dec!(100)), Some(dec!(50)), dec!(100))]
#[case::special_only(Some(dec!(80)), None, dec!(80))]
#[case::discount_only(None, Some(dec!(20)), dec!(120))]
#[case::nothing_set(None, None, dec!(150))]
fn effective_price_resolution(
    #[case] special: Option<Decimal>,
    #[case] discount: Option<Decimal>,
    #[case] expected: Decimal,
) {
    let state = demo_state(60);
    let mut product = state.products[0].clone();
    product.wholesale_price = dec!(150);
    let cp = overlay(special, discount);
    assert_eq!(effective_price(&product, Some(&cp)), expected);
}

#[test]
fn assignment_shrinks_the_selectable_list() {
    let state = demo_state(61);
    let customer = state.customers[0].id;
    let before = selectable_products(&state, customer).len();
    assert_eq!(before, state.products.len());

    let (state, _) = assign(
        &state,
        &AssignPriceRequest {
            customer_id: customer,
            product_id: state.products[0].id,
            special_price: Some(dec!(45)),
            discount: None,
            note: None,
        },
        "sales",
    )
    .unwrap();
    assert_eq!(selectable_products(&state, customer).len(), before - 1);

    // Other customers are unaffected.
    let other = state.customers[5].id;
    assert_eq!(selectable_products(&state, other).len(), state.products.len());
}

#[test]
fn assignment_requires_known_customer_and_product() {
    let state = demo_state(62);
    assert_matches!(
        assign(
            &state,
            &AssignPriceRequest {
                customer_id: Uuid::new_v4(),
                product_id: state.products[0].id,
                special_price: None,
                discount: Some(dec!(5)),
                note: None,
            },
            "sales",
        )
        .unwrap_err(),
        ServiceError::NotFound(_)
    );
    assert_matches!(
        assign(
            &state,
            &AssignPriceRequest {
                customer_id: state.customers[0].id,
                product_id: Uuid::new_v4(),
                special_price: None,
                discount: Some(dec!(5)),
                note: None,
            },
            "sales",
        )
        .unwrap_err(),
        ServiceError::NotFound(_)
    );
}
