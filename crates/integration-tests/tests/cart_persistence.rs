//! Integration tests for cart persistence through the file-backed profile.

use nexis_integration_tests::{TestProfile, lamp, mug, shipping_details};
use nexis_storefront::checkout::{OrderSummary, place_order};
use nexis_storefront::config::DEFAULT_CART_KEY;
use rust_decimal::Decimal;
use serde_json::json;

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_cart_survives_restart() {
    let profile = TestProfile::new();

    let first = profile.session();
    first.hydrate();
    first.cart().add_to_cart(&mug()).unwrap();
    first.cart().add_to_cart(&mug()).unwrap();
    first.cart().add_to_cart(&lamp()).unwrap();

    let second = profile.session();
    second.hydrate();
    assert_eq!(second.cart().items(), first.cart().items());
    assert_eq!(second.cart().get_item_count(), 3);
    assert_eq!(second.cart().get_cart_total(), Decimal::new(6500, 2));
}

#[test]
fn test_snapshot_file_shape() {
    let profile = TestProfile::new();
    let state = profile.session();
    state.cart().add_item(&mug()).unwrap();
    state.cart().add_item(&mug()).unwrap();

    assert_eq!(
        profile.read_snapshot(DEFAULT_CART_KEY).unwrap(),
        json!([{
            "id": "7",
            "name": "Mug",
            "price": 12.5,
            "image": "/img/mug.jpg",
            "quantity": 2
        }])
    );
}

#[test]
fn test_totals_follow_quantity_changes() {
    let profile = TestProfile::new();
    let cart = profile.session().cart().clone();

    cart.add_to_cart(&mug()).unwrap();
    assert_eq!(cart.get_cart_total(), Decimal::new(125, 1));

    cart.update_item_quantity(7, 5).unwrap();
    assert_eq!(cart.get_cart_total(), Decimal::new(625, 1));

    // Direct edits never drop a line below one unit
    cart.update_item_quantity("7", 0).unwrap();
    assert_eq!(cart.get_item_count(), 1);

    cart.remove_from_cart(7).unwrap();
    assert!(cart.is_empty());
    assert_eq!(profile.read_snapshot(DEFAULT_CART_KEY).unwrap(), json!([]));
}

// =============================================================================
// Hydration
// =============================================================================

#[test]
fn test_invalid_entries_dropped_on_hydrate() {
    let profile = TestProfile::new();
    profile.write_snapshot(
        DEFAULT_CART_KEY,
        &json!([
            {"id": 7, "name": "Mug", "price": 12.5, "image": "", "quantity": 2},
            {"id": 8, "name": "No Price", "image": "", "quantity": 1},
            {"id": 9, "name": "Zero", "price": 1, "image": "", "quantity": 0},
            {"id": "", "name": "No Id", "price": 1, "image": "", "quantity": 1},
            "not an object"
        ])
        .to_string(),
    );

    let state = profile.session();
    state.hydrate();

    let items = state.cart().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_str(), "7");
    assert_eq!(items[0].quantity, 2);
}

#[test]
fn test_corrupt_snapshot_starts_empty_and_is_replaced() {
    let profile = TestProfile::new();
    profile.write_snapshot(DEFAULT_CART_KEY, "{not json");

    let state = profile.session();
    state.hydrate();
    assert!(state.cart().is_empty());

    state.cart().add_to_cart(&lamp()).unwrap();
    let snapshot = profile.read_snapshot(DEFAULT_CART_KEY).unwrap();
    assert_eq!(snapshot.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_numeric_and_string_ids_merge_on_hydrate() {
    let profile = TestProfile::new();
    profile.write_snapshot(
        DEFAULT_CART_KEY,
        &json!([
            {"id": 7, "name": "Mug", "price": 12.5, "image": "", "quantity": 1},
            {"id": "7", "name": "Mug", "price": 12.5, "image": "", "quantity": 2}
        ])
        .to_string(),
    );

    let state = profile.session();
    state.cart().add_to_cart(&mug()).unwrap();

    let items = state.cart().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 4);
}

#[test]
fn test_mutation_before_hydrate_keeps_stored_lines() {
    let profile = TestProfile::new();
    profile.session().cart().add_to_cart(&mug()).unwrap();

    // No explicit hydrate: the first write must not clobber the stored cart
    let state = profile.session();
    state.cart().add_to_cart(&lamp()).unwrap();
    assert_eq!(state.cart().items().len(), 2);

    let reloaded = profile.session();
    reloaded.hydrate();
    assert_eq!(reloaded.cart().get_item_count(), 2);
}

// =============================================================================
// Checkout
// =============================================================================

#[test]
fn test_placed_order_clears_persisted_cart() {
    let profile = TestProfile::new();
    let state = profile.session();
    state.cart().add_to_cart(&mug()).unwrap();
    state.cart().add_to_cart(&mug()).unwrap();

    let summary = OrderSummary::from_lines(&state.cart().items(), state.pricing());
    let confirmation = place_order(state.cart(), state.pricing(), shipping_details()).unwrap();
    assert_eq!(confirmation.summary, summary);
    assert_eq!(confirmation.summary.total, Decimal::new(2700, 2));

    let reloaded = profile.session();
    reloaded.hydrate();
    assert!(reloaded.cart().is_empty());
}
