use cloudkitchen_backend::config::CheckoutConfig;
use cloudkitchen_backend::model::order::DeliveryMethod;
use cloudkitchen_backend::service::order_service::compute_totals;
use cloudkitchen_backend::util::money::round2;

fn config() -> CheckoutConfig {
    CheckoutConfig::default()
}

#[test]
fn test_pickup_order_totals() {
    // 25.00 subtotal: 1.25 service, 2.00 tax, no delivery fee
    let totals = compute_totals(25.0, DeliveryMethod::Pickup, &config());
    assert_eq!(totals.subtotal, 25.0);
    assert_eq!(totals.delivery_fee, 0.0);
    assert_eq!(totals.service_fee, 1.25);
    assert_eq!(totals.tax, 2.0);
    assert_eq!(totals.discount, 0.0);
    assert_eq!(totals.total, 28.25);
}

#[test]
fn test_delivery_order_totals() {
    let totals = compute_totals(25.0, DeliveryMethod::Delivery, &config());
    assert_eq!(totals.delivery_fee, 4.99);
    assert_eq!(totals.total, 33.24);
}

#[test]
fn test_fees_are_rounded_per_component() {
    let totals = compute_totals(19.98, DeliveryMethod::Delivery, &config());
    assert_eq!(totals.service_fee, 1.0);
    assert_eq!(totals.tax, 1.6);
    assert_eq!(totals.total, round2(19.98 + 4.99 + 1.0 + 1.6));
}

#[test]
fn test_zero_subtotal() {
    let totals = compute_totals(0.0, DeliveryMethod::Pickup, &config());
    assert_eq!(totals.total, 0.0);
}

#[test]
fn test_custom_rates() {
    let config = CheckoutConfig {
        delivery_fee_flat: 2.5,
        service_fee_rate: 0.1,
        tax_rate: 0.0,
    };
    let totals = compute_totals(40.0, DeliveryMethod::Delivery, &config);
    assert_eq!(totals.delivery_fee, 2.5);
    assert_eq!(totals.service_fee, 4.0);
    assert_eq!(totals.tax, 0.0);
    assert_eq!(totals.total, 46.5);
}

#[test]
fn test_round2_half_away_from_zero() {
    assert_eq!(round2(1.005001), 1.01);
    assert_eq!(round2(2.675001), 2.68);
    assert_eq!(round2(-1.115001), -1.12);
}
