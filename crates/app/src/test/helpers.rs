//! Test Helpers

use std::{collections::HashMap, sync::Arc};

use rust_decimal::Decimal;
use trolley::{currency::Currency, products::ProductType};
use uuid::Uuid;

use crate::{
    catalog::{MockPriceResolver, PricingError, ProductDetails, ResolvedPrice},
    domain::{
        carts::{CartsService, PgCartsService, models::NewCartItem},
        orders::{
            CartGateway, CheckoutService, LocalCartGateway,
            models::{CheckoutDetails, Order},
        },
    },
    identity::{Identity, UserUuid},
    test::TestContext,
};

pub(crate) fn chf() -> Currency {
    Currency::new("CHF").expect("CHF is a valid currency")
}

pub(crate) fn resolved(unit_price: Decimal, name: &str) -> ResolvedPrice {
    ResolvedPrice {
        unit_price,
        currency: chf(),
        product_type: ProductType::Simple,
        details: ProductDetails {
            name: name.to_string(),
            sku: Some(format!("SKU-{name}")),
            image_url: None,
        },
    }
}

/// A resolver pricing each listed product at a fixed CHF unit price. Unlisted products are
/// reported as missing from the catalog.
pub(crate) fn price_list(prices: &[(Uuid, Decimal)]) -> MockPriceResolver {
    let prices: HashMap<Uuid, Decimal> = prices.iter().copied().collect();
    let mut resolver = MockPriceResolver::new();

    resolver.expect_resolve_price().returning(move |_, query| {
        prices
            .get(&query.product_uuid)
            .map(|price| resolved(*price, &query.product_uuid.to_string()))
            .ok_or(PricingError::ProductNotFound(query.product_uuid))
    });

    resolver
}

pub(crate) fn local_gateway(carts: PgCartsService) -> Arc<dyn CartGateway> {
    Arc::new(LocalCartGateway::new(Arc::new(carts)))
}

/// Fills a fresh cart for `user` with one product per `(unit_price, quantity)` line and checks
/// it out.
pub(crate) async fn place_order(
    ctx: &TestContext,
    user: UserUuid,
    lines: &[(Decimal, u32)],
) -> Order {
    let lines: Vec<(Uuid, Decimal, u32)> = lines
        .iter()
        .map(|(unit_price, quantity)| (Uuid::now_v7(), *unit_price, *quantity))
        .collect();

    let prices: Vec<(Uuid, Decimal)> = lines
        .iter()
        .map(|(product, unit_price, _)| (*product, *unit_price))
        .collect();

    let carts = ctx.carts(price_list(&prices));
    let identity = Identity::user(user);

    for (product_uuid, _, quantity) in lines {
        carts
            .add_item(
                ctx.tenant_uuid,
                identity,
                NewCartItem {
                    product_uuid,
                    variant_uuid: None,
                    quantity,
                    configuration: None,
                },
            )
            .await
            .expect("Failed to add item to cart");
    }

    ctx.checkout(local_gateway(carts))
        .checkout(ctx.tenant_uuid, identity, CheckoutDetails::default())
        .await
        .expect("Failed to place order")
}
