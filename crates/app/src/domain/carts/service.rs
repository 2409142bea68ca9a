//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, warn};
use trolley::{
    carts::{CartStatus, LineKey},
    currency::Currency,
};

use crate::{
    catalog::{PriceQuery, PriceResolver},
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartItemUuid, CartUuid, CartValidation, NewCartItem, SkippedItem},
            repositories::{CartRow, NewCartItemRow, PgCartItemsRepository, PgCartsRepository},
        },
        tenants::models::TenantUuid,
    },
    identity::{Identity, SessionUuid, UserUuid},
};

/// Converts a requested quantity to its storage type, rejecting zero and overflow.
fn storable_quantity(quantity: u32) -> Result<i32, CartsServiceError> {
    i32::try_from(quantity)
        .ok()
        .filter(|quantity| *quantity >= 1)
        .ok_or(CartsServiceError::InvalidQuantity)
}

#[derive(Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    resolver: Arc<dyn PriceResolver>,
    fallback_currency: Currency,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db, resolver: Arc<dyn PriceResolver>, fallback_currency: Currency) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            resolver,
            fallback_currency,
        }
    }

    /// Inserts an active cart, or locks the one a concurrent request just created.
    async fn create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Option<UserUuid>,
        session: Option<SessionUuid>,
    ) -> Result<CartRow, CartsServiceError> {
        if let Some(created) = self.carts_repository.create_cart(tx, user, session).await? {
            return Ok(created);
        }

        let existing = match (user, session) {
            (Some(user), _) => self.carts_repository.find_active_user_cart(tx, user).await?,
            (None, Some(session)) => {
                self.carts_repository
                    .find_active_session_cart(tx, session)
                    .await?
            }
            (None, None) => None,
        };

        existing.ok_or(CartsServiceError::AlreadyExists)
    }

    /// Finds, claims or creates the active cart of `identity`, locking its row.
    async fn active_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        identity: Identity,
    ) -> Result<CartRow, CartsServiceError> {
        match (identity.user, identity.session) {
            (None, None) => Err(CartsServiceError::MissingIdentity),
            (Some(user), session) => {
                if let Some(cart) = self.carts_repository.find_active_user_cart(tx, user).await? {
                    return Ok(cart);
                }

                if let Some(session) = session
                    && let Some(guest) = self
                        .carts_repository
                        .find_active_session_cart(tx, session)
                        .await?
                {
                    debug!(cart = %guest.uuid, %user, "claiming guest cart");

                    return Ok(self.carts_repository.claim_cart(tx, guest.uuid, user).await?);
                }

                self.create_cart(tx, Some(user), None).await
            }
            (None, Some(session)) => {
                match self
                    .carts_repository
                    .find_active_session_cart(tx, session)
                    .await?
                {
                    Some(cart) => Ok(cart),
                    None => self.create_cart(tx, None, Some(session)).await,
                }
            }
        }
    }

    /// Attaches freshly loaded items to a cart row.
    async fn load_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        row: CartRow,
    ) -> Result<Cart, CartsServiceError> {
        let items = self.items_repository.get_cart_items(tx, row.uuid).await?;

        Ok(row.into_cart(items, &self.fallback_currency))
    }

    /// Bumps the cart timestamp and reloads it with its items.
    async fn touch_and_load(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Cart, CartsServiceError> {
        let row = self.carts_repository.touch_cart(tx, cart).await?;

        self.load_cart(tx, row).await
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_active_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let row = self.active_cart(&mut tx, identity).await?;
        let cart = self.load_cart(&mut tx, row).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn get_cart(&self, tenant: TenantUuid, cart: CartUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let row = self.carts_repository.get_cart(&mut tx, cart).await?;
        let cart = self.load_cart(&mut tx, row).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.add_item",
        skip(self, item),
        fields(product = %item.product_uuid, quantity = item.quantity)
    )]
    async fn add_item(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        item: NewCartItem,
    ) -> Result<Cart, CartsServiceError> {
        storable_quantity(item.quantity)?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self.active_cart(&mut tx, identity).await?;
        cart.status.ensure_active()?;

        let items = self.items_repository.get_cart_items(&mut tx, cart.uuid).await?;

        let key = LineKey::new(
            cart.uuid.into_uuid(),
            item.product_uuid,
            item.variant_uuid,
            item.configuration.as_ref(),
        );

        if let Some(existing) = key.find_in(&items) {
            let quantity = existing
                .quantity
                .checked_add(item.quantity)
                .ok_or(CartsServiceError::InvalidQuantity)?;

            debug!(item = %existing.uuid, quantity, "merging into existing cart line");

            self.items_repository
                .update_cart_item_quantity(
                    &mut tx,
                    cart.uuid,
                    existing.uuid,
                    storable_quantity(quantity)?,
                )
                .await?;
        } else {
            let price = self
                .resolver
                .resolve_price(
                    tenant,
                    PriceQuery {
                        product_uuid: item.product_uuid,
                        variant_uuid: item.variant_uuid,
                        quantity: item.quantity,
                        configuration: item.configuration.clone(),
                    },
                )
                .await?;

            self.items_repository
                .create_cart_item(
                    &mut tx,
                    cart.uuid,
                    NewCartItemRow {
                        product_uuid: item.product_uuid,
                        variant_uuid: item.variant_uuid,
                        quantity: storable_quantity(item.quantity)?,
                        configuration: item.configuration,
                        price,
                    },
                )
                .await?;
        }

        let cart = self.touch_and_load(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn update_item_quantity(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        let quantity = storable_quantity(quantity)?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self.active_cart(&mut tx, identity).await?;
        cart.status.ensure_active()?;

        self.items_repository
            .update_cart_item_quantity(&mut tx, cart.uuid, item, quantity)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        let cart = self.touch_and_load(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        item: CartItemUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self.active_cart(&mut tx, identity).await?;
        cart.status.ensure_active()?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, cart.uuid, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        let cart = self.touch_and_load(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn clear_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self.active_cart(&mut tx, identity).await?;
        cart.status.ensure_active()?;

        self.items_repository
            .clear_cart_items(&mut tx, cart.uuid)
            .await?;

        let cart = self.touch_and_load(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(name = "carts.validate_cart", skip(self))]
    async fn validate_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
    ) -> Result<CartValidation, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self.active_cart(&mut tx, identity).await?;
        let items = self.items_repository.get_cart_items(&mut tx, cart.uuid).await?;

        let mut skipped = Vec::new();

        for item in items {
            match self.resolver.resolve_price(tenant, item.price_query()).await {
                Ok(price) => {
                    self.items_repository
                        .refresh_cart_item(&mut tx, item.uuid, price)
                        .await?;
                }
                Err(error) => {
                    warn!(item = %item.uuid, product = %item.product_uuid, %error, "left cart item unchanged");

                    skipped.push(SkippedItem {
                        item_uuid: item.uuid,
                        product_uuid: item.product_uuid,
                        reason: error.to_string(),
                    });
                }
            }
        }

        let cart = self.touch_and_load(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(CartValidation { cart, skipped })
    }

    #[tracing::instrument(name = "carts.merge_carts", skip(self))]
    async fn merge_carts(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        session: SessionUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let guest = self
            .carts_repository
            .find_active_session_cart(&mut tx, session)
            .await?;

        let owned = self
            .carts_repository
            .find_active_user_cart(&mut tx, user)
            .await?;

        let cart = match (guest, owned) {
            (Some(guest), Some(owned)) => {
                let moved = self
                    .items_repository
                    .move_cart_items(&mut tx, guest.uuid, owned.uuid)
                    .await?;

                self.carts_repository
                    .set_cart_status(&mut tx, guest.uuid, guest.status.transition(CartStatus::Merged)?)
                    .await?;

                debug!(from = %guest.uuid, into = %owned.uuid, moved, "merged guest cart");

                self.touch_and_load(&mut tx, owned.uuid).await?
            }
            (Some(guest), None) => {
                let claimed = self
                    .carts_repository
                    .claim_cart(&mut tx, guest.uuid, user)
                    .await?;

                self.load_cart(&mut tx, claimed).await?
            }
            (None, Some(owned)) => self.load_cart(&mut tx, owned).await?,
            (None, None) => {
                let created = self.create_cart(&mut tx, Some(user), None).await?;

                self.load_cart(&mut tx, created).await?
            }
        };

        tx.commit().await?;

        Ok(cart)
    }

    async fn complete_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        cart: CartUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let row = self.carts_repository.lock_cart(&mut tx, cart).await?;
        let current = self.load_cart(&mut tx, row).await?;

        if !current.is_owned_by(&identity) {
            return Err(CartsServiceError::NotFound);
        }

        let status = current.status.transition(CartStatus::Completed)?;
        let row = self
            .carts_repository
            .set_cart_status(&mut tx, cart, status)
            .await?;

        let completed = self.load_cart(&mut tx, row).await?;

        tx.commit().await?;

        Ok(completed)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the caller's active cart, claiming their guest cart or creating one as needed.
    async fn get_active_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
    ) -> Result<Cart, CartsServiceError>;

    /// Retrieve a single cart in any status.
    async fn get_cart(&self, tenant: TenantUuid, cart: CartUuid) -> Result<Cart, CartsServiceError>;

    /// Add an item to the caller's active cart, merging it into a matching line.
    async fn add_item(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        item: NewCartItem,
    ) -> Result<Cart, CartsServiceError>;

    /// Set the quantity of an item in the caller's active cart.
    async fn update_item_quantity(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove an item from the caller's active cart.
    async fn remove_item(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        item: CartItemUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove every item from the caller's active cart.
    async fn clear_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
    ) -> Result<Cart, CartsServiceError>;

    /// Re-price every item against the catalog. Items that cannot be priced are reported and
    /// left as they were.
    async fn validate_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
    ) -> Result<CartValidation, CartsServiceError>;

    /// Move the guest session's items into the user's cart.
    async fn merge_carts(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        session: SessionUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Mark an active cart owned by the caller as completed.
    async fn complete_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        cart: CartUuid,
    ) -> Result<Cart, CartsServiceError>;
}
