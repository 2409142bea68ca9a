//! Carts Repository

use jiff::Timestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use trolley::{carts::CartStatus, currency::Currency, pricing::Totals};

use crate::{
    database::{try_get_parsed, try_get_timestamp},
    domain::carts::models::{Cart, CartItem, CartUuid},
    identity::{SessionUuid, UserUuid},
};

const FIND_ACTIVE_USER_CART_SQL: &str = include_str!("../sql/find_active_user_cart.sql");
const FIND_ACTIVE_SESSION_CART_SQL: &str = include_str!("../sql/find_active_session_cart.sql");
const GET_CART_SQL: &str = include_str!("../sql/get_cart.sql");
const LOCK_CART_SQL: &str = include_str!("../sql/lock_cart.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const CLAIM_CART_SQL: &str = include_str!("../sql/claim_cart.sql");
const SET_CART_STATUS_SQL: &str = include_str!("../sql/set_cart_status.sql");
const TOUCH_CART_SQL: &str = include_str!("../sql/touch_cart.sql");

/// A `carts` row, before its items are attached.
#[derive(Debug, Clone)]
pub(crate) struct CartRow {
    pub(crate) uuid: CartUuid,
    pub(crate) user_uuid: Option<UserUuid>,
    pub(crate) session_uuid: Option<SessionUuid>,
    pub(crate) status: CartStatus,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
}

impl CartRow {
    /// Attaches items and derives the subtotal and currency from them.
    pub(crate) fn into_cart(self, items: Vec<CartItem>, fallback_currency: &Currency) -> Cart {
        let Totals { subtotal, currency } = Totals::from_lines(&items, fallback_currency);

        Cart {
            uuid: self.uuid,
            user_uuid: self.user_uuid,
            session_uuid: self.session_uuid,
            status: self.status,
            subtotal,
            currency,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Locks and returns the active cart of `user`.
    pub(crate) async fn find_active_user_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartRow>, sqlx::Error> {
        query_as::<Postgres, CartRow>(FIND_ACTIVE_USER_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Locks and returns the active cart of the guest `session`.
    pub(crate) async fn find_active_session_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: SessionUuid,
    ) -> Result<Option<CartRow>, sqlx::Error> {
        query_as::<Postgres, CartRow>(FIND_ACTIVE_SESSION_CART_SQL)
            .bind(session.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<CartRow, sqlx::Error> {
        query_as::<Postgres, CartRow>(GET_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<CartRow, sqlx::Error> {
        query_as::<Postgres, CartRow>(LOCK_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Inserts an active cart. Returns `None` when a concurrent request created the owner's
    /// active cart first.
    pub(crate) async fn create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Option<UserUuid>,
        session: Option<SessionUuid>,
    ) -> Result<Option<CartRow>, sqlx::Error> {
        query_as::<Postgres, CartRow>(CREATE_CART_SQL)
            .bind(CartUuid::new().into_uuid())
            .bind(user.map(UserUuid::into_uuid))
            .bind(session.map(SessionUuid::into_uuid))
            .fetch_optional(&mut **tx)
            .await
    }

    /// Hands a guest cart over to `user`, dropping the session.
    pub(crate) async fn claim_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        user: UserUuid,
    ) -> Result<CartRow, sqlx::Error> {
        query_as::<Postgres, CartRow>(CLAIM_CART_SQL)
            .bind(cart.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_cart_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        status: CartStatus,
    ) -> Result<CartRow, sqlx::Error> {
        query_as::<Postgres, CartRow>(SET_CART_STATUS_SQL)
            .bind(cart.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn touch_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<CartRow, sqlx::Error> {
        query_as::<Postgres, CartRow>(TOUCH_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CartRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            session_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("session_uuid")?
                .map(SessionUuid::from_uuid),
            status: try_get_parsed(row, "status")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
