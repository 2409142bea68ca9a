//! Identity middleware.
//!
//! Every cart and order route is scoped to the tenant named by `X-Tenant-ID`. The user and guest
//! session headers are optional here; handlers decide which of them they require.

use std::{str::FromStr, sync::Arc};

use salvo::prelude::*;
use tracing::error;
use trolley_app::{
    domain::tenants::{TenantsServiceError, models::TenantUuid},
    identity::{Identity, SESSION_HEADER, SessionUuid, TENANT_HEADER, USER_HEADER, UserUuid},
};

use crate::{extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let (tenant, identity) = match extract(req) {
        Ok(extracted) => extracted,
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    match state.app.tenants.get_tenant(tenant).await {
        Ok(_) => {}
        Err(TenantsServiceError::NotFound) => {
            res.render(
                StatusError::not_found()
                    .brief("Unknown tenant")
                    .detail("TENANT_NOT_FOUND"),
            );
            ctrl.skip_rest();

            return;
        }
        Err(source) => {
            error!("failed to look up tenant: {source}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    }

    depot.insert_tenant_uuid(tenant);
    depot.insert_identity(identity);

    ctrl.call_next(req, depot, res).await;
}

fn extract(req: &Request) -> Result<(TenantUuid, Identity), StatusError> {
    let tenant = header::<TenantUuid>(req, TENANT_HEADER, "INVALID_TENANT_ID")?.ok_or_else(|| {
        StatusError::unauthorized()
            .brief(format!("The {TENANT_HEADER} header is required"))
            .detail("MISSING_TENANT")
    })?;

    let identity = Identity {
        user: header::<UserUuid>(req, USER_HEADER, "INVALID_USER_ID")?,
        session: header::<SessionUuid>(req, SESSION_HEADER, "INVALID_SESSION_ID")?,
    };

    Ok((tenant, identity))
}

/// Parses an optional identifier header. Blank values count as absent.
fn header<T: FromStr>(req: &Request, name: &str, code: &str) -> Result<Option<T>, StatusError> {
    let Some(value) = req.header::<String>(name) else {
        return Ok(None);
    };

    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    value.parse::<T>().map(Some).map_err(|_ignored| {
        StatusError::bad_request()
            .brief(format!("The {name} header must be a UUID"))
            .detail(code)
    })
}
