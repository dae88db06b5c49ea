//! Energy API handlers.
//!
//! ```text
//! POST /api/v1/energy/collect {"amount": 20}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Collect request body; an absent body or amount collects the default.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectRequest {
    /// Energy to credit; must be at least 1 when present.
    #[serde(default)]
    pub amount: Option<u64>,
}

/// Post-credit balance.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnergyBalance {
    /// The caller's new balance.
    pub energy: u64,
}

/// Credit the caller's energy balance.
#[utoipa::path(
    post,
    path = "/api/v1/energy/collect",
    request_body = CollectRequest,
    responses(
        (status = 200, description = "New balance", body = EnergyBalance),
        (status = 400, description = "Non-positive amount", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["energy"],
    operation_id = "collectEnergy"
)]
#[post("/energy/collect")]
pub async fn collect(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Option<web::Json<CollectRequest>>,
) -> ApiResult<web::Json<EnergyBalance>> {
    let identity = session.require_identity()?;
    let amount = payload.and_then(|body| body.into_inner().amount);
    let energy = state.energy.collect(identity.id, amount)?;
    Ok(web::Json(EnergyBalance { energy }))
}
