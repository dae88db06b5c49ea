//! Growth rollup API handler.

use actix_web::{get, web};

use crate::domain::Error;
use crate::domain::growth::GrowthSnapshot;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Aggregated activity counters for the caller.
#[utoipa::path(
    get,
    path = "/api/v1/growth",
    responses(
        (status = 200, description = "Growth snapshot", body = GrowthSnapshot),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["growth"],
    operation_id = "growthStats"
)]
#[get("/growth")]
pub async fn growth_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<GrowthSnapshot>> {
    let identity = session.require_identity()?;
    Ok(web::Json(state.growth.snapshot(identity.id)?))
}
