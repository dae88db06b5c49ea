//! Daily quiz API handler.

use actix_web::{get, web};
use tracing::error;

use crate::domain::Error;
use crate::domain::quiz::Quiz;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The question of the day.
///
/// Answers are not graded here; clients collect the quiz reward through
/// the energy endpoint after a correct answer.
#[utoipa::path(
    get,
    path = "/api/v1/quiz/daily",
    responses(
        (status = 200, description = "Daily quiz", body = Quiz),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Quiz source failed", body = Error)
    ),
    tags = ["quiz"],
    operation_id = "dailyQuiz"
)]
#[get("/quiz/daily")]
pub async fn daily_quiz(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Quiz>> {
    session.require_identity()?;
    state.quiz.daily().map(web::Json).map_err(|err| {
        error!(error = %err, "quiz source failed");
        Error::internal("quiz unavailable")
    })
}
