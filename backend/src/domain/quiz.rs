//! Daily quiz content.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single multiple-choice question.
///
/// `answer` is the letter prefix of the correct option. The server does not
/// grade answers; clients report a correct answer by collecting the quiz
/// reward through the energy endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    /// Question text.
    pub question: String,
    /// Lettered answer options.
    pub options: Vec<String>,
    /// Letter of the correct option.
    pub answer: String,
}
