//! Journal API handlers: moods, meditations, stories, memorials, and
//! planting notes.
//!
//! Every collection is private to the caller; lists return the caller's
//! records newest first.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::journal::{
    MeditationRecord, Memorial, MemorialAudience, MemoryStory, MoodEntry, Narration,
    NewMeditation, NewMemorial, NewMemoryStory, NewMoodEntry, NewPlantingEntry, PlantingEntry,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Mood entry request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodRequest {
    /// Mood word or phrase.
    pub mood: String,
    /// Free-form body.
    #[serde(default)]
    pub content: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Meditation record request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeditationRequest {
    /// Session length in minutes.
    #[serde(default)]
    pub minutes: u32,
    /// Session style; defaults to `guided`.
    #[serde(default)]
    pub style: Option<String>,
}

/// Memory story request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    /// Story title.
    pub title: String,
    /// Story body or transcript.
    #[serde(default)]
    pub content: String,
    /// Telling mode; defaults to text.
    #[serde(default)]
    pub narration: Narration,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Contributor names.
    #[serde(default)]
    pub contributors: Vec<String>,
}

/// Memorial request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemorialRequest {
    /// Name of the remembered.
    pub name: String,
    /// Short biography.
    #[serde(default)]
    pub biography: String,
    /// Birth date as free text.
    #[serde(default)]
    pub born: Option<String>,
    /// Date of passing as free text.
    #[serde(default)]
    pub died: Option<String>,
    /// Page visibility; defaults to private.
    #[serde(default)]
    pub audience: MemorialAudience,
    /// Initial flowers count.
    #[serde(default)]
    pub flowers: u64,
}

/// Planting entry request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlantingRequest {
    /// Mood word, if noted.
    #[serde(default)]
    pub mood: Option<String>,
    /// Free-form body.
    pub content: String,
    /// Growth stage label, if noted.
    #[serde(default)]
    pub growth_stage: Option<String>,
}

/// Append a mood entry.
#[utoipa::path(
    post,
    path = "/api/v1/journal/moods",
    request_body = MoodRequest,
    responses(
        (status = 200, description = "Entry appended", body = MoodEntry),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["journal"],
    operation_id = "addMood"
)]
#[post("/journal/moods")]
pub async fn add_mood(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<MoodRequest>,
) -> ApiResult<web::Json<MoodEntry>> {
    let identity = session.require_identity()?;
    let body = payload.into_inner();
    let entry = state.journal.add_mood(
        &identity,
        NewMoodEntry {
            mood: body.mood,
            content: body.content,
            tags: body.tags,
        },
    )?;
    Ok(web::Json(entry))
}

/// The caller's mood entries, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/journal/moods",
    responses(
        (status = 200, description = "Mood entries", body = [MoodEntry]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["journal"],
    operation_id = "listMoods"
)]
#[get("/journal/moods")]
pub async fn list_moods(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MoodEntry>>> {
    let identity = session.require_identity()?;
    Ok(web::Json(state.journal.list_moods(&identity)?))
}

/// Record a meditation session.
#[utoipa::path(
    post,
    path = "/api/v1/journal/meditations",
    request_body = MeditationRequest,
    responses(
        (status = 200, description = "Session recorded", body = MeditationRecord),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["journal"],
    operation_id = "addMeditation"
)]
#[post("/journal/meditations")]
pub async fn add_meditation(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<MeditationRequest>,
) -> ApiResult<web::Json<MeditationRecord>> {
    let identity = session.require_identity()?;
    let body = payload.into_inner();
    let record = state.journal.add_meditation(
        &identity,
        NewMeditation {
            minutes: body.minutes,
            style: body.style,
        },
    )?;
    Ok(web::Json(record))
}

/// Append a memory story.
#[utoipa::path(
    post,
    path = "/api/v1/stories",
    request_body = StoryRequest,
    responses(
        (status = 200, description = "Story appended", body = MemoryStory),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["journal"],
    operation_id = "addStory"
)]
#[post("/stories")]
pub async fn add_story(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StoryRequest>,
) -> ApiResult<web::Json<MemoryStory>> {
    let identity = session.require_identity()?;
    let body = payload.into_inner();
    let story = state.journal.add_story(
        &identity,
        NewMemoryStory {
            title: body.title,
            content: body.content,
            narration: body.narration,
            tags: body.tags,
            contributors: body.contributors,
        },
    )?;
    Ok(web::Json(story))
}

/// The caller's memory stories, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/stories",
    responses(
        (status = 200, description = "Memory stories", body = [MemoryStory]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["journal"],
    operation_id = "listStories"
)]
#[get("/stories")]
pub async fn list_stories(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MemoryStory>>> {
    let identity = session.require_identity()?;
    Ok(web::Json(state.journal.list_stories(&identity)?))
}

/// Create a memorial page.
#[utoipa::path(
    post,
    path = "/api/v1/memorials",
    request_body = MemorialRequest,
    responses(
        (status = 200, description = "Memorial created", body = Memorial),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["journal"],
    operation_id = "addMemorial"
)]
#[post("/memorials")]
pub async fn add_memorial(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<MemorialRequest>,
) -> ApiResult<web::Json<Memorial>> {
    let identity = session.require_identity()?;
    let body = payload.into_inner();
    let memorial = state.journal.add_memorial(
        &identity,
        NewMemorial {
            name: body.name,
            biography: body.biography,
            born: body.born,
            died: body.died,
            audience: body.audience,
            flowers: body.flowers,
        },
    )?;
    Ok(web::Json(memorial))
}

/// The caller's memorial pages, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/memorials",
    responses(
        (status = 200, description = "Memorial pages", body = [Memorial]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["journal"],
    operation_id = "listMemorials"
)]
#[get("/memorials")]
pub async fn list_memorials(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Memorial>>> {
    let identity = session.require_identity()?;
    Ok(web::Json(state.journal.list_memorials(&identity)?))
}

/// Append a planting entry.
#[utoipa::path(
    post,
    path = "/api/v1/plantings",
    request_body = PlantingRequest,
    responses(
        (status = 200, description = "Entry appended", body = PlantingEntry),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["journal"],
    operation_id = "addPlanting"
)]
#[post("/plantings")]
pub async fn add_planting(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PlantingRequest>,
) -> ApiResult<web::Json<PlantingEntry>> {
    let identity = session.require_identity()?;
    let body = payload.into_inner();
    let entry = state.journal.add_planting(
        &identity,
        NewPlantingEntry {
            mood: body.mood,
            content: body.content,
            growth_stage: body.growth_stage,
        },
    )?;
    Ok(web::Json(entry))
}

/// The caller's planting entries, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/plantings",
    responses(
        (status = 200, description = "Planting entries", body = [PlantingEntry]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["journal"],
    operation_id = "listPlantings"
)]
#[get("/plantings")]
pub async fn list_plantings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PlantingEntry>>> {
    let identity = session.require_identity()?;
    Ok(web::Json(state.journal.list_plantings(&identity)?))
}
