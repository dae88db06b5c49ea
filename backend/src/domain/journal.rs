//! Append-only journal records: moods, meditation, stories, memorials, and
//! planting notes.
//!
//! Journal records are private to their author, never edited after the
//! append, and feed the growth rollup.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::document::RecordId;
use super::error::Error;
use super::store::DocumentStore;
use super::user::{Identity, UserId};

/// Default meditation style when the caller does not name one.
pub const DEFAULT_MEDITATION_STYLE: &str = "guided";

/// A mood journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    /// Stable identifier.
    pub id: RecordId,
    /// Author.
    pub user_id: UserId,
    /// Mood word or phrase.
    pub mood: String,
    /// Free-form body.
    pub content: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Append instant.
    pub timestamp: DateTime<Utc>,
}

/// A completed meditation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeditationRecord {
    /// Stable identifier.
    pub id: RecordId,
    /// Author.
    pub user_id: UserId,
    /// Session length in minutes.
    pub minutes: u32,
    /// Session style, e.g. `guided`.
    pub style: String,
    /// Append instant.
    pub timestamp: DateTime<Utc>,
}

/// How a memory story is told.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Narration {
    /// Written story.
    #[default]
    Text,
    /// Recorded voice note.
    Voice,
}

/// A longer-form remembrance story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStory {
    /// Stable identifier.
    pub id: RecordId,
    /// Author.
    pub user_id: UserId,
    /// Story title.
    pub title: String,
    /// Story body or transcript.
    pub content: String,
    /// Telling mode.
    pub narration: Narration,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Names of people who contributed to the story.
    pub contributors: Vec<String>,
    /// Append instant.
    pub timestamp: DateTime<Utc>,
}

/// Who can see a memorial page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MemorialAudience {
    /// Listed for everyone.
    Public,
    /// Visible to the author only.
    #[default]
    Private,
}

/// A memorial page for a remembered person or companion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Memorial {
    /// Stable identifier.
    pub id: RecordId,
    /// Author.
    pub user_id: UserId,
    /// Name of the remembered.
    pub name: String,
    /// Short biography.
    pub biography: String,
    /// Birth date as supplied by the author.
    pub born: Option<String>,
    /// Date of passing as supplied by the author.
    pub died: Option<String>,
    /// Visibility of the page.
    pub audience: MemorialAudience,
    /// Flowers laid on the page.
    pub flowers: u64,
    /// Append instant.
    pub timestamp: DateTime<Utc>,
}

/// A planting journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlantingEntry {
    /// Stable identifier.
    pub id: RecordId,
    /// Author.
    pub user_id: UserId,
    /// Mood word, if noted.
    pub mood: Option<String>,
    /// Free-form body.
    pub content: String,
    /// Growth stage label, if noted.
    pub growth_stage: Option<String>,
    /// Append instant.
    pub timestamp: DateTime<Utc>,
}

/// Input for [`Journal::add_mood`].
#[derive(Debug, Clone)]
pub struct NewMoodEntry {
    /// Mood word or phrase; non-empty.
    pub mood: String,
    /// Free-form body.
    pub content: String,
    /// Free-form tags.
    pub tags: Vec<String>,
}

/// Input for [`Journal::add_meditation`].
#[derive(Debug, Clone)]
pub struct NewMeditation {
    /// Session length in minutes.
    pub minutes: u32,
    /// Session style; defaults to [`DEFAULT_MEDITATION_STYLE`].
    pub style: Option<String>,
}

/// Input for [`Journal::add_story`].
#[derive(Debug, Clone)]
pub struct NewMemoryStory {
    /// Story title; non-empty.
    pub title: String,
    /// Story body or transcript.
    pub content: String,
    /// Telling mode.
    pub narration: Narration,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Contributor names.
    pub contributors: Vec<String>,
}

/// Input for [`Journal::add_memorial`].
#[derive(Debug, Clone)]
pub struct NewMemorial {
    /// Name of the remembered; non-empty.
    pub name: String,
    /// Short biography.
    pub biography: String,
    /// Birth date as supplied by the author.
    pub born: Option<String>,
    /// Date of passing as supplied by the author.
    pub died: Option<String>,
    /// Visibility of the page.
    pub audience: MemorialAudience,
    /// Initial flowers count.
    pub flowers: u64,
}

/// Input for [`Journal::add_planting`].
#[derive(Debug, Clone)]
pub struct NewPlantingEntry {
    /// Mood word, if noted.
    pub mood: Option<String>,
    /// Free-form body; non-empty.
    pub content: String,
    /// Growth stage label, if noted.
    pub growth_stage: Option<String>,
}

/// Append and list operations over the journal collections.
pub struct Journal {
    store: Arc<DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl Journal {
    /// Construct a journal over the shared store.
    pub fn new(store: Arc<DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Append a mood entry for `owner`.
    pub fn add_mood(&self, owner: &Identity, input: NewMoodEntry) -> Result<MoodEntry, Error> {
        if input.mood.trim().is_empty() {
            return Err(Error::invalid_request("mood must not be empty"));
        }
        let entry = MoodEntry {
            id: RecordId::random(),
            user_id: owner.id,
            mood: input.mood,
            content: input.content,
            tags: input.tags,
            timestamp: self.clock.utc(),
        };
        let stored = entry.clone();
        self.store.transact(move |doc| {
            doc.mood_entries.push(stored);
            Ok(())
        })?;
        Ok(entry)
    }

    /// The owner's mood entries, newest first.
    pub fn list_moods(&self, owner: &Identity) -> Result<Vec<MoodEntry>, Error> {
        let owner_id = owner.id;
        self.store.snapshot(move |doc| {
            newest_first(doc.mood_entries.iter().filter(|e| e.user_id == owner_id), |e| {
                e.timestamp
            })
        })
    }

    /// Append a meditation record for `owner`.
    pub fn add_meditation(
        &self,
        owner: &Identity,
        input: NewMeditation,
    ) -> Result<MeditationRecord, Error> {
        let record = MeditationRecord {
            id: RecordId::random(),
            user_id: owner.id,
            minutes: input.minutes,
            style: input
                .style
                .unwrap_or_else(|| DEFAULT_MEDITATION_STYLE.to_owned()),
            timestamp: self.clock.utc(),
        };
        let stored = record.clone();
        self.store.transact(move |doc| {
            doc.meditation_records.push(stored);
            Ok(())
        })?;
        Ok(record)
    }

    /// Append a memory story for `owner`.
    pub fn add_story(&self, owner: &Identity, input: NewMemoryStory) -> Result<MemoryStory, Error> {
        if input.title.trim().is_empty() {
            return Err(Error::invalid_request("story title must not be empty"));
        }
        let story = MemoryStory {
            id: RecordId::random(),
            user_id: owner.id,
            title: input.title,
            content: input.content,
            narration: input.narration,
            tags: input.tags,
            contributors: input.contributors,
            timestamp: self.clock.utc(),
        };
        let stored = story.clone();
        self.store.transact(move |doc| {
            doc.memory_stories.push(stored);
            Ok(())
        })?;
        Ok(story)
    }

    /// The owner's memory stories, newest first.
    pub fn list_stories(&self, owner: &Identity) -> Result<Vec<MemoryStory>, Error> {
        let owner_id = owner.id;
        self.store.snapshot(move |doc| {
            newest_first(
                doc.memory_stories.iter().filter(|s| s.user_id == owner_id),
                |s| s.timestamp,
            )
        })
    }

    /// Append a memorial page for `owner`.
    pub fn add_memorial(&self, owner: &Identity, input: NewMemorial) -> Result<Memorial, Error> {
        if input.name.trim().is_empty() {
            return Err(Error::invalid_request("memorial name must not be empty"));
        }
        let memorial = Memorial {
            id: RecordId::random(),
            user_id: owner.id,
            name: input.name,
            biography: input.biography,
            born: input.born,
            died: input.died,
            audience: input.audience,
            flowers: input.flowers,
            timestamp: self.clock.utc(),
        };
        let stored = memorial.clone();
        self.store.transact(move |doc| {
            doc.memorials.push(stored);
            Ok(())
        })?;
        Ok(memorial)
    }

    /// The owner's memorial pages, newest first.
    pub fn list_memorials(&self, owner: &Identity) -> Result<Vec<Memorial>, Error> {
        let owner_id = owner.id;
        self.store.snapshot(move |doc| {
            newest_first(doc.memorials.iter().filter(|m| m.user_id == owner_id), |m| {
                m.timestamp
            })
        })
    }

    /// Append a planting entry for `owner`.
    pub fn add_planting(
        &self,
        owner: &Identity,
        input: NewPlantingEntry,
    ) -> Result<PlantingEntry, Error> {
        if input.content.trim().is_empty() {
            return Err(Error::invalid_request("entry content must not be empty"));
        }
        let entry = PlantingEntry {
            id: RecordId::random(),
            user_id: owner.id,
            mood: input.mood,
            content: input.content,
            growth_stage: input.growth_stage,
            timestamp: self.clock.utc(),
        };
        let stored = entry.clone();
        self.store.transact(move |doc| {
            doc.planting_entries.push(stored);
            Ok(())
        })?;
        Ok(entry)
    }

    /// The owner's planting entries, newest first.
    pub fn list_plantings(&self, owner: &Identity) -> Result<Vec<PlantingEntry>, Error> {
        let owner_id = owner.id;
        self.store.snapshot(move |doc| {
            newest_first(
                doc.planting_entries.iter().filter(|e| e.user_id == owner_id),
                |e| e.timestamp,
            )
        })
    }
}

fn newest_first<'a, T, I>(records: I, timestamp: impl Fn(&T) -> DateTime<Utc>) -> Vec<T>
where
    T: Clone + 'a,
    I: Iterator<Item = &'a T>,
{
    let mut out: Vec<T> = records.cloned().collect();
    out.sort_by(|a, b| timestamp(b).cmp(&timestamp(a)));
    out
}
