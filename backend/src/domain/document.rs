//! The persisted document: one tree of named record collections.
//!
//! Every piece of application state lives here. Collections deserialise
//! with [`serde(default)`] so a document written by an older build gains
//! missing collections as empty vectors on load; present data is never
//! overwritten by defaults.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::journal::{MeditationRecord, Memorial, MemoryStory, MoodEntry, PlantingEntry};
use super::post::{Post, PostId, PostKind};
use super::user::{InviteCode, User, UserId, Username};

/// Identifier for append-only journal and graph records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for RecordId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registration-time link between an inviter and the account they invited.
///
/// At most one invitation exists per invitee; it is written in the same
/// transaction that inserts the invitee and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    /// Owner of the invite code that was redeemed.
    pub inviter_id: UserId,
    /// The account created with that code.
    pub invitee_id: UserId,
    /// Registration instant.
    pub timestamp: DateTime<Utc>,
}

/// One user boosting another through their invite code.
///
/// Unique on `(helper_id, target_id)`; a helper never assists themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assist {
    /// Stable identifier.
    pub id: RecordId,
    /// The user who redeemed someone else's code.
    pub helper_id: UserId,
    /// The owner of the redeemed code.
    pub target_id: UserId,
    /// Redemption instant.
    pub timestamp: DateTime<Utc>,
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    /// Registered accounts.
    pub users: Vec<User>,
    /// Registration-time invite links.
    pub invitations: Vec<Invitation>,
    /// Invite-code boosts between users.
    pub assists: Vec<Assist>,
    /// Shared posts of every kind.
    pub posts: Vec<Post>,
    /// Mood journal entries.
    pub mood_entries: Vec<MoodEntry>,
    /// Meditation session records.
    pub meditation_records: Vec<MeditationRecord>,
    /// Longer-form remembrance stories.
    pub memory_stories: Vec<MemoryStory>,
    /// Memorial pages.
    pub memorials: Vec<Memorial>,
    /// Planting journal entries.
    pub planting_entries: Vec<PlantingEntry>,
}

impl Document {
    /// Fresh document carrying the sample public posts shown to a brand-new
    /// installation. Runs once: subsequent loads read the persisted file and
    /// never re-seed.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            posts: seed_posts(now),
            ..Self::default()
        }
    }

    /// Look up a user by id.
    pub fn user_by_id(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Look up a user by id for mutation.
    pub fn user_by_id_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|user| user.id == id)
    }

    /// Look up a user by username.
    pub fn user_by_username(&self, username: &Username) -> Option<&User> {
        self.users.iter().find(|user| &user.username == username)
    }

    /// Look up a user by their invite code.
    pub fn user_by_invite_code(&self, code: &InviteCode) -> Option<&User> {
        self.users.iter().find(|user| &user.invite_code == code)
    }

    /// Look up a post by id for mutation.
    pub fn post_by_id_mut(&mut self, id: PostId) -> Option<&mut Post> {
        self.posts.iter_mut().find(|post| post.id == id)
    }
}

/// Fixed author id attached to the seeded sample posts.
fn seed_author() -> UserId {
    UserId::from(Uuid::from_u128(0x5eed))
}

fn seed_post(
    serial: u128,
    display_name: &str,
    kind: PostKind,
    title: &str,
    content: &str,
    likes: u64,
    tags: &[&str],
    is_anonymous: bool,
    timestamp: DateTime<Utc>,
) -> Post {
    Post {
        id: PostId::from(Uuid::from_u128(serial)),
        user_id: seed_author(),
        display_name: display_name.to_owned(),
        kind,
        title: title.to_owned(),
        content: content.to_owned(),
        image: None,
        video: None,
        audio: None,
        tags: tags.iter().map(|&tag| tag.to_owned()).collect(),
        likes,
        is_public: true,
        is_anonymous,
        scheduled_time: None,
        timestamp,
    }
}

fn seed_posts(now: DateTime<Utc>) -> Vec<Post> {
    vec![
        seed_post(
            1,
            "Grove keeper",
            PostKind::Image,
            "Tonight's sunset was lovely",
            "Look up at the sky once in a while; it keeps handing out small, \
             unexpected kindnesses.",
            128,
            &["moved", "healing"],
            false,
            now,
        ),
        seed_post(
            2,
            "A quiet traveller",
            PostKind::Mood,
            "Finally let it go",
            "The thing I had been turning over for weeks finally made sense \
             today. Letting myself off the hook was the real relief.",
            45,
            &["relief"],
            true,
            now - TimeDelta::days(1),
        ),
        seed_post(
            3,
            "Counsellor",
            PostKind::Method,
            "Three-minute breathing",
            "When anxiety rises, close your eyes: in for four seconds, hold \
             for seven, out for eight. Three rounds is usually enough to \
             feel the ground again.",
            342,
            &["calm", "practice"],
            false,
            now - TimeDelta::days(2),
        ),
        seed_post(
            4,
            "Street observer",
            PostKind::Image,
            "A flower by the road",
            "Even in the corner by the wall it insists on blooming. That \
             kind of stubbornness is worth borrowing.",
            89,
            &["hope"],
            false,
            now - TimeDelta::minutes(3),
        ),
    ]
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn seeded_documents_carry_only_public_posts() {
        let doc = Document::seeded(Utc::now());
        assert_eq!(doc.posts.len(), 4);
        assert!(doc.posts.iter().all(|post| post.is_public));
        assert!(doc.users.is_empty());
        assert!(doc.assists.is_empty());
    }

    #[rstest]
    fn seeding_is_deterministic() {
        let now = Utc::now();
        assert_eq!(Document::seeded(now), Document::seeded(now));
    }

    #[rstest]
    fn missing_collections_deserialise_empty() {
        let doc: Document = serde_json::from_str(r#"{"users": []}"#).expect("parse");
        assert!(doc.posts.is_empty());
        assert!(doc.mood_entries.is_empty());
        assert!(doc.planting_entries.is_empty());
    }

    #[rstest]
    fn unknown_collections_are_ignored_on_load() {
        // Unknown top-level keys are dropped on load rather than erroring,
        // matching a document written by a newer build.
        let doc: Document =
            serde_json::from_str(r#"{"users": [], "futureCollection": [1, 2]}"#).expect("parse");
        assert!(doc.users.is_empty());
    }
}
