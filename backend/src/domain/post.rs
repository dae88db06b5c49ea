//! Shared posts and their visibility rules.
//!
//! A post is immutable after publication apart from its like counter. Public
//! visibility is a pure function of the post, the viewer, and the current
//! instant, so deferred-release posts surface the moment their scheduled
//! time passes without any background job touching them.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::Error;
use super::store::DocumentStore;
use super::user::{Identity, UserId};

/// Display name substituted for anonymous public posts.
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous";

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for PostId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post flavour selected by the author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    /// Free-form mood share.
    #[default]
    Mood,
    /// A coping technique or practical tip.
    Method,
    /// A picture with a short caption.
    Image,
}

/// Stored post record. Only `likes` mutates after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Stable identifier.
    pub id: PostId,
    /// Author id; retained even for anonymous posts.
    pub user_id: UserId,
    /// Author display name captured at publication time.
    pub display_name: String,
    /// Post flavour.
    pub kind: PostKind,
    /// Optional short title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Image reference, if any.
    pub image: Option<String>,
    /// Video reference, if any.
    pub video: Option<String>,
    /// Audio reference, if any.
    pub audio: Option<String>,
    /// Free-form mood tags.
    pub tags: Vec<String>,
    /// Like counter; increments unconditionally.
    pub likes: u64,
    /// Whether the post is shared with everyone.
    pub is_public: bool,
    /// Whether the author's name is hidden on the public feed.
    pub is_anonymous: bool,
    /// Deferred-release instant. While in the future the post is visible
    /// only to its author.
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Publication instant.
    pub timestamp: DateTime<Utc>,
}

impl Post {
    /// Whether the post appears on the public feed at `now`.
    pub fn is_publicly_visible(&self, now: DateTime<Utc>) -> bool {
        self.is_public && self.scheduled_time.is_none_or(|release| release <= now)
    }
}

/// Validation errors raised when building a [`PostDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// Content was empty once trimmed.
    #[error("post content must not be empty")]
    EmptyContent,
}

/// Validated input for publishing a post.
#[derive(Debug, Clone)]
pub struct PostDraft {
    /// Post flavour.
    pub kind: PostKind,
    /// Optional short title.
    pub title: String,
    /// Body text; non-empty.
    pub content: String,
    /// Image reference, if any.
    pub image: Option<String>,
    /// Video reference, if any.
    pub video: Option<String>,
    /// Audio reference, if any.
    pub audio: Option<String>,
    /// Free-form mood tags.
    pub tags: Vec<String>,
    /// Whether the post is shared with everyone.
    pub is_public: bool,
    /// Whether the author's name is hidden on the public feed.
    pub is_anonymous: bool,
    /// Deferred-release instant, if any.
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl PostDraft {
    /// Minimal draft with the given body, defaulting everything else.
    pub fn new(content: impl Into<String>) -> Result<Self, PostValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        Ok(Self {
            kind: PostKind::default(),
            title: String::new(),
            content,
            image: None,
            video: None,
            audio: None,
            tags: Vec::new(),
            is_public: false,
            is_anonymous: false,
            scheduled_time: None,
        })
    }
}

/// Feed selector for [`PostBoard::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// The viewer's own posts, schedule and privacy notwithstanding.
    Mine,
    /// Everyone's released public posts.
    Public,
}

/// Rendered post returned to clients.
///
/// For anonymous posts on the public feed the author id is withheld and the
/// display name replaced with [`ANONYMOUS_DISPLAY_NAME`]; the stored record
/// keeps the true author for the owner's own retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    /// Stable identifier.
    pub id: PostId,
    /// Author id; absent on anonymised views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Display name, possibly the anonymous placeholder.
    pub display_name: String,
    /// Post flavour.
    pub kind: PostKind,
    /// Optional short title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Image reference, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Video reference, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Audio reference, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    /// Free-form mood tags.
    pub tags: Vec<String>,
    /// Like counter.
    pub likes: u64,
    /// Whether the post is shared with everyone.
    pub is_public: bool,
    /// Whether the author's name is hidden on the public feed.
    pub is_anonymous: bool,
    /// Deferred-release instant, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Publication instant.
    pub timestamp: DateTime<Utc>,
}

impl PostView {
    /// Render a post for its owner, always with the true author.
    pub fn for_owner(post: &Post) -> Self {
        Self::render(post, false)
    }

    /// Render a post for the public feed, anonymising when requested.
    pub fn for_public(post: &Post) -> Self {
        Self::render(post, post.is_anonymous)
    }

    fn render(post: &Post, anonymise: bool) -> Self {
        let (user_id, display_name) = if anonymise {
            (None, ANONYMOUS_DISPLAY_NAME.to_owned())
        } else {
            (Some(post.user_id), post.display_name.clone())
        };
        Self {
            id: post.id,
            user_id,
            display_name,
            kind: post.kind,
            title: post.title.clone(),
            content: post.content.clone(),
            image: post.image.clone(),
            video: post.video.clone(),
            audio: post.audio.clone(),
            tags: post.tags.clone(),
            likes: post.likes,
            is_public: post.is_public,
            is_anonymous: post.is_anonymous,
            scheduled_time: post.scheduled_time,
            timestamp: post.timestamp,
        }
    }
}

/// Publishing, listing, and liking of posts.
pub struct PostBoard {
    store: Arc<DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl PostBoard {
    /// Construct a board over the shared store.
    pub fn new(store: Arc<DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Publish a post authored by `author`, stamped with the current instant.
    pub fn publish(&self, author: &Identity, draft: PostDraft) -> Result<PostView, Error> {
        let post = Post {
            id: PostId::random(),
            user_id: author.id,
            display_name: author.username.to_string(),
            kind: draft.kind,
            title: draft.title,
            content: draft.content,
            image: draft.image,
            video: draft.video,
            audio: draft.audio,
            tags: draft.tags,
            likes: 0,
            is_public: draft.is_public,
            is_anonymous: draft.is_anonymous,
            scheduled_time: draft.scheduled_time,
            timestamp: self.clock.utc(),
        };
        let view = PostView::for_owner(&post);
        self.store.transact(move |doc| {
            doc.posts.push(post);
            Ok(())
        })?;
        Ok(view)
    }

    /// List posts for `viewer` under `scope`, newest first.
    ///
    /// Public visibility is re-evaluated against the clock on every call;
    /// nothing is cached, so a deferred post appears exactly when its
    /// release instant passes.
    pub fn list(&self, viewer: &Identity, scope: Scope) -> Result<Vec<PostView>, Error> {
        let now = self.clock.utc();
        self.store.snapshot(|doc| {
            let mut views: Vec<PostView> = match scope {
                Scope::Mine => doc
                    .posts
                    .iter()
                    .filter(|post| post.user_id == viewer.id)
                    .map(PostView::for_owner)
                    .collect(),
                Scope::Public => doc
                    .posts
                    .iter()
                    .filter(|post| post.is_publicly_visible(now))
                    .map(PostView::for_public)
                    .collect(),
            };
            views.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            views
        })
    }

    /// Increment the like counter of `post_id` by exactly one.
    ///
    /// Every call increments; there is deliberately no per-viewer
    /// de-duplication.
    pub fn like(&self, post_id: PostId) -> Result<u64, Error> {
        self.store.transact(|doc| {
            let post = doc
                .post_by_id_mut(post_id)
                .ok_or_else(|| Error::not_found("post not found"))?;
            post.likes = post.likes.saturating_add(1);
            Ok(post.likes)
        })
    }
}
