//! In-memory fakes of the storage and credential ports for unit tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use aftergame_types::career::CareerExploration;
use aftergame_types::conversation::ConversationRecord;
use aftergame_types::error::{AccountError, RepositoryError};
use aftergame_types::identity::{AccessToken, User, UserId};
use aftergame_types::journal::JournalEntry;
use aftergame_types::profile::Profile;
use aftergame_types::story::SuccessStory;

use crate::repository::account::{AccountRepository, StoredCredentials};
use crate::repository::career::CareerRepository;
use crate::repository::conversation::ConversationRepository;
use crate::repository::journal::JournalRepository;
use crate::repository::profile::ProfileRepository;
use crate::repository::story::StoryRepository;
use crate::service::credential::{PasswordHasher, TokenIssuer};

#[derive(Default)]
struct Tables {
    users: Vec<(User, String)>,
    tokens: Vec<AccessToken>,
    conversations: Vec<ConversationRecord>,
    profiles: Vec<Profile>,
    journal: Vec<JournalEntry>,
    explorations: Vec<CareerExploration>,
    stories: Vec<SuccessStory>,
}

/// Shared in-memory tables. Clones see the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut guard = self.tables.lock().unwrap();
        f(&mut guard)
    }
}

impl AccountRepository for InMemoryStore {
    async fn create_user(&self, user: &User, password_hash: &str) -> Result<(), RepositoryError> {
        self.with(|t| {
            if t.users.iter().any(|(u, _)| u.email == user.email) {
                return Err(RepositoryError::Conflict(user.email.clone()));
            }
            t.users.push((user.clone(), password_hash.to_string()));
            Ok(())
        })
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.with(|t| t.users.iter().find(|(u, _)| &u.id == id).map(|(u, _)| u.clone())))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredCredentials>, RepositoryError> {
        Ok(self.with(|t| {
            t.users
                .iter()
                .find(|(u, _)| u.email == email)
                .map(|(u, h)| StoredCredentials {
                    user: u.clone(),
                    password_hash: h.clone(),
                })
        }))
    }

    async fn store_token(&self, token: &AccessToken) -> Result<(), RepositoryError> {
        self.with(|t| t.tokens.push(token.clone()));
        Ok(())
    }

    async fn find_token_owner(&self, token_hash: &str) -> Result<Option<UserId>, RepositoryError> {
        Ok(self.with(|t| {
            t.tokens
                .iter()
                .find(|tok| tok.token_hash == token_hash)
                .map(|tok| tok.user_id.clone())
        }))
    }

    async fn touch_token(&self, token_hash: &str, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        self.with(|t| {
            if let Some(tok) = t.tokens.iter_mut().find(|tok| tok.token_hash == token_hash) {
                tok.last_used_at = Some(at);
            }
        });
        Ok(())
    }

    async fn revoke_token(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        Ok(self.with(|t| {
            let before = t.tokens.len();
            t.tokens.retain(|tok| tok.token_hash != token_hash);
            t.tokens.len() != before
        }))
    }
}

impl ConversationRepository for InMemoryStore {
    async fn save(&self, record: &ConversationRecord) -> Result<(), RepositoryError> {
        self.with(|t| t.conversations.push(record.clone()));
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: Option<i64>,
    ) -> Result<Vec<ConversationRecord>, RepositoryError> {
        Ok(self.with(|t| {
            let mut rows: Vec<_> = t
                .conversations
                .iter()
                .filter(|c| &c.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
            if let Some(limit) = limit {
                rows.truncate(limit.max(0) as usize);
            }
            rows
        }))
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, RepositoryError> {
        Ok(self.with(|t| t.conversations.iter().filter(|c| &c.user_id == user_id).count() as u64))
    }
}

impl ProfileRepository for InMemoryStore {
    async fn create(&self, profile: &Profile) -> Result<(), RepositoryError> {
        self.with(|t| {
            if t.profiles.iter().any(|p| p.id == profile.id) {
                return Err(RepositoryError::Conflict("profile already exists".to_string()));
            }
            t.profiles.push(profile.clone());
            Ok(())
        })
    }

    async fn get(&self, user_id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.with(|t| t.profiles.iter().find(|p| &p.id == user_id).cloned()))
    }

    async fn update(&self, profile: &Profile) -> Result<(), RepositoryError> {
        self.with(|t| match t.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => {
                *existing = profile.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        })
    }
}

impl JournalRepository for InMemoryStore {
    async fn create(&self, entry: &JournalEntry) -> Result<(), RepositoryError> {
        self.with(|t| t.journal.push(entry.clone()));
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<JournalEntry>, RepositoryError> {
        Ok(self.with(|t| {
            let mut rows: Vec<_> = t
                .journal
                .iter()
                .filter(|e| &e.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| (b.entry_date, b.created_at).cmp(&(a.entry_date, a.created_at)));
            rows
        }))
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, RepositoryError> {
        Ok(self.with(|t| t.journal.iter().filter(|e| &e.user_id == user_id).count() as u64))
    }
}

impl CareerRepository for InMemoryStore {
    async fn save(&self, exploration: &CareerExploration) -> Result<(), RepositoryError> {
        self.with(|t| t.explorations.push(exploration.clone()));
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<CareerExploration>, RepositoryError> {
        Ok(self.with(|t| {
            let mut rows: Vec<_> = t
                .explorations
                .iter()
                .filter(|e| &e.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
            rows
        }))
    }
}

impl StoryRepository for InMemoryStore {
    async fn insert(&self, story: &SuccessStory) -> Result<(), RepositoryError> {
        self.with(|t| t.stories.push(story.clone()));
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SuccessStory>, RepositoryError> {
        Ok(self.with(|t| {
            let mut rows = t.stories.clone();
            rows.sort_by(|a, b| {
                (b.is_featured, b.career_end_year).cmp(&(a.is_featured, a.career_end_year))
            });
            rows
        }))
    }
}

/// Reversible "hash" so tests can reason about stored values.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash_password(&self, password: &str) -> Result<String, AccountError> {
        Ok(format!("plain${password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain$") == Some(password)
    }
}

/// Deterministic token source.
#[derive(Default)]
pub struct SequentialTokens {
    next: AtomicU64,
}

impl TokenIssuer for SequentialTokens {
    fn generate(&self) -> String {
        format!("ag_test{}", self.next.fetch_add(1, Ordering::SeqCst))
    }

    fn digest(&self, token: &str) -> String {
        format!("digest:{token}")
    }
}
