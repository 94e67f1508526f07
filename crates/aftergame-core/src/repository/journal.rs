//! JournalRepository trait definition.

use aftergame_types::error::RepositoryError;
use aftergame_types::identity::UserId;
use aftergame_types::journal::JournalEntry;

pub trait JournalRepository: Send + Sync {
    fn create(
        &self,
        entry: &JournalEntry,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Entries of one user ordered by `entry_date` DESC, then `created_at` DESC.
    fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<JournalEntry>, RepositoryError>> + Send;

    fn count_for_user(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
