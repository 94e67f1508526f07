//! ConversationRepository trait definition.

use aftergame_types::conversation::ConversationRecord;
use aftergame_types::error::RepositoryError;
use aftergame_types::identity::UserId;

/// Append-only storage of completed chat turns.
pub trait ConversationRepository: Send + Sync {
    fn save(
        &self,
        record: &ConversationRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Records of one user, newest first.
    fn list_for_user(
        &self,
        user_id: &UserId,
        limit: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationRecord>, RepositoryError>> + Send;

    fn count_for_user(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
