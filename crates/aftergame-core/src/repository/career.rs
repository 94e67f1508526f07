//! CareerRepository trait definition.

use aftergame_types::career::CareerExploration;
use aftergame_types::error::RepositoryError;
use aftergame_types::identity::UserId;

pub trait CareerRepository: Send + Sync {
    fn save(
        &self,
        exploration: &CareerExploration,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Explorations of one user, newest first.
    fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<CareerExploration>, RepositoryError>> + Send;
}
