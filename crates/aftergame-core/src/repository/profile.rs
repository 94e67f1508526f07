//! ProfileRepository trait definition.

use aftergame_types::error::RepositoryError;
use aftergame_types::identity::UserId;
use aftergame_types::profile::Profile;

pub trait ProfileRepository: Send + Sync {
    /// Insert the profile. A second profile for the same user is a `Conflict`.
    fn create(
        &self,
        profile: &Profile,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<Profile>, RepositoryError>> + Send;

    /// Overwrite the editable fields. Missing rows yield `NotFound`.
    fn update(
        &self,
        profile: &Profile,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
