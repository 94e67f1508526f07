//! StoryRepository trait definition.

use aftergame_types::error::RepositoryError;
use aftergame_types::story::SuccessStory;

pub trait StoryRepository: Send + Sync {
    fn insert(
        &self,
        story: &SuccessStory,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All stories, featured first, then by `career_end_year` DESC.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SuccessStory>, RepositoryError>> + Send;
}
