//! Success-story library.

use aftergame_types::error::{ServiceError, ValidationError};
use aftergame_types::story::{NewSuccessStory, SuccessStory};

use crate::repository::story::StoryRepository;
use crate::service::required;

pub struct StoryService<R: StoryRepository> {
    repo: R,
}

impl<R: StoryRepository> StoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Featured stories first, then the most recent career endings.
    pub async fn list(&self) -> Result<Vec<SuccessStory>, ServiceError> {
        Ok(self.repo.list().await?)
    }

    /// Validate and insert a batch. Nothing is inserted if any item is invalid.
    pub async fn import(&self, stories: Vec<NewSuccessStory>) -> Result<usize, ServiceError> {
        let mut validated = Vec::with_capacity(stories.len());
        for (idx, story) in stories.into_iter().enumerate() {
            validated.push(validate(story).map_err(|e| {
                ValidationError::new(format!("stories[{idx}].{}", e.field), e.reason)
            })?);
        }

        for story in &validated {
            self.repo.insert(story).await?;
        }
        tracing::info!(count = validated.len(), "success stories imported");
        Ok(validated.len())
    }
}

fn validate(story: NewSuccessStory) -> Result<SuccessStory, ValidationError> {
    if !(1900..=2100).contains(&story.career_end_year) {
        return Err(ValidationError::new("career_end_year", "is out of range"));
    }
    Ok(SuccessStory::from(NewSuccessStory {
        athlete_name: required("athlete_name", &story.athlete_name)?,
        former_sport: required("former_sport", &story.former_sport)?,
        career_end_year: story.career_end_year,
        new_career_path: required("new_career_path", &story.new_career_path)?,
        story_summary: required("story_summary", &story.story_summary)?,
        key_lesson: required("key_lesson", &story.key_lesson)?,
        is_featured: story.is_featured,
    }))
}
