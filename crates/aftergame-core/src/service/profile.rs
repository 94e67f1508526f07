//! Profile onboarding.

use chrono::{NaiveDate, Utc};

use aftergame_types::error::{ServiceError, ValidationError};
use aftergame_types::event::{ChangeEvent, ChangeTable};
use aftergame_types::identity::RequestContext;
use aftergame_types::profile::{NewProfile, Profile, ProfileUpdate};

use crate::event::ChangeFeed;
use crate::repository::profile::ProfileRepository;
use crate::service::required;

pub struct ProfileService<R: ProfileRepository> {
    repo: R,
    feed: ChangeFeed,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repo: R, feed: ChangeFeed) -> Self {
        Self { repo, feed }
    }

    /// Create the caller's profile. A second call yields `Conflict`.
    pub async fn create_profile(
        &self,
        ctx: &RequestContext,
        email: &str,
        input: NewProfile,
    ) -> Result<Profile, ServiceError> {
        let profile = Profile {
            id: ctx.user_id.clone(),
            email: email.to_string(),
            full_name: required("full_name", &input.full_name)?,
            former_sport: required("former_sport", &input.former_sport)?,
            career_end_reason: required("career_end_reason", &input.career_end_reason)?,
            career_end_date: check_end_date(input.career_end_date)?,
            created_at: Utc::now(),
        };

        self.repo.create(&profile).await?;
        tracing::info!(user_id = %ctx.user_id, "profile created");
        self.feed.publish(ChangeEvent::insert(
            ChangeTable::Profiles,
            ctx.user_id.clone(),
            ctx.user_id.0,
        ));
        Ok(profile)
    }

    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<Option<Profile>, ServiceError> {
        Ok(self.repo.get(&ctx.user_id).await?)
    }

    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        update: ProfileUpdate,
    ) -> Result<Profile, ServiceError> {
        let mut profile = self
            .repo
            .get(&ctx.user_id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        profile.apply(update);

        profile.full_name = required("full_name", &profile.full_name)?;
        profile.former_sport = required("former_sport", &profile.former_sport)?;
        profile.career_end_reason = required("career_end_reason", &profile.career_end_reason)?;
        check_end_date(profile.career_end_date)?;

        self.repo.update(&profile).await?;
        self.feed.publish(ChangeEvent::update(
            ChangeTable::Profiles,
            ctx.user_id.clone(),
            ctx.user_id.0,
        ));
        Ok(profile)
    }
}

fn check_end_date(date: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if date > Utc::now().date_naive() {
        return Err(ValidationError::new(
            "career_end_date",
            "cannot be in the future",
        ));
    }
    Ok(date)
}
