//! Journal entries and mood trends.

use chrono::Utc;
use uuid::Uuid;

use aftergame_types::error::{ServiceError, ValidationError};
use aftergame_types::event::{ChangeEvent, ChangeTable};
use aftergame_types::identity::RequestContext;
use aftergame_types::journal::{
    JournalEntry, MAX_MOOD, MIN_MOOD, MOOD_TREND_WINDOW, MoodPoint, MoodTrend, NewJournalEntry,
};

use crate::event::ChangeFeed;
use crate::repository::journal::JournalRepository;
use crate::service::required;

pub struct JournalService<R: JournalRepository> {
    repo: R,
    feed: ChangeFeed,
}

impl<R: JournalRepository> JournalService<R> {
    pub fn new(repo: R, feed: ChangeFeed) -> Self {
        Self { repo, feed }
    }

    pub async fn create_entry(
        &self,
        ctx: &RequestContext,
        input: NewJournalEntry,
    ) -> Result<JournalEntry, ServiceError> {
        if !(MIN_MOOD..=MAX_MOOD).contains(&input.mood_rating) {
            return Err(ValidationError::new(
                "mood_rating",
                format!("must be between {MIN_MOOD} and {MAX_MOOD}"),
            )
            .into());
        }

        let entry = JournalEntry {
            id: Uuid::now_v7(),
            user_id: ctx.user_id.clone(),
            entry_date: input.entry_date.unwrap_or_else(|| Utc::now().date_naive()),
            mood_rating: input.mood_rating,
            gratitude_1: required("gratitude_1", &input.gratitude_1)?,
            gratitude_2: required("gratitude_2", &input.gratitude_2)?,
            gratitude_3: required("gratitude_3", &input.gratitude_3)?,
            challenge_faced: required("challenge_faced", &input.challenge_faced)?,
            small_win: required("small_win", &input.small_win)?,
            tomorrow_goal: required("tomorrow_goal", &input.tomorrow_goal)?,
            private_notes: input
                .private_notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_at: Utc::now(),
        };

        self.repo.create(&entry).await?;
        tracing::debug!(user_id = %ctx.user_id, entry_id = %entry.id, "journal entry created");
        self.feed.publish(ChangeEvent::insert(
            ChangeTable::JournalEntries,
            ctx.user_id.clone(),
            entry.id,
        ));
        Ok(entry)
    }

    /// The caller's entries, newest `entry_date` first.
    pub async fn list_entries(&self, ctx: &RequestContext) -> Result<Vec<JournalEntry>, ServiceError> {
        Ok(self.repo.list_for_user(&ctx.user_id).await?)
    }

    pub async fn trend(&self, ctx: &RequestContext) -> Result<MoodTrend, ServiceError> {
        let entries = self.repo.list_for_user(&ctx.user_id).await?;
        Ok(MoodTrend {
            points: mood_trend(&entries),
            average_mood: average_mood(&entries),
            entry_count: entries.len(),
        })
    }
}

/// Chart points for the newest [`MOOD_TREND_WINDOW`] entries, oldest first.
///
/// `entries` must be ordered newest first, as returned by the repository.
pub fn mood_trend(entries: &[JournalEntry]) -> Vec<MoodPoint> {
    entries
        .iter()
        .take(MOOD_TREND_WINDOW)
        .rev()
        .map(|e| MoodPoint {
            date: e.entry_date,
            label: e.entry_date.format("%b %d").to_string(),
            mood: e.mood_rating,
        })
        .collect()
}

/// Mean mood rounded to one decimal; `0.0` without entries.
pub fn average_mood(entries: &[JournalEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let total: u64 = entries.iter().map(|e| u64::from(e.mood_rating)).sum();
    round_one_decimal(total as f64 / entries.len() as f64)
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use aftergame_types::identity::UserId;
    use chrono::NaiveDate;

    use crate::test_support::InMemoryStore;

    fn input(date: NaiveDate, mood: u8) -> NewJournalEntry {
        NewJournalEntry {
            entry_date: Some(date),
            mood_rating: mood,
            gratitude_1: "family".to_string(),
            gratitude_2: "sunshine".to_string(),
            gratitude_3: "coffee".to_string(),
            challenge_faced: "watched my old team play".to_string(),
            small_win: "went for a run".to_string(),
            tomorrow_goal: "call my mentor".to_string(),
            private_notes: Some("   ".to_string()),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn service() -> JournalService<InMemoryStore> {
        JournalService::new(InMemoryStore::default(), ChangeFeed::new(8))
    }

    #[tokio::test]
    async fn create_entry_stores_blank_notes_as_none() {
        let svc = service();
        let ctx = RequestContext::new(UserId::new());
        let entry = svc.create_entry(&ctx, input(day(1), 6)).await.unwrap();
        assert_eq!(entry.private_notes, None);
        assert_eq!(svc.list_entries(&ctx).await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn create_entry_validates_mood_and_required_fields() {
        let svc = service();
        let ctx = RequestContext::new(UserId::new());

        let err = svc.create_entry(&ctx, input(day(1), 11)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref v) if v.field == "mood_rating"));
        let err = svc.create_entry(&ctx, input(day(1), 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let mut missing = input(day(1), 5);
        missing.small_win = String::new();
        let err = svc.create_entry(&ctx, missing).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref v) if v.field == "small_win"));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_trend_is_oldest_first() {
        let svc = service();
        let ctx = RequestContext::new(UserId::new());
        svc.create_entry(&ctx, input(day(2), 4)).await.unwrap();
        svc.create_entry(&ctx, input(day(7), 8)).await.unwrap();
        svc.create_entry(&ctx, input(day(5), 5)).await.unwrap();

        let dates: Vec<_> = svc
            .list_entries(&ctx)
            .await
            .unwrap()
            .iter()
            .map(|e| e.entry_date)
            .collect();
        assert_eq!(dates, vec![day(7), day(5), day(2)]);

        let trend = svc.trend(&ctx).await.unwrap();
        let labels: Vec<_> = trend.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Mar 02", "Mar 05", "Mar 07"]);
        assert_eq!(trend.average_mood, 5.7);
        assert_eq!(trend.entry_count, 3);
    }

    #[test]
    fn trend_keeps_only_the_newest_thirty() {
        let user = UserId::new();
        let entries: Vec<JournalEntry> = (0..40u32)
            .rev()
            .map(|i| JournalEntry {
                id: Uuid::now_v7(),
                user_id: user.clone(),
                entry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(u64::from(i)),
                mood_rating: 5,
                gratitude_1: String::new(),
                gratitude_2: String::new(),
                gratitude_3: String::new(),
                challenge_faced: String::new(),
                small_win: String::new(),
                tomorrow_goal: String::new(),
                private_notes: None,
                created_at: Utc::now(),
            })
            .collect();

        let points = mood_trend(&entries);
        assert_eq!(points.len(), 30);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2025, 1, 11).unwrap());
        assert_eq!(points[29].date, NaiveDate::from_ymd_opt(2025, 2, 9).unwrap());
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average_mood(&[]), 0.0);
    }
}
