//! Recording and listing completed chat turns.

use aftergame_types::conversation::{ConversationRecord, NewConversation};
use aftergame_types::error::{ServiceError, ValidationError};
use aftergame_types::event::{ChangeEvent, ChangeTable};
use aftergame_types::identity::RequestContext;

use crate::event::ChangeFeed;
use crate::repository::conversation::ConversationRepository;
use crate::sentiment;

pub struct ConversationService<R: ConversationRepository> {
    repo: R,
    feed: ChangeFeed,
}

impl<R: ConversationRepository> ConversationService<R> {
    pub fn new(repo: R, feed: ChangeFeed) -> Self {
        Self { repo, feed }
    }

    /// Store one completed turn for the caller.
    ///
    /// The stored score is always recomputed from `message`; a submitted
    /// score only shows up in the logs when it disagrees.
    pub async fn record(
        &self,
        ctx: &RequestContext,
        turn: NewConversation,
    ) -> Result<ConversationRecord, ServiceError> {
        if turn.message.trim().is_empty() {
            return Err(ValidationError::new("message", "is required").into());
        }
        if turn.response.trim().is_empty() {
            return Err(ValidationError::new("response", "is required").into());
        }

        let derived = sentiment::score(&turn.message);
        if (turn.sentiment_score - derived).abs() > f64::EPSILON {
            tracing::debug!(
                user_id = %ctx.user_id,
                submitted = turn.sentiment_score,
                derived,
                "replacing submitted sentiment score"
            );
        }
        let turn = NewConversation {
            sentiment_score: derived,
            ..turn
        };

        let record = ConversationRecord::new(ctx.user_id.clone(), turn);
        self.repo.save(&record).await?;

        tracing::debug!(
            user_id = %ctx.user_id,
            conversation_id = %record.id,
            sentiment_score = record.sentiment_score,
            "conversation turn recorded"
        );
        self.feed.publish(ChangeEvent::insert(
            ChangeTable::Conversations,
            ctx.user_id.clone(),
            record.id,
        ));
        Ok(record)
    }

    /// The caller's turns, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        limit: Option<i64>,
    ) -> Result<Vec<ConversationRecord>, ServiceError> {
        Ok(self.repo.list_for_user(&ctx.user_id, limit).await?)
    }

    pub async fn count(&self, ctx: &RequestContext) -> Result<u64, ServiceError> {
        Ok(self.repo.count_for_user(&ctx.user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aftergame_types::event::ChangeFilter;
    use aftergame_types::identity::UserId;

    use crate::test_support::InMemoryStore;

    fn turn(message: &str, score: f64) -> NewConversation {
        NewConversation {
            message: message.to_string(),
            response: "I hear you.".to_string(),
            sentiment_score: score,
        }
    }

    #[tokio::test]
    async fn record_persists_and_publishes() {
        let feed = ChangeFeed::new(8);
        let svc = ConversationService::new(InMemoryStore::default(), feed.clone());
        let ctx = RequestContext::new(UserId::new());
        let mut sub = feed.subscribe(ChangeFilter::for_user(ctx.user_id.clone()));

        let record = svc.record(&ctx, turn("I just got cut from the team", 0.0)).await.unwrap();

        let listed = svc.list(&ctx, None).await.unwrap();
        assert_eq!(listed, vec![record.clone()]);
        assert_eq!(svc.count(&ctx).await.unwrap(), 1);

        let event = sub.next().await.unwrap();
        assert_eq!(event.table, ChangeTable::Conversations);
        assert_eq!(event.row_id, record.id);
    }

    #[tokio::test]
    async fn stored_score_comes_from_the_message() {
        let svc = ConversationService::new(InMemoryStore::default(), ChangeFeed::new(8));
        let ctx = RequestContext::new(UserId::new());

        let record = svc.record(&ctx, turn("I feel great and hopeful", -1.0)).await.unwrap();
        assert_eq!(record.sentiment_score, sentiment::score("I feel great and hopeful"));
        assert!(record.sentiment_score > 0.0);

        let record = svc.record(&ctx, turn("hi", 1.5)).await.unwrap();
        assert_eq!(record.sentiment_score, 0.0);

        let listed = svc.list(&ctx, None).await.unwrap();
        assert!(listed.iter().all(|r| r.sentiment_score == sentiment::score(&r.message)));
    }

    #[tokio::test]
    async fn record_rejects_blank_message() {
        let svc = ConversationService::new(InMemoryStore::default(), ChangeFeed::new(8));
        let ctx = RequestContext::new(UserId::new());

        let err = svc.record(&ctx, turn("   ", 0.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(svc.count(&ctx).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn users_only_see_their_own_turns() {
        let svc = ConversationService::new(InMemoryStore::default(), ChangeFeed::new(8));
        let alice = RequestContext::new(UserId::new());
        let bob = RequestContext::new(UserId::new());

        svc.record(&alice, turn("from alice", 0.1)).await.unwrap();
        assert!(svc.list(&bob, None).await.unwrap().is_empty());
    }
}
