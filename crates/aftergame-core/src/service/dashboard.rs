//! Dashboard summary for the signed-in athlete.

use serde::Serialize;

use aftergame_types::error::ServiceError;
use aftergame_types::identity::RequestContext;
use aftergame_types::profile::Profile;

use crate::repository::conversation::ConversationRepository;
use crate::repository::journal::JournalRepository;
use crate::repository::profile::ProfileRepository;
use crate::service::journal::average_mood;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub journal_count: u64,
    pub conversation_count: u64,
    pub average_mood: f64,
    pub profile: Option<Profile>,
}

/// Read-only aggregation over journal, conversation and profile storage.
pub struct DashboardService<J, C, P>
where
    J: JournalRepository,
    C: ConversationRepository,
    P: ProfileRepository,
{
    journal: J,
    conversations: C,
    profiles: P,
}

impl<J, C, P> DashboardService<J, C, P>
where
    J: JournalRepository,
    C: ConversationRepository,
    P: ProfileRepository,
{
    pub fn new(journal: J, conversations: C, profiles: P) -> Self {
        Self {
            journal,
            conversations,
            profiles,
        }
    }

    pub async fn stats(&self, ctx: &RequestContext) -> Result<DashboardStats, ServiceError> {
        let entries = self.journal.list_for_user(&ctx.user_id).await?;
        let conversation_count = self.conversations.count_for_user(&ctx.user_id).await?;
        let profile = self.profiles.get(&ctx.user_id).await?;

        Ok(DashboardStats {
            journal_count: entries.len() as u64,
            conversation_count,
            average_mood: average_mood(&entries),
            profile,
        })
    }
}
