//! Client-side transcript of one coaching session.
//!
//! The assistant reply of the turn in flight is a *draft*: it is created by
//! the first delta, grows with every later delta and is either committed
//! when the stream completes or rolled back when it fails.

use aftergame_types::chat::{ChatMessage, ChatRole, MAX_CONTENT_CHARS, MAX_MESSAGES};

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    draft: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from previously exchanged messages.
    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            draft: None,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// Append a delta to the draft, creating the placeholder on first use.
    /// Returns the draft text so far.
    pub fn apply_delta(&mut self, delta: &str) -> &str {
        let idx = match self.draft {
            Some(idx) => idx,
            None => {
                self.messages.push(ChatMessage::assistant(String::new()));
                let idx = self.messages.len() - 1;
                self.draft = Some(idx);
                idx
            }
        };
        let draft = &mut self.messages[idx];
        draft.content.push_str(delta);
        &draft.content
    }

    /// Text of the draft, if one exists.
    pub fn draft_text(&self) -> Option<&str> {
        self.draft.map(|idx| self.messages[idx].content.as_str())
    }

    /// Keep the draft as a finished assistant message and return its text.
    pub fn commit_draft(&mut self) -> Option<String> {
        self.draft
            .take()
            .map(|idx| self.messages[idx].content.clone())
    }

    /// Discard the draft. The user message that started the turn stays.
    pub fn rollback_draft(&mut self) -> Option<ChatMessage> {
        let idx = self.draft.take()?;
        Some(self.messages.remove(idx))
    }

    /// The most recent `max` sendable messages, oldest first.
    ///
    /// `max` is clamped to `1..=MAX_MESSAGES`. Messages the relay would
    /// reject (empty, or longer than `MAX_CONTENT_CHARS`) stay in the
    /// transcript but are left out of the window whole.
    pub fn history_window(&self, max: usize) -> Vec<ChatMessage> {
        let max = max.clamp(1, MAX_MESSAGES);
        let mut window: Vec<ChatMessage> = self
            .messages
            .iter()
            .rev()
            .filter(|m| is_sendable(m))
            .take(max)
            .cloned()
            .collect();
        window.reverse();
        window
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The latest committed assistant message, if any.
    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .enumerate()
            .rev()
            .find(|(idx, m)| m.role == ChatRole::Assistant && Some(*idx) != self.draft)
            .map(|(_, m)| m.content.as_str())
    }
}

fn is_sendable(message: &ChatMessage) -> bool {
    !message.content.is_empty() && message.content.chars().count() <= MAX_CONTENT_CHARS
}
