//! Comment flattening

use crate::types::Conversation;

/// Plain-text bodies of `conversations`, in the order the helpdesk returned them
///
/// A ticket without conversations still yields one empty comment so it keeps a row
/// in the export. A conversation whose `body_text` is null flattens to `""`.
pub fn flatten_comments(conversations: &[Conversation]) -> Vec<String> {
    if conversations.is_empty() {
        return vec![String::new()];
    }

    conversations
        .iter()
        .map(|c| c.body_text.clone().unwrap_or_default())
        .collect()
}
