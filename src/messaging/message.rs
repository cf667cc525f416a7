//! # Message Structures
//!
//! Wire-level and consumer-facing message records. A `ReceivedMessage` is
//! what the queue client hands back (including the receipt handle needed to
//! delete it); a `MessageContent` is the trimmed-down record delivered to
//! the consumer.

use serde::{Deserialize, Serialize};

/// A message as received from the queue service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedMessage {
    /// Service-assigned message ID.
    pub id: String,
    /// Full message body. For a topic subscription this is the published
    /// notification payload.
    pub body: String,
    /// Opaque handle used to delete this particular receipt of the message.
    pub receipt_handle: String,
}

/// The consumer-facing view of a message: body and ID, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub body: String,
    pub id: String,
}

impl From<&ReceivedMessage> for MessageContent {
    fn from(message: &ReceivedMessage) -> Self {
        Self {
            body: message.body.clone(),
            id: message.id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_from_received_message() {
        let received = ReceivedMessage {
            id: "msg-1".to_string(),
            body: "hello".to_string(),
            receipt_handle: "rh-1".to_string(),
        };

        let content = MessageContent::from(&received);
        assert_eq!(content.id, "msg-1");
        assert_eq!(content.body, "hello");
    }

    #[test]
    fn test_message_serialization() {
        let content = MessageContent {
            body: "payload".to_string(),
            id: "msg-2".to_string(),
        };

        let serialized = serde_json::to_string(&content).expect("serialize");
        let deserialized: MessageContent = serde_json::from_str(&serialized).expect("deserialize");
        assert_eq!(content, deserialized);
    }
}
