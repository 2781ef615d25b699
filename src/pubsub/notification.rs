//! Payloads carried on the topic bus

use serde::Serialize;

use crate::types::{ChatMessage, Participant, Survey};

/// A notification published to one topic.
///
/// Serializes as the bare payload so subscribers see exactly what was published.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Notification {
    /// Refreshed membership list of a table
    Members(Vec<Participant>),
    /// A newly recorded chat message
    Chat(ChatMessage),
    /// The full survey after an advance or answer
    Survey(Survey),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_serialize_as_bare_list() {
        let n = Notification::Members(vec![Participant::new(1, "A")]);
        assert_eq!(serde_json::to_string(&n).unwrap(), r#"[{"id":1,"name":"A"}]"#);

        let empty = Notification::Members(vec![]);
        assert_eq!(serde_json::to_string(&empty).unwrap(), "[]");
    }
}
