use crate::state::ChatMessage;

/// Append-only list of conversation turns for one chat session.
///
/// Insertion order is display order. Nothing is ever removed or edited.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message at the end and return it as stored.
    pub fn append(&mut self, message: ChatMessage) -> &ChatMessage {
        let index = self.messages.len();
        self.messages.push(message);
        &self.messages[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&ChatMessage> {
        self.messages.get(index)
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a MessageStore {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut store = MessageStore::new();
        store.append(ChatMessage::user("one"));
        store.append(ChatMessage::assistant("two"));
        store.append(ChatMessage::user("one"));

        let contents: Vec<&str> = store.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "one"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_append_returns_stored_message() {
        let mut store = MessageStore::new();
        store.append(ChatMessage::user("one"));
        let stored = store.append(ChatMessage::error("boom")).clone();

        assert!(stored.is_error);
        assert_eq!(Some(&stored), store.last());
        assert_eq!(store.len(), 2);
    }
}
