use serde::{Deserialize, Serialize};

/// Entries kept after an exchange is recorded (six user/assistant pairs).
pub const MAX_HISTORY_ENTRIES: usize = 12;
/// Entries rendered into the next prompt (two user/assistant pairs).
pub const PROMPT_HISTORY_ENTRIES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Conversation so far, owned by the caller's session and passed in and out
/// of each generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    entries: Vec<HistoryEntry>,
}

impl ConversationHistory {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn record_exchange(&mut self, prompt: &str, output: &str) {
        self.entries.push(HistoryEntry {
            role: Role::User,
            content: prompt.to_string(),
        });
        self.entries.push(HistoryEntry {
            role: Role::Assistant,
            content: output.to_string(),
        });
        if self.entries.len() > MAX_HISTORY_ENTRIES {
            let excess = self.entries.len() - MAX_HISTORY_ENTRIES;
            self.entries.drain(..excess);
        }
    }

    /// Input text for the next call: the last few entries as `role: content`
    /// blocks followed by the new prompt, or the bare prompt with no history.
    pub fn render_input(&self, prompt: &str) -> String {
        if self.entries.is_empty() {
            return prompt.to_string();
        }
        let mut blocks: Vec<String> = self
            .recent(PROMPT_HISTORY_ENTRIES)
            .iter()
            .map(|e| format!("{}: {}", e.role.as_str(), e.content))
            .collect();
        blocks.push(format!("user: {}", prompt));
        blocks.join("\n\n")
    }
}
