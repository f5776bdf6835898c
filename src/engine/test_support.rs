use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use crate::engine::llm_client::{CompletionProvider, CompletionRequest};
use crate::engine::save_store::{SessionStore, StoreError};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub prompt: String,
    pub model: String,
}

/// Replays queued replies in order; `None` entries fail. Errors once empty.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<Option<String>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedProvider {
    pub fn replying<const N: usize>(replies: [&str; N]) -> Self {
        let provider = Self::default();
        for r in replies {
            provider.push(Some(r));
        }
        provider
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Option<&str>) {
        self.replies.lock().unwrap().push_back(reply.map(str::to_string));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl CompletionProvider for ScriptedProvider {
    fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: request.system.to_string(),
            prompt: request.prompt.to_string(),
            model: request.model.to_string(),
        });

        match self.replies.lock().unwrap().pop_front() {
            Some(Some(text)) => Ok(text),
            _ => Err(anyhow!("429 insufficient_quota")),
        }
    }
}

/// Shared in-memory store so tests can inspect what the controller wrote.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.put_raw(key, blob);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
