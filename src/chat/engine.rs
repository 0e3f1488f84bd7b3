//! Scripted wellness companion.
//!
//! Replies come from a fixed catalog keyed by keywords and the detected
//! emotional state. There is no language model behind this; the scripts are
//! the product.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::emotion::{EmotionLabel, EmotionReading};

use super::catalog;

/// Transcript length cap.
const TRANSCRIPT_CAP: usize = 200;

/// Concerning wellbeing scores always draw a supportive message; above this
/// the companion only chimes in occasionally.
const CONCERN_THRESHOLD: u8 = 50;
const CHIME_IN_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Author {
    Companion,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub author: Author,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Emotional state that prompted a companion message, when there was one.
    pub emotion: Option<EmotionLabel>,
}

impl ChatMessage {
    fn companion(content: impl Into<String>, emotion: Option<EmotionLabel>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author: Author::Companion,
            content: content.into(),
            timestamp: Utc::now(),
            emotion,
        }
    }

    fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author: Author::User,
            content: content.into(),
            timestamp: Utc::now(),
            emotion: None,
        }
    }
}

struct ChatState {
    messages: Vec<ChatMessage>,
    last_label: Option<EmotionLabel>,
}

/// Shared transcript plus the response scripts. Cheap to clone.
#[derive(Clone)]
pub struct ChatEngine {
    inner: Arc<Mutex<ChatState>>,
}

impl ChatEngine {
    pub fn new() -> Self {
        let greeting = ChatMessage::companion(catalog::GREETING, Some(EmotionLabel::Neutral));
        Self {
            inner: Arc::new(Mutex::new(ChatState {
                messages: vec![greeting],
                last_label: None,
            })),
        }
    }

    /// Record a user message and produce the scripted reply.
    pub async fn send_user(&self, content: &str) -> ChatMessage {
        let reply_text = catalog::keyword_response(content)
            .map(str::to_string)
            .unwrap_or_else(|| {
                let mut rng = rand::thread_rng();
                catalog::DEFAULT_RESPONSES
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or(catalog::DEFAULT_RESPONSES[0])
                    .to_string()
            });

        let reply = ChatMessage::companion(reply_text, None);
        let mut state = self.inner.lock().await;
        push(&mut state.messages, ChatMessage::user(content));
        push(&mut state.messages, reply.clone());
        reply
    }

    /// React to a fresh reading. Only a changed label can prompt a message,
    /// and then only when the score is concerning or by occasional chance.
    pub async fn observe_reading(&self, reading: &EmotionReading) -> Option<ChatMessage> {
        let mut state = self.inner.lock().await;
        if state.last_label == Some(reading.label) {
            return None;
        }
        state.last_label = Some(reading.label);

        let should_speak = reading.score < CONCERN_THRESHOLD
            || rand::thread_rng().gen_bool(CHIME_IN_PROBABILITY);
        if !should_speak {
            return None;
        }

        let lines = catalog::supportive_messages(reading.label);
        let text = lines
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(lines[0]);
        let message = ChatMessage::companion(text, Some(reading.label));
        push(&mut state.messages, message.clone());
        Some(message)
    }

    pub async fn breathing_exercise(&self) -> ChatMessage {
        self.push_companion(catalog::BREATHING_EXERCISE.to_string())
            .await
    }

    pub async fn wellness_tip(&self) -> ChatMessage {
        let tip = {
            let mut rng = rand::thread_rng();
            catalog::WELLNESS_TIPS
                .choose(&mut rng)
                .copied()
                .unwrap_or(catalog::WELLNESS_TIPS[0])
        };
        self.push_companion(tip.to_string()).await
    }

    pub async fn motivation(&self) -> ChatMessage {
        self.push_companion(catalog::MOTIVATION.to_string()).await
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.inner.lock().await.messages.clone()
    }

    async fn push_companion(&self, content: String) -> ChatMessage {
        let message = ChatMessage::companion(content, None);
        let mut state = self.inner.lock().await;
        push(&mut state.messages, message.clone());
        message
    }
}

impl Default for ChatEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn push(messages: &mut Vec<ChatMessage>, message: ChatMessage) {
    messages.push(message);
    if messages.len() > TRANSCRIPT_CAP {
        messages.remove(0);
    }
}
