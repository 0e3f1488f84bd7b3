//! Scripted companion responses.

use crate::emotion::EmotionLabel;

pub const GREETING: &str = "Hello! I'm MAITRI, your wellness companion. I'm here to support your emotional well-being during your mission.";

pub const MOTIVATION: &str = "You're doing an incredible job! Your mission is important and you're making a difference. Stay strong!";

pub const BREATHING_EXERCISE: &str =
    "Let's do a breathing exercise. Breathe in for 4 counts... hold for 4... exhale for 6. Repeat 3 times.";

pub const WELLNESS_TIPS: &[&str] = &[
    "Remember to stay hydrated - dehydration can affect mood and cognitive function.",
    "Take time to appreciate the unique view of Earth from your position.",
    "Maintain your sleep schedule as much as possible for optimal mental health.",
    "Regular communication with loved ones on Earth can boost emotional well-being.",
    "Practice gratitude by noting three positive things from your day.",
];

pub const DEFAULT_RESPONSES: &[&str] = &[
    "Thank you for sharing that with me. How are you feeling right now?",
    "I appreciate you opening up. Is there anything specific I can help you with?",
    "Your well-being is important. Remember that it's okay to take breaks when needed.",
    "I'm here to listen and support you. What's on your mind?",
];

/// Comfort lines keyed to the detected emotional state.
pub fn supportive_messages(label: EmotionLabel) -> &'static [&'static str] {
    match label {
        EmotionLabel::Happy => &[
            "It's wonderful to see you in such a positive state! Keep up the great energy.",
            "Your positive mood is fantastic. Remember to share this energy with your crew.",
            "Great to see you're feeling good! This is an excellent time for creative tasks.",
        ],
        EmotionLabel::Sad => &[
            "I notice you might be feeling down. Remember, it's normal to have these moments in space.",
            "Take a moment to breathe deeply. Try looking at Earth through the window if possible.",
            "Your feelings are valid. Consider reaching out to your crew or ground support for connection.",
        ],
        EmotionLabel::Neutral => &[
            "You seem calm and balanced. This is a great state for focused work.",
            "Your steady emotional state is perfect for routine tasks and planning.",
            "Maintaining this balanced state shows good emotional regulation.",
        ],
        EmotionLabel::Stressed => &[
            "I detect some stress. Let's try a quick breathing exercise: inhale for 4, hold for 4, exhale for 6.",
            "Stress is normal in challenging environments. Consider taking a short break if possible.",
            "Try progressive muscle relaxation: tense and release each muscle group for 5 seconds.",
        ],
        EmotionLabel::Fatigued => &[
            "You seem tired. If possible, consider a short rest or power nap.",
            "Fatigue can affect decision-making. Prioritize essential tasks and delegate when possible.",
            "Try some gentle stretching or light exercise to boost your energy levels.",
        ],
    }
}

/// Keyword-routed reply for free-form user input, if any keyword matches.
pub fn keyword_response(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();

    if lower.contains("stress") || lower.contains("anxious") {
        Some("I understand you're feeling stressed. Let's try a breathing exercise together. Breathe in slowly for 4 counts, hold for 4, then exhale for 6. Repeat this 3 times.")
    } else if lower.contains("tired") || lower.contains("fatigue") {
        Some("Fatigue is common in space environments. If possible, try to rest. Even a 10-minute break can help restore your energy.")
    } else if lower.contains("lonely") || lower.contains("isolated") {
        Some("Feeling isolated is natural in space. Remember that your crew and ground support are always here for you. Consider scheduling a call with loved ones.")
    } else if lower.contains("help") || lower.contains("support") {
        Some("I'm here to help! You can talk to me about anything, practice breathing exercises, or I can provide wellness tips. What would be most helpful right now?")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_route_to_scripted_replies() {
        assert!(keyword_response("I feel so STRESSED today").is_some());
        assert!(keyword_response("a bit tired").is_some());
        assert!(keyword_response("what a lovely view").is_none());
    }

    #[test]
    fn every_label_has_supportive_lines() {
        for label in EmotionLabel::ALL {
            assert!(!supportive_messages(label).is_empty());
        }
    }
}
