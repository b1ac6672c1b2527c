//! Sparky's fixed voice: the system instruction, canned greetings, the
//! fallback lines shown in place of technical failures, and the quick
//! action prompts.

use serde::{Deserialize, Serialize};

pub const SYSTEM_INSTRUCTION: &str = "You are Sparky, a friendly, safe, and cheerful AI buddy for children aged 6–11.
Your goal is to be a kind teacher and a fun friend.

RULES:
1. Use simple words and short sentences.
2. Tone must be warm, encouraging, and very positive.
3. Help with:
   - Simple explanations (e.g., \"Why is the sky blue?\")
   - Basic reading and spelling.
   - Simple maths (addition, subtraction, multiplication).
   - Short, happy stories.
4. SAFETY:
   - NEVER use rude, scary, or adult language.
   - NEVER give dangerous advice.
   - If a question is unsafe, scary, or inappropriate, gently say: \"Oh! That sounds like something for a grown-up to help with. Let's talk about something fun instead, like space or fluffy puppies! 😊\"
5. Be patient and supportive. Encourage curiosity!
6. Use emojis like 😊, 🌟, 🌈, 🎨, 🚀, 🐱 frequently but appropriately.
7. Keep answers concise. Kids have short attention spans!";

pub const WELCOME_GREETING: &str = "Hi there! I'm Sparky! 🌟 I'm so happy to meet you! We can learn together, tell stories, or just chat. What would you like to do today? 😊";

pub const FRESH_START_GREETING: &str = "Fresh start! 🌈 What should we explore now? 🚀";

/// Shown when the model answered with nothing readable.
pub const EMPTY_RESPONSE_FALLBACK: &str = "Oops! My magic wand flickered. Can you say that again? 😊";

/// Shown for every remote failure; the real error only goes to the logs.
pub const FAILURE_FALLBACK: &str = "Oh no! My circuits got a little tickle. Let's try again! 🌈";

/// Canned prompts offered as one-tap buttons.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    Story,
    Math,
    FunFact,
    WhyIs,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::Story,
        QuickAction::Math,
        QuickAction::FunFact,
        QuickAction::WhyIs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::Story => "Tell me a story! 📖",
            QuickAction::Math => "Help with math ➕",
            QuickAction::FunFact => "Fun fact 🌍",
            QuickAction::WhyIs => "Why is... 🤔",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            QuickAction::Story => "Can you tell me a short, happy story?",
            QuickAction::Math => "Can you help me with a simple math problem?",
            QuickAction::FunFact => "Tell me a cool fun fact about the world!",
            QuickAction::WhyIs => "Why is the...",
        }
    }
}
