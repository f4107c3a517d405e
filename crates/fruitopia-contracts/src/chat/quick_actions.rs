#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        label: "Recommend for Diabetes",
        prompt: "I have diabetes, what fruits should I eat?",
    },
    QuickAction {
        label: "Heart Health",
        prompt: "What fruits are good for heart health?",
    },
    QuickAction {
        label: "Immune Boost",
        prompt: "Which fruits boost immunity?",
    },
    QuickAction {
        label: "Weight Loss",
        prompt: "Fruits for weight management?",
    },
    QuickAction {
        label: "General Health",
        prompt: "What are the healthiest fruits?",
    },
];

pub const WELCOME_MESSAGE: &str = "🍎 Hello! I'm your Fruitopia AI Assistant. I can help you find healthy fruits based on your health conditions, answer questions about nutrition, and provide personalized recommendations. What would you like to know?";

pub const QUICK_ACTIONS_PROMPT: &str = "Here are some quick questions to get started:";

pub const CONNECTION_APOLOGY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again later.";

pub const CHAT_HELP_COMMANDS: &[&str] = &[
    "/quick <n>",
    "/clear",
    "/history",
    "/minimize",
    "/close",
    "/help",
];
