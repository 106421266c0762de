//! Bot commands

/// Commands shown in the help text and the client command menu
pub const COMMANDS: &[(&str, &str)] = &[
    ("start", "Start a new conversation, or resume one with /start <id>"),
    ("list", "List recent conversations"),
    ("servers", "Show the tools available to the assistant"),
    ("help", "Show this help message"),
];

/// A recognised command and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` without argument opens a new conversation, with one resumes it
    Start(Option<String>),
    List,
    Servers,
    Help,
    Unknown(String),
}

impl Command {
    /// Interpret a command name and its raw argument string
    pub fn parse(name: &str, args: &str) -> Self {
        match name {
            "start" => Self::Start(args.split_whitespace().next().map(str::to_string)),
            "list" => Self::List,
            "servers" => Self::Servers,
            "help" => Self::Help,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Help text listing every command
    pub fn help_text() -> String {
        let mut text = String::from("Available commands:\n");
        for (name, description) in COMMANDS {
            text.push_str(&format!("/{} - {}\n", name, description));
        }
        text.push_str("\nAnything else is sent to the assistant.");
        text
    }
}
