use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "medchat", about = "Appointment chat client (REST history + live WebSocket)")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List conversations, most recently active first
    Conversations,
    /// Print the total number of unread messages
    Unread,
    /// Print one page of a conversation's message history
    History {
        conversation_id: i64,
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Open a conversation and chat live (/quit to leave)
    Chat { conversation_id: i64 },
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Conversations)
    }
}
