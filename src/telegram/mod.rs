pub mod client;
pub mod command;
pub mod delivery;
pub mod poller;
pub mod types;

pub use client::{TelegramClient, TelegramError};
pub use types::{Chat, ChatMember, Message, Update, User};
