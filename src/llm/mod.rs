pub mod client;
pub mod provider;
pub mod providers;

pub use client::{ChatClient, ChatOptions};
pub use provider::{Author, ChatProvider, Message};
