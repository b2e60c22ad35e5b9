//! Chat-completion provider adapters.

mod chat_client;

pub use chat_client::HttpChatProvider;
