// Export submodules
pub mod chat;

pub use chat::{ActionOutcome, ChatContext, TurnReport};
