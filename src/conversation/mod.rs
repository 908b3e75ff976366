//! The conversation turn pipeline and the chat state it drives.

mod state;
mod turn;

pub use state::{ChatEvent, ChatState};
pub use turn::{
    SEND_FAILED_ALERT, SkipReason, TurnContext, TurnError, TurnOutcome, TurnPipeline,
};
