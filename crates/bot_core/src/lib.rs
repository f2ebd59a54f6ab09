//! Bot behaviour independent of any chat platform: cards, navigation,
//! sessions, the interaction lifecycle and the command handlers.

pub mod card;
pub mod commands;
pub mod context;
pub mod format;
pub mod handlers;
pub mod lifecycle;
pub mod navigation;
pub mod session;
pub mod views;

pub use card::{Control, ControlAction, ControlId, ControlStyle, DisplayCard, OutgoingMessage};
pub use commands::{Command, CommandError, CommandSpec, OptionKind, OptionSpec, OptionValue, COMMANDS};
pub use context::{AppContext, BotSettings};
pub use handlers::{handle_command, handle_component, reject_invocation};
pub use lifecycle::{
    Acknowledgement, ChatPlatform, InteractionLifecycle, InteractionRef, MessageRef,
    PlatformError,
};
