//! Discord adapter: gateway connection, REST delivery and payload encoding.

pub mod dispatcher;
pub mod gateway;
pub mod interaction;
pub mod rest;
pub mod wire;

pub use dispatcher::InteractionDispatcher;
pub use gateway::{GatewayConfig, GatewayError, GatewayHandler};
pub use rest::DiscordRest;
