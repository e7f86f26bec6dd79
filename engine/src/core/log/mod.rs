//! Log backends for the `log` facade.

mod channel;

pub use channel::{ChannelLogger, LogMessage, init_channel_logger};
