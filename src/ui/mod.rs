pub mod output;
pub mod signals;

pub use output::{OutputFormatter, OutputMode};
pub use signals::GracefulShutdown;
