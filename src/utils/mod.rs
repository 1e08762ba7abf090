pub mod claude;
pub mod command;
pub mod format;
pub mod logger;

pub use claude::*;
pub use command::*;
pub use format::*;
pub use logger::*;
