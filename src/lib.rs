pub mod config;
pub mod display;
pub mod error;
pub mod extract;
pub mod fields;
pub mod segments;
pub mod statusline;
pub mod themes;
pub mod utils;

pub use config::*;
pub use display::*;
pub use error::StatuslineError;
pub use extract::*;
pub use fields::*;
pub use statusline::*;
pub use themes::*;
