mod basic;
mod interface;
mod lock;
mod mutex;
mod state;
mod stats;

pub use basic::*;
pub use interface::*;
pub use lock::*;
pub(crate) use mutex::*;
pub(crate) use state::*;
pub use stats::*;
