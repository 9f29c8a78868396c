//! System orchestration, startup, shutdown and logging setup.

pub mod cart_system;
pub mod logging;

pub use cart_system::*;
pub use logging::*;
