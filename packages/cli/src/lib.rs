// ABOUTME: Shared pieces of the leadflow terminal driver
// ABOUTME: Logging setup, registry loading with custom flows and table rendering

pub mod flows;
pub mod logging;
pub mod render;

pub use flows::load_registry;
pub use logging::init_logging;
