//! Cycle view layer: breadcrumb-tracked roundtrip views with debounced
//! name validation, plus the configuration and logging used by `cyc`.

pub mod logging;
pub mod script;
pub mod session;
pub mod system_config;

pub use script::{replay, Script, Step, StepReport};
pub use session::{SessionSettings, SessionSnapshot, ViewSession};
pub use system_config::SystemConfig;
