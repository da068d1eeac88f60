pub mod adb;
pub mod args;
pub mod inet;
pub mod switcher;

pub use adb::{AdbBackend, AdbBridge, AdbError, AdbResult};
pub use switcher::{NetworkSwitcher, ReadinessPolicy, SwitchOptions, SwitchReport};
