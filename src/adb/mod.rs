// ADB module - the device bridge the Wi-Fi switcher drives.
// Two implementations: the external `adb` binary, or the pure Rust
// adb_client talking to the ADB server socket.

pub mod backend;
pub mod error;
pub mod rust_impl;
pub mod shell;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export the main types and functions for easy access
pub use backend::AdbBackend;
pub use error::{AdbError, AdbResult};
pub use rust_impl::RustAdb;
pub use shell::AdbShell;
pub use types::{AdbBridge, DEFAULT_TCPIP_PORT, DEFAULT_WIFI_INTERFACE, Device};
