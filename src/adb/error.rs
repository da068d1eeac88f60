use std::net::SocketAddrV4;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A specialized `Result` type for ADB operations.
pub type AdbResult<T> = Result<T, AdbError>;

/// The error type for all ADB-related operations.
#[derive(Debug, Error)]
pub enum AdbError {
    #[error(
        "'{}' not found in PATH. Install Android Platform Tools (https://developer.android.com/tools/adb) or run with --impl=rust.", .path.display()
    )]
    AdbNotFound { path: PathBuf },

    #[error("'{}' is installed but not usable: {description}", .path.display())]
    AdbUnusable { path: PathBuf, description: String },

    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("'{command}' failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("ADB server command '{command}' failed: {source}")]
    ServerCommandFailed {
        command: String,
        source: adb_client::RustADBError,
    },

    #[error("Operation timed out after {duration:?}: {description}")]
    Timeout {
        duration: Duration,
        description: String,
    },

    #[error("Task failed to complete: {source}")]
    JoinError {
        #[from]
        source: tokio::task::JoinError,
    },

    #[error("No USB device attached. Connect a device with USB debugging enabled.")]
    NoDevices,

    #[error("Multiple devices attached ({}); pick one with --serial=<serial>", .serials.join(", "))]
    MultipleDevices { serials: Vec<String> },

    #[error("Device '{serial}' is '{state}'. Authorize USB debugging on the phone and retry.")]
    DeviceNotReady { serial: String, state: String },

    #[error(
        "Address discovery failed: no IPv4 address on '{interface}' after {attempts} attempt(s) in {waited:?}. Is Wi-Fi on and associated?"
    )]
    AddressDiscoveryFailed {
        interface: String,
        attempts: u32,
        waited: Duration,
    },

    #[error("Could not connect to {endpoint}: {message}")]
    ConnectFailed {
        endpoint: SocketAddrV4,
        message: String,
    },

    #[error("Failed to write progress output: {source}")]
    Output {
        #[from]
        source: std::io::Error,
    },
}

impl AdbError {
    /// Errors that mean the target device could not be picked, as opposed to
    /// a bridge command failing against a known device.
    pub fn is_device_selection(&self) -> bool {
        matches!(
            self,
            AdbError::NoDevices | AdbError::MultipleDevices { .. } | AdbError::DeviceNotReady { .. }
        )
    }

    /// Build a `CommandFailed` from a finished process, preferring stderr and
    /// falling back to stdout since adb prints some failures there.
    pub fn from_output(command: impl Into<String>, output: &std::process::Output) -> Self {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr
        };
        AdbError::CommandFailed {
            command: command.into(),
            code: output.status.code(),
            stderr,
        }
    }
}
