use super::error::AdbResult;
use super::rust_impl::RustAdb;
use super::shell::AdbShell;
use super::types::{AdbBridge, Device};
use std::net::SocketAddrV4;
use std::path::PathBuf;

pub enum AdbBackend {
    Shell(AdbShell),
    Rust(RustAdb),
}

impl AdbBackend {
    pub const IMPL_NAMES: [&'static str; 2] = ["shell", "rust"];

    /// Select an implementation by name; anything but "rust" uses the adb binary.
    pub fn from_impl_name(name: &str, adb_path: impl Into<PathBuf>) -> AdbResult<Self> {
        match name {
            "rust" => Ok(AdbBackend::Rust(RustAdb::new())),
            _ => Ok(AdbBackend::Shell(AdbShell::new(adb_path)?)),
        }
    }
}

impl AdbBridge for AdbBackend {
    async fn list_devices(&self) -> AdbResult<Vec<Device>> {
        match self {
            AdbBackend::Shell(s) => s.list_devices().await,
            AdbBackend::Rust(r) => r.list_devices().await,
        }
    }

    async fn disconnect_all(&self) -> AdbResult<()> {
        match self {
            AdbBackend::Shell(s) => s.disconnect_all().await,
            AdbBackend::Rust(r) => r.disconnect_all().await,
        }
    }

    async fn enable_tcpip(&self, serial: Option<&str>, port: u16) -> AdbResult<()> {
        match self {
            AdbBackend::Shell(s) => s.enable_tcpip(serial, port).await,
            AdbBackend::Rust(r) => r.enable_tcpip(serial, port).await,
        }
    }

    async fn interface_status(&self, serial: Option<&str>, interface: &str) -> AdbResult<String> {
        match self {
            AdbBackend::Shell(s) => s.interface_status(serial, interface).await,
            AdbBackend::Rust(r) => r.interface_status(serial, interface).await,
        }
    }

    async fn connect(&self, endpoint: SocketAddrV4) -> AdbResult<String> {
        match self {
            AdbBackend::Shell(s) => s.connect(endpoint).await,
            AdbBackend::Rust(r) => r.connect(endpoint).await,
        }
    }

    async fn enable_usb(&self, serial: Option<&str>) -> AdbResult<()> {
        match self {
            AdbBackend::Shell(s) => s.enable_usb(serial).await,
            AdbBackend::Rust(r) => r.enable_usb(serial).await,
        }
    }

    fn impl_name(&self) -> &'static str {
        match self {
            AdbBackend::Shell(s) => s.impl_name(),
            AdbBackend::Rust(r) => r.impl_name(),
        }
    }
}
