// Core ADB types and the bridge capability the switcher consumes
use super::error::AdbResult;
use serde::Serialize;
use std::net::SocketAddrV4;

/// Port `adb tcpip` listens on unless told otherwise.
pub const DEFAULT_TCPIP_PORT: u16 = 5555;

/// Wireless interface name on nearly every Android build.
pub const DEFAULT_WIFI_INTERFACE: &str = "wlan0";

#[derive(Debug, PartialEq, Serialize, Clone)]
pub struct Device {
    pub name: String,
    pub state: String,
    pub transport_id: Option<String>,
}

impl Device {
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            transport_id: None,
        }
    }

    /// `device` is the only state in which adb accepts commands.
    pub fn is_online(&self) -> bool {
        self.state == "device"
    }

    /// Network sessions show up with an `ip:port` serial.
    pub fn is_network(&self) -> bool {
        self.network_endpoint().is_some()
    }

    pub fn network_endpoint(&self) -> Option<SocketAddrV4> {
        self.name.parse().ok()
    }
}

// Operations the switcher needs from a device bridge (adb binary or adb server client).
// `serial` targets one device; `None` leaves the choice to the bridge.
#[allow(async_fn_in_trait)]
pub trait AdbBridge: Send + Sync {
    async fn list_devices(&self) -> AdbResult<Vec<Device>>;

    /// Drop every network session. Succeeds when there is nothing to drop.
    async fn disconnect_all(&self) -> AdbResult<()>;

    async fn enable_tcpip(&self, serial: Option<&str>, port: u16) -> AdbResult<()>;

    /// Raw `ip addr show` style text for one interface.
    async fn interface_status(&self, serial: Option<&str>, interface: &str) -> AdbResult<String>;

    /// Open a network session, returning the bridge's confirmation text.
    async fn connect(&self, endpoint: SocketAddrV4) -> AdbResult<String>;

    async fn enable_usb(&self, serial: Option<&str>) -> AdbResult<()>;

    fn impl_name(&self) -> &'static str;
}
