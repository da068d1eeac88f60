// https://crates.io/crates/adb_client
use super::error::{AdbError, AdbResult};
use super::types::{AdbBridge, Device};
use adb_client::{ADBDeviceExt, ADBServer, ADBServerDevice, RustADBError};
use log::debug;
use std::net::SocketAddrV4;
use std::time::Duration;

/// Bridge that talks to the local ADB server socket directly instead of
/// spawning the `adb` binary.
pub struct RustAdb {
    timeout: Duration,
}

impl RustAdb {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(10))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    // adb_client is blocking; run each call off the runtime and bound it.
    // A timed-out task cannot be cancelled, so every call gets its own server
    // connection and a stuck one never blocks the next.
    async fn with_server<T, F>(&self, command: String, op: F) -> AdbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut ADBServer) -> Result<T, RustADBError> + Send + 'static,
    {
        debug!("rust: {command}");
        let task = tokio::task::spawn_blocking(move || {
            let mut server = ADBServer::default();
            op(&mut server)
        });
        match tokio::time::timeout(self.timeout, task).await {
            Ok(joined) => joined?.map_err(|source| AdbError::ServerCommandFailed { command, source }),
            Err(_) => Err(AdbError::Timeout {
                duration: self.timeout,
                description: command,
            }),
        }
    }

    async fn with_device<T, F>(&self, serial: Option<&str>, command: String, op: F) -> AdbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut ADBServerDevice) -> Result<T, RustADBError> + Send + 'static,
    {
        let serial = serial.map(str::to_string);
        self.with_server(command, move |server| {
            let mut device = match serial {
                Some(name) => server.get_device_by_name(&name)?,
                None => server.get_device()?,
            };
            op(&mut device)
        })
        .await
    }
}

impl Default for RustAdb {
    fn default() -> Self {
        Self::new()
    }
}

impl AdbBridge for RustAdb {
    async fn list_devices(&self) -> AdbResult<Vec<Device>> {
        let devices = self
            .with_server("devices".to_string(), |server| server.devices())
            .await?;
        Ok(devices
            .into_iter()
            .map(|d| Device {
                name: d.identifier,
                state: format!("{:?}", d.state).to_lowercase(),
                transport_id: None,
            })
            .collect())
    }

    async fn disconnect_all(&self) -> AdbResult<()> {
        // The server protocol has no "disconnect everything"; drop each ip:port session
        let sessions: Vec<SocketAddrV4> = self
            .list_devices()
            .await?
            .iter()
            .filter_map(Device::network_endpoint)
            .collect();
        for endpoint in sessions {
            self.with_server(format!("disconnect {endpoint}"), move |server| {
                server.disconnect_device(endpoint)
            })
            .await?;
        }
        Ok(())
    }

    async fn enable_tcpip(&self, serial: Option<&str>, port: u16) -> AdbResult<()> {
        self.with_device(serial, format!("tcpip {port}"), move |device| {
            device.tcpip(port)
        })
        .await
    }

    async fn interface_status(&self, serial: Option<&str>, interface: &str) -> AdbResult<String> {
        let interface = interface.to_string();
        let command = format!("shell ip -f inet addr show {interface}");
        let out = self
            .with_device(serial, command, move |device| {
                let mut out: Vec<u8> = Vec::new();
                device.shell_command(&["ip", "-f", "inet", "addr", "show", interface.as_str()], &mut out)?;
                Ok(out)
            })
            .await?;
        Ok(String::from_utf8_lossy(&out).to_string())
    }

    async fn connect(&self, endpoint: SocketAddrV4) -> AdbResult<String> {
        self.with_server(format!("connect {endpoint}"), move |server| {
            server.connect_device(endpoint)
        })
        .await
        .map_err(|e| match e {
            AdbError::ServerCommandFailed { source, .. } => AdbError::ConnectFailed {
                endpoint,
                message: source.to_string(),
            },
            other => other,
        })?;
        Ok(format!("connected to {endpoint}"))
    }

    async fn enable_usb(&self, serial: Option<&str>) -> AdbResult<()> {
        self.with_device(serial, "usb".to_string(), |device| device.usb())
            .await
    }

    fn impl_name(&self) -> &'static str {
        "rust"
    }
}
