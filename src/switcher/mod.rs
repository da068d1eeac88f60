//! Moves a USB-attached device onto ADB over Wi-Fi.
//!
//! The sequence is fixed: drop stale network sessions, pick the device,
//! restart adbd in TCP mode, wait for it, find the Wi-Fi address, connect.

pub mod policy;


use crate::adb::{
    AdbBridge, AdbError, AdbResult, DEFAULT_TCPIP_PORT, DEFAULT_WIFI_INTERFACE, Device,
};
use crate::inet::parse_inet_address;
use log::{debug, info, warn};
use serde::Serialize;
use std::io::Write;
use std::net::{Ipv4Addr, SocketAddrV4};
use tokio::time::Instant;

pub use policy::ReadinessPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchOptions {
    /// Explicit target. `None` requires exactly one USB device to be attached.
    pub serial: Option<String>,
    pub port: u16,
    pub interface: String,
    pub readiness: ReadinessPolicy,
}

impl Default for SwitchOptions {
    fn default() -> Self {
        Self {
            serial: None,
            port: DEFAULT_TCPIP_PORT,
            interface: DEFAULT_WIFI_INTERFACE.to_string(),
            readiness: ReadinessPolicy::default(),
        }
    }
}

/// Outcome of a successful switch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchReport {
    pub serial: String,
    pub address: Ipv4Addr,
    pub port: u16,
    pub endpoint: String,
    pub message: String,
    pub discovery_attempts: u32,
}

pub struct NetworkSwitcher<B> {
    bridge: B,
    options: SwitchOptions,
}

impl<B: AdbBridge> NetworkSwitcher<B> {
    pub fn new(bridge: B, options: SwitchOptions) -> Self {
        Self { bridge, options }
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn options(&self) -> &SwitchOptions {
        &self.options
    }

    /// Switch the target device to network debugging and connect to it.
    ///
    /// Progress lines go to `out`. Nothing is connected unless a valid IPv4
    /// address was found on the configured interface.
    pub async fn enable_network_debugging<W: Write>(&self, out: &mut W) -> AdbResult<SwitchReport> {
        let port = self.options.port;

        writeln!(out, "🔌 Dropping stale network sessions...")?;
        self.bridge.disconnect_all().await?;

        let serial = self.resolve_target().await?;
        info!("Switching {serial} to tcpip:{port} (bridge={})", self.bridge.impl_name());

        writeln!(out, "📡 Restarting adbd on {serial} in TCP mode (port {port})...")?;
        self.bridge.enable_tcpip(Some(&serial), port).await?;

        let settle = self.options.readiness.settle;
        writeln!(out, "⏳ Waiting {}ms for the device to listen...", settle.as_millis())?;
        tokio::time::sleep(settle).await;

        let (address, discovery_attempts) = self.discover_address(&serial).await?;
        writeln!(out, "📶 Device IP: {address}")?;

        let endpoint = SocketAddrV4::new(address, port);
        let message = self.bridge.connect(endpoint).await?;
        info!("Connected to {endpoint}: {message}");
        writeln!(out, "✅ {message}")?;

        Ok(SwitchReport {
            serial,
            address,
            port,
            endpoint: endpoint.to_string(),
            message,
            discovery_attempts,
        })
    }

    /// Put the target back into USB mode, then drop its network sessions.
    /// Returns the serial that was switched.
    ///
    /// `adb usb` goes out before the disconnect so a device reachable only
    /// over Wi-Fi still receives it.
    pub async fn revert_to_usb<W: Write>(&self, out: &mut W) -> AdbResult<String> {
        let serial = self.resolve_revert_target().await?;

        writeln!(out, "🔁 Restarting adbd on {serial} in USB mode...")?;
        self.bridge.enable_usb(Some(&serial)).await?;

        writeln!(out, "🔌 Dropping network sessions...")?;
        self.bridge.disconnect_all().await?;

        info!("{serial} back on USB");
        writeln!(out, "✅ {serial} is back on USB debugging")?;
        Ok(serial)
    }

    pub async fn list_devices(&self) -> AdbResult<Vec<Device>> {
        self.bridge.list_devices().await
    }

    /// Pick the device to switch to Wi-Fi.
    ///
    /// An explicit serial is used as-is. Otherwise network sessions are
    /// ignored and exactly one online USB device must remain.
    pub async fn resolve_target(&self) -> AdbResult<String> {
        if let Some(serial) = &self.options.serial {
            return Ok(serial.clone());
        }

        let (usb, _network) = self.attached_devices().await?;
        debug!("USB candidates: {usb:?}");
        pick_single_online(&usb)
    }

    /// Pick the device to send back to USB: the USB entry when one is
    /// attached, else the single network session.
    pub async fn resolve_revert_target(&self) -> AdbResult<String> {
        if let Some(serial) = &self.options.serial {
            return Ok(serial.clone());
        }

        let (usb, network) = self.attached_devices().await?;
        debug!("Revert candidates: usb={usb:?} network={network:?}");
        if usb.is_empty() {
            pick_single_online(&network)
        } else {
            pick_single_online(&usb)
        }
    }

    // (usb, network) split of the bridge's device list
    async fn attached_devices(&self) -> AdbResult<(Vec<Device>, Vec<Device>)> {
        Ok(self
            .bridge
            .list_devices()
            .await?
            .into_iter()
            .partition(|d| !d.is_network()))
    }

    // Poll the interface until it reports a usable IPv4 address or the policy runs out
    async fn discover_address(&self, serial: &str) -> AdbResult<(Ipv4Addr, u32)> {
        let policy = &self.options.readiness;
        let interface = self.options.interface.as_str();
        let started = Instant::now();
        let mut attempts = 0;

        let last_error = loop {
            attempts += 1;
            let failure = match self.bridge.interface_status(Some(serial), interface).await {
                Ok(status) => {
                    if let Some(address) = parse_inet_address(&status) {
                        debug!("{interface} has {address} (attempt {attempts})");
                        return Ok((address, attempts));
                    }
                    debug!("No IPv4 address on {interface} yet: {:?}", status.trim());
                    None
                }
                // adbd restarting drops the shell; keep polling
                Err(e) => {
                    warn!("Interface query failed (attempt {attempts}): {e}");
                    Some(e)
                }
            };

            if !policy.should_retry(started.elapsed()) {
                break failure;
            }
            tokio::time::sleep(policy.poll_interval).await;
        };

        Err(last_error.unwrap_or_else(|| AdbError::AddressDiscoveryFailed {
            interface: interface.to_string(),
            attempts,
            waited: policy.settle + started.elapsed(),
        }))
    }
}

// Exactly one online entry wins; otherwise explain why none could be picked
fn pick_single_online(candidates: &[Device]) -> AdbResult<String> {
    let online: Vec<&Device> = candidates.iter().filter(|d| d.is_online()).collect();
    match online.as_slice() {
        [single] => Ok(single.name.clone()),
        [] => match candidates.first() {
            Some(device) => Err(AdbError::DeviceNotReady {
                serial: device.name.clone(),
                state: device.state.clone(),
            }),
            None => Err(AdbError::NoDevices),
        },
        many => Err(AdbError::MultipleDevices {
            serials: many.iter().map(|d| d.name.clone()).collect(),
        }),
    }
}
