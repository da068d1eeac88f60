use super::error::{AdbError, AdbResult};
use super::types::{AdbBridge, Device};
use log::debug;
use std::net::SocketAddrV4;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Bridge backed by the external `adb` binary.
pub struct AdbShell {
    adb_path: PathBuf,
}

impl AdbShell {
    fn ensure_adb_available(adb_path: &Path) -> AdbResult<()> {
        match std::process::Command::new(adb_path).arg("version").output() {
            Ok(out) => {
                if !out.status.success() {
                    return Err(AdbError::AdbUnusable {
                        path: adb_path.to_path_buf(),
                        description: format!("'adb version' returned non-zero ({})", out.status),
                    });
                }
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AdbError::AdbNotFound {
                path: adb_path.to_path_buf(),
            }),
            Err(e) => Err(AdbError::AdbUnusable {
                path: adb_path.to_path_buf(),
                description: e.to_string(),
            }),
        }
    }

    pub fn new(adb_path: impl Into<PathBuf>) -> AdbResult<Self> {
        let adb_path = adb_path.into();
        Self::ensure_adb_available(&adb_path)?;
        Ok(Self { adb_path })
    }

    fn command(&self, serial: Option<&str>) -> Command {
        let mut cmd = Command::new(&self.adb_path);
        if let Some(s) = serial {
            cmd.arg("-s").arg(s);
        }
        cmd
    }

    // Runs adb with the given arguments and returns stdout, failing on non-zero exit
    async fn run(&self, serial: Option<&str>, args: &[&str]) -> AdbResult<String> {
        let display = describe(serial, args);
        debug!("shell: {display}");
        let output = self
            .command(serial)
            .args(args)
            .output()
            .await
            .map_err(|source| AdbError::Spawn {
                command: display.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(AdbError::from_output(display, &output));
        }
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        debug!("shell: {display} -> {}", stdout.trim());
        Ok(stdout)
    }

    pub fn parse_devices(output: &str) -> Vec<Device> {
        output
            .lines()
            .filter(|line| !line.starts_with("List of devices") && !line.starts_with('*'))
            .filter_map(|line| {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 2 {
                    return None;
                }
                let transport_id = parts
                    .iter()
                    .find_map(|part| part.strip_prefix("transport_id:"))
                    .map(str::to_string);
                Some(Device {
                    name: parts[0].to_string(),
                    state: parts[1].to_string(),
                    transport_id,
                })
            })
            .collect()
    }

    /// adb exits 0 for a refused connect and reports the failure on stdout.
    pub fn connect_failure(output: &str) -> Option<&str> {
        const FAILURE_MARKERS: [&str; 4] = [
            "failed to connect",
            "unable to connect",
            "cannot connect",
            "Connection refused",
        ];
        output
            .lines()
            .map(str::trim)
            .find(|line| FAILURE_MARKERS.iter().any(|marker| line.contains(marker)))
    }
}

fn describe(serial: Option<&str>, args: &[&str]) -> String {
    match serial {
        Some(s) => format!("adb -s {s} {}", args.join(" ")),
        None => format!("adb {}", args.join(" ")),
    }
}

impl AdbBridge for AdbShell {
    async fn list_devices(&self) -> AdbResult<Vec<Device>> {
        let stdout = self.run(None, &["devices", "-l"]).await?;
        Ok(Self::parse_devices(&stdout))
    }

    async fn disconnect_all(&self) -> AdbResult<()> {
        self.run(None, &["disconnect"]).await.map(|_| ())
    }

    async fn enable_tcpip(&self, serial: Option<&str>, port: u16) -> AdbResult<()> {
        let port = port.to_string();
        let stdout = self.run(serial, &["tcpip", &port]).await?;
        // "error: no devices/emulators found" can come back with status 0 on older platform-tools
        if let Some(line) = stdout.lines().find(|l| l.starts_with("error:")) {
            return Err(AdbError::CommandFailed {
                command: describe(serial, &["tcpip", &port]),
                code: Some(0),
                stderr: line.to_string(),
            });
        }
        Ok(())
    }

    async fn interface_status(&self, serial: Option<&str>, interface: &str) -> AdbResult<String> {
        self.run(serial, &["shell", "ip", "-f", "inet", "addr", "show", interface])
            .await
    }

    async fn connect(&self, endpoint: SocketAddrV4) -> AdbResult<String> {
        let target = endpoint.to_string();
        let stdout = self.run(None, &["connect", &target]).await?;
        if let Some(line) = Self::connect_failure(&stdout) {
            return Err(AdbError::ConnectFailed {
                endpoint,
                message: line.to_string(),
            });
        }
        Ok(stdout.trim().to_string())
    }

    async fn enable_usb(&self, serial: Option<&str>) -> AdbResult<()> {
        self.run(serial, &["usb"]).await.map(|_| ())
    }

    fn impl_name(&self) -> &'static str {
        "shell"
    }
}
