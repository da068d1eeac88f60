use crate::adb::{AdbBackend, DEFAULT_TCPIP_PORT, DEFAULT_WIFI_INTERFACE};
use crate::switcher::{ReadinessPolicy, SwitchOptions};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Wifi,
    Usb,
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub mode: Mode,
    pub serial: Option<String>,
    pub port: u16,
    pub interface: String,
    pub settle_secs: u64,
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub poll: bool,
    pub adb_impl: String,
    pub adb_path: PathBuf,
    pub json: bool,
    pub debug_mode: bool,
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
pub enum Parsed {
    Run(Args),
    Help,
    Version,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            mode: Mode::Wifi,
            serial: None,
            port: DEFAULT_TCPIP_PORT,
            interface: DEFAULT_WIFI_INTERFACE.to_string(),
            settle_secs: ReadinessPolicy::DEFAULT_SETTLE.as_secs(),
            timeout_secs: ReadinessPolicy::DEFAULT_TIMEOUT.as_secs(),
            poll_interval_ms: ReadinessPolicy::DEFAULT_POLL_INTERVAL.as_millis() as u64,
            poll: true,
            adb_impl: "shell".to_string(),
            adb_path: PathBuf::from("adb"),
            json: false,
            debug_mode: false,
        }
    }
}

impl Args {
    /// Parse the process arguments; prints help, version or the parse error
    /// and returns `Err(exit_code)` when there is nothing to run.
    pub fn parse() -> Result<Self, i32> {
        let base = Self::from_env(|key| env::var(key).ok());
        match Self::parse_from(base, env::args().skip(1)) {
            Ok(Parsed::Run(args)) => Ok(args),
            Ok(Parsed::Help) => {
                print_help();
                Err(0)
            }
            Ok(Parsed::Version) => {
                print_version();
                Err(0)
            }
            Err(msg) => {
                eprintln!("❌ {msg}");
                eprintln!("   Run with --help for usage.");
                Err(2)
            }
        }
    }

    /// Defaults, with `ANDROID_SERIAL` and `ADB_IMPL` applied.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut args = Self::default();
        if let Some(serial) = lookup("ANDROID_SERIAL").filter(|s| !s.trim().is_empty()) {
            args.serial = Some(serial.trim().to_string());
        }
        if let Some(imp) = lookup("ADB_IMPL").filter(|i| AdbBackend::IMPL_NAMES.contains(&i.as_str())) {
            args.adb_impl = imp;
        }
        args
    }

    /// Apply command-line flags (program name already skipped) on top of `base`.
    pub fn parse_from<I, S>(base: Self, argv: I) -> Result<Parsed, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = base;

        for arg in argv {
            let arg = arg.as_ref();
            if arg == "--help" || arg == "-h" {
                return Ok(Parsed::Help);
            } else if arg == "--version" || arg == "-v" {
                return Ok(Parsed::Version);
            } else if arg == "--debug" {
                args.debug_mode = true;
            } else if arg == "--json" {
                args.json = true;
            } else if arg == "--usb" {
                args.mode = Mode::Usb;
            } else if arg == "--list" || arg == "-l" {
                args.mode = Mode::List;
            } else if arg == "--no-poll" {
                args.poll = false;
            } else if let Some(val) = arg.strip_prefix("--serial=") {
                if val.is_empty() {
                    return Err("Empty --serial value".to_string());
                }
                args.serial = Some(val.to_string());
            } else if let Some(val) = arg.strip_prefix("--port=") {
                args.port = match val.parse::<u16>() {
                    Ok(port) if port > 0 => port,
                    _ => return Err(format!("Invalid port value: {val}")),
                };
            } else if let Some(val) = arg.strip_prefix("--interface=") {
                if val.is_empty() {
                    return Err("Empty --interface value".to_string());
                }
                args.interface = val.to_string();
            } else if let Some(val) = arg.strip_prefix("--settle=") {
                args.settle_secs = parse_number(val, "settle")?;
            } else if let Some(val) = arg.strip_prefix("--timeout=") {
                args.timeout_secs = parse_number(val, "timeout")?;
            } else if let Some(val) = arg.strip_prefix("--poll-interval=") {
                args.poll_interval_ms = parse_number(val, "poll interval")?;
                if args.poll_interval_ms == 0 {
                    return Err("Poll interval must be at least 1ms".to_string());
                }
            } else if let Some(rest) = arg.strip_prefix("--impl=") {
                if !AdbBackend::IMPL_NAMES.contains(&rest) {
                    return Err(format!("Unknown impl '{rest}', expected 'shell' or 'rust'"));
                }
                args.adb_impl = rest.to_string();
            } else if let Some(val) = arg.strip_prefix("--adb=") {
                if val.is_empty() {
                    return Err("Empty --adb value".to_string());
                }
                args.adb_path = PathBuf::from(val);
            } else {
                return Err(format!("Unknown argument: {arg}"));
            }
        }

        Ok(Parsed::Run(args))
    }

    pub fn readiness(&self) -> ReadinessPolicy {
        let settle = Duration::from_secs(self.settle_secs);
        if self.poll {
            ReadinessPolicy::polling(
                settle,
                Duration::from_millis(self.poll_interval_ms),
                Duration::from_secs(self.timeout_secs),
            )
        } else {
            ReadinessPolicy::fixed(settle)
        }
    }

    pub fn switch_options(&self) -> SwitchOptions {
        SwitchOptions {
            serial: self.serial.clone(),
            port: self.port,
            interface: self.interface.clone(),
            readiness: self.readiness(),
        }
    }
}

fn parse_number(val: &str, what: &str) -> Result<u64, String> {
    val.parse::<u64>()
        .map_err(|_| format!("Invalid {what} value: {val}"))
}

fn print_version() {
    println!(
        "ADB Wi-Fi v{} (c) {} Vigor Solutions",
        env!("APP_VERSION_DISPLAY"),
        env!("APP_BUILD_YEAR")
    );
}

fn print_help() {
    println!("📶 ADB Wi-Fi - move a USB-attached Android device to ADB over Wi-Fi");
    println!();
    println!("USAGE:");
    println!("    adb-wifi [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    (no flags)           Switch the attached device to tcpip:5555 and connect over Wi-Fi");
    println!("    --serial=<serial>    Device to switch (default: $ANDROID_SERIAL, else the only USB device)");
    println!("    --port=N             TCP port for adbd to listen on (default: 5555)");
    println!("    --interface=NAME     Device network interface to read the address from (default: wlan0)");
    println!("    --settle=N           Seconds to wait after 'adb tcpip' (default: 3)");
    println!("    --timeout=N          Seconds to keep polling for an address after settling (default: 10)");
    println!("    --poll-interval=MS   Milliseconds between address polls (default: 500)");
    println!("    --no-poll            Look for the address once after settling");
    println!("    --usb                Switch the device back to USB debugging");
    println!("    --list, -l           List attached devices");
    println!("    --impl=<shell|rust>  ADB implementation (default: shell, or $ADB_IMPL)");
    println!("                         The shell implementation requires the ADB tool to be installed.");
    println!("    --adb=PATH           adb binary for the shell implementation (default: adb)");
    println!("    --json               Print the result as JSON; progress goes to stderr");
    println!("    --debug              Enable debug logging (RUST_LOG overrides)");
    println!("    --help, -h           Show this help message");
    println!("    --version, -v        Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    adb-wifi");
    println!("    adb-wifi --serial=1d36d8f1 --port=5556");
    println!("    adb-wifi --impl=rust --json");
    println!("    adb-wifi --usb");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(argv: &[&str]) -> Args {
        match Args::parse_from(Args::default(), argv.iter().copied()) {
            Ok(Parsed::Run(args)) => args,
            other => panic!("Expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_no_arguments_is_default_switch() {
        let args = run(&[]);
        assert_eq!(args, Args::default());
        assert_eq!(args.mode, Mode::Wifi);
        assert_eq!(args.port, 5555);
        assert_eq!(args.interface, "wlan0");

        let opts = args.switch_options();
        assert_eq!(opts.serial, None);
        assert_eq!(opts.readiness, ReadinessPolicy::default());
    }

    #[test]
    fn test_all_value_flags() {
        let args = run(&[
            "--serial=R58M123ABC",
            "--port=5556",
            "--interface=eth0",
            "--settle=1",
            "--timeout=20",
            "--poll-interval=250",
            "--impl=rust",
            "--adb=/opt/platform-tools/adb",
            "--json",
            "--debug",
        ]);
        assert_eq!(args.serial.as_deref(), Some("R58M123ABC"));
        assert_eq!(args.port, 5556);
        assert_eq!(args.interface, "eth0");
        assert_eq!(args.adb_impl, "rust");
        assert_eq!(args.adb_path, PathBuf::from("/opt/platform-tools/adb"));
        assert!(args.json);
        assert!(args.debug_mode);
        assert_eq!(
            args.readiness(),
            ReadinessPolicy::polling(
                Duration::from_secs(1),
                Duration::from_millis(250),
                Duration::from_secs(20)
            )
        );
    }

    #[test]
    fn test_no_poll_gives_fixed_wait() {
        let args = run(&["--no-poll", "--settle=5"]);
        assert_eq!(args.readiness(), ReadinessPolicy::fixed(Duration::from_secs(5)));
    }

    #[test]
    fn test_modes() {
        assert_eq!(run(&["--usb"]).mode, Mode::Usb);
        assert_eq!(run(&["--list"]).mode, Mode::List);
        assert_eq!(run(&["-l"]).mode, Mode::List);
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(Args::parse_from(Args::default(), ["--help"]), Ok(Parsed::Help));
        assert_eq!(Args::parse_from(Args::default(), ["-v"]), Ok(Parsed::Version));
    }

    #[test]
    fn test_invalid_values() {
        for bad in [
            "--port=0",
            "--port=70000",
            "--port=abc",
            "--settle=-1",
            "--timeout=soon",
            "--poll-interval=0",
            "--impl=usb",
            "--serial=",
            "--bogus",
        ] {
            assert!(
                Args::parse_from(Args::default(), [bad]).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_env_defaults_and_flag_override() {
        let base = Args::from_env(|key| match key {
            "ANDROID_SERIAL" => Some("1d36d8f1".to_string()),
            "ADB_IMPL" => Some("rust".to_string()),
            _ => None,
        });
        assert_eq!(base.serial.as_deref(), Some("1d36d8f1"));
        assert_eq!(base.adb_impl, "rust");

        match Args::parse_from(base, ["--serial=R58M123ABC", "--impl=shell"]) {
            Ok(Parsed::Run(args)) => {
                assert_eq!(args.serial.as_deref(), Some("R58M123ABC"));
                assert_eq!(args.adb_impl, "shell");
            }
            other => panic!("Expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_env_ignores_blank_and_unknown_values() {
        let base = Args::from_env(|key| match key {
            "ANDROID_SERIAL" => Some("  ".to_string()),
            "ADB_IMPL" => Some("usb".to_string()),
            _ => None,
        });
        assert_eq!(base.serial, None);
        assert_eq!(base.adb_impl, "shell");
    }
}
