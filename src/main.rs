use adb_wifi::adb::{AdbBackend, AdbBridge, AdbError, Device};
use adb_wifi::args::{Args, Mode};
use adb_wifi::switcher::NetworkSwitcher;
use log::debug;
use serde::Serialize;
use std::io::Write;

fn main() {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(code) => std::process::exit(code),
    };
    init_logging(args.debug_mode);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(&args)) {
        eprintln!("❌ {e}");
        if e.is_device_selection() {
            eprintln!("💡 Run 'adb-wifi --list' to see attached devices.");
        }
        std::process::exit(1);
    }
}

fn init_logging(debug_mode: bool) {
    let default_filter = if debug_mode { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

async fn run(args: &Args) -> Result<(), AdbError> {
    let backend = AdbBackend::from_impl_name(&args.adb_impl, args.adb_path.clone())?;
    debug!("Using ADB implementation '{}'", backend.impl_name());
    let switcher = NetworkSwitcher::new(backend, args.switch_options());
    debug!("{:?}", switcher.options());

    // Keep stdout clean for the JSON document
    let mut progress: Box<dyn Write> = if args.json {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };

    match args.mode {
        Mode::Wifi => {
            let report = switcher.enable_network_debugging(&mut progress).await?;
            if args.json {
                print_json(&report)?;
            }
        }
        Mode::Usb => {
            let serial = switcher.revert_to_usb(&mut progress).await?;
            if args.json {
                print_json(&serde_json::json!({ "serial": serial, "mode": "usb" }))?;
            }
        }
        Mode::List => {
            let devices = switcher.list_devices().await?;
            if args.json {
                print_json(&devices)?;
            } else {
                print_devices(&devices, switcher.bridge().impl_name());
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AdbError> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{text}");
    Ok(())
}

fn print_devices(devices: &[Device], impl_name: &str) {
    if devices.is_empty() {
        println!("❌ No devices found (impl='{impl_name}')");
        return;
    }
    println!("📱 Attached devices (impl='{impl_name}'):");
    for device in devices {
        let link = if device.is_network() { "wifi" } else { "usb" };
        let transport = device
            .transport_id
            .as_deref()
            .map(|id| format!(" transport_id:{id}"))
            .unwrap_or_default();
        println!("    {:<28} {:<14} {link}{transport}", device.name, device.state);
    }
}
