// Tests for the bridge layer that don't need a device attached
// Focus: backend selection, error classification, error text

#[cfg(test)]
mod bridge_tests {
    use super::super::{AdbBackend, AdbBridge, AdbError};
    use std::net::SocketAddrV4;
    use std::time::Duration;

    // ============================================================
    // BACKEND SELECTION TESTS
    // ============================================================

    #[test]
    fn test_rust_backend_needs_no_binary() {
        let backend = AdbBackend::from_impl_name("rust", "/nonexistent/adb")
            .expect("rust backend connects lazily");
        assert_eq!(backend.impl_name(), "rust");
    }

    #[test]
    fn test_shell_backend_missing_binary() {
        let result = AdbBackend::from_impl_name("shell", "/nonexistent/path/to/adb");
        match result {
            Err(AdbError::AdbNotFound { path }) => {
                assert_eq!(path.to_str(), Some("/nonexistent/path/to/adb"));
            }
            Err(other) => panic!("Expected AdbNotFound, got {other}"),
            Ok(_) => panic!("Expected AdbNotFound, got a backend"),
        }
    }

    #[test]
    fn test_impl_names() {
        assert_eq!(AdbBackend::IMPL_NAMES, ["shell", "rust"]);
    }

    // ============================================================
    // ERROR CLASSIFICATION TESTS
    // ============================================================

    #[test]
    fn test_device_selection_errors() {
        assert!(AdbError::NoDevices.is_device_selection());
        assert!(
            AdbError::MultipleDevices {
                serials: vec!["a".into(), "b".into()]
            }
            .is_device_selection()
        );
        assert!(
            AdbError::DeviceNotReady {
                serial: "a".into(),
                state: "unauthorized".into()
            }
            .is_device_selection()
        );
        assert!(
            !AdbError::AddressDiscoveryFailed {
                interface: "wlan0".into(),
                attempts: 1,
                waited: Duration::ZERO,
            }
            .is_device_selection()
        );
    }

    #[test]
    fn test_error_display() {
        let err = AdbError::MultipleDevices {
            serials: vec!["1d36d8f1".into(), "R58M123ABC".into()],
        };
        let text = err.to_string();
        assert!(text.contains("1d36d8f1, R58M123ABC"));
        assert!(text.contains("--serial"));

        let err = AdbError::AddressDiscoveryFailed {
            interface: "wlan0".into(),
            attempts: 3,
            waited: Duration::from_secs(1),
        };
        assert!(err.to_string().starts_with("Address discovery failed"));
        assert!(err.to_string().contains("wlan0"));

        let endpoint: SocketAddrV4 = "10.0.0.7:5555".parse().unwrap();
        let err = AdbError::ConnectFailed {
            endpoint,
            message: "Connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "Could not connect to 10.0.0.7:5555: Connection refused"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_command_failed_prefers_stderr() {
        use std::os::unix::process::ExitStatusExt;
        use std::process::{ExitStatus, Output};

        let output = Output {
            status: ExitStatus::from_raw(1 << 8),
            stdout: b"ignored\n".to_vec(),
            stderr: b"error: device 'xyz' not found\n".to_vec(),
        };
        match AdbError::from_output("adb -s xyz tcpip 5555", &output) {
            AdbError::CommandFailed {
                command,
                code,
                stderr,
            } => {
                assert_eq!(command, "adb -s xyz tcpip 5555");
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "error: device 'xyz' not found");
            }
            other => panic!("Expected CommandFailed, got {other}"),
        }

        let output = Output {
            status: ExitStatus::from_raw(1 << 8),
            stdout: b"error: no devices/emulators found\n".to_vec(),
            stderr: Vec::new(),
        };
        assert!(
            AdbError::from_output("adb usb", &output)
                .to_string()
                .contains("no devices/emulators found")
        );
    }
}
