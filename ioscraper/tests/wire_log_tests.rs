//! Wire capture under the `ioscraper::wire` log target.

mod common;

use std::sync::{Mutex, Once};

use ioscraper::channel::{REDACTED, WIRE_TARGET};
use log::{LevelFilter, Log, Metadata, Record};

use common::{Behavior, Device, ENABLE_SECRET, builder, scripted};

const SOURCE_URI: &str = "ftp://u:pw@h/x";
const USERINFO: &str = "u:pw";

/// Keeps every wire record. Tests tell theirs apart by the host label.
struct Capture;

static RECORDS: Mutex<Vec<String>> = Mutex::new(Vec::new());
static INIT: Once = Once::new();

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.target() == WIRE_TARGET {
            RECORDS.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

fn install() {
    INIT.call_once(|| {
        log::set_logger(&Capture).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
}

/// Wire lines logged by the session whose host and hostname start with `label`.
fn wire_lines(label: &str) -> Vec<String> {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|line| line.starts_with(label))
        .cloned()
        .collect()
}

fn echoing_device(hostname: &str) -> Device {
    let mut device = Device::new(hostname);
    device.echo = true;
    device
}

#[tokio::test]
async fn test_debug_log_masks_secrets() {
    install();
    let (connector, device) = scripted(echoing_device("wire-masked"), Behavior::Accept);
    let mut session = builder("wire-masked.example.net")
        .debug(true)
        .build_with(connector)
        .unwrap();

    session.login().await.unwrap();
    session.escalate().await.unwrap();
    session.update_config(SOURCE_URI).await.unwrap();
    session.logoff().await.unwrap();

    // The device really did see and echo both secrets.
    let sent = device.lock().unwrap().received.clone();
    assert!(sent.iter().any(|line| line == ENABLE_SECRET));
    assert!(sent.iter().any(|line| line.contains(USERINFO)));

    let lines = wire_lines("wire-masked");
    assert!(lines.iter().any(|line| line.contains(" SENT: ")));
    assert!(lines.iter().any(|line| line.contains(" RECV: ")));
    assert!(lines.iter().any(|line| line.contains(REDACTED)));
    assert!(lines.iter().any(|line| line.contains("@h/x")));
    for line in &lines {
        assert!(!line.contains(ENABLE_SECRET), "leaked enable secret: {line}");
        assert!(!line.contains(USERINFO), "leaked URI credentials: {line}");
    }
}

#[tokio::test]
async fn test_log_secrets_leaves_wire_unmasked() {
    install();
    let (connector, _device) = scripted(echoing_device("wire-clear"), Behavior::Accept);
    let mut session = builder("wire-clear.example.net")
        .debug(true)
        .log_secrets(true)
        .build_with(connector)
        .unwrap();

    session.login().await.unwrap();
    session.escalate().await.unwrap();
    session.update_config(SOURCE_URI).await.unwrap();
    session.logoff().await.unwrap();

    let lines = wire_lines("wire-clear");
    assert!(lines.iter().any(|line| line.contains(ENABLE_SECRET)));
    assert!(lines.iter().any(|line| line.contains(USERINFO)));
}

#[tokio::test]
async fn test_no_wire_log_without_debug() {
    install();
    let (connector, _device) = scripted(echoing_device("wire-quiet"), Behavior::Accept);
    let mut session = builder("wire-quiet.example.net")
        .build_with(connector)
        .unwrap();

    session.login().await.unwrap();
    session.escalate().await.unwrap();
    session.update_config(SOURCE_URI).await.unwrap();
    assert!(wire_lines("wire-quiet").is_empty());

    session.set_debug(true);
    session.send_command("show clock").await.unwrap();
    let lines = wire_lines("wire-quiet");
    assert!(lines.iter().any(|line| line.contains("show clock")));

    session.logoff().await.unwrap();
}
