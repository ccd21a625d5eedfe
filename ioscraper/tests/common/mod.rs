//! Scripted IOS exec shell shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ioscraper::error::{ChannelError, TransportError};
use ioscraper::{
    Connector, Error, PacingConfig, Result, Session, SessionBuilder, ShellChannel, SshConfig,
};

pub const ENABLE_SECRET: &str = "en4ble";

/// Just enough of an IOS exec shell to drive a session.
pub struct Device {
    pub hostname: String,
    pub enabled: bool,
    pub enable_secret: String,
    awaiting_secret: bool,
    /// Ask for the secret again after a wrong one, up to `secret_attempts` tries.
    pub reprompt: bool,
    pub secret_attempts: usize,
    attempts: usize,
    /// Print typed input back, secrets included.
    pub echo: bool,
    /// Body printed when a pending `copy` is confirmed.
    pending_copy: Option<String>,
    pub save_reply: String,
    pub update_reply: String,
    pub responses: HashMap<String, String>,
    /// Print nothing at all, not even a prompt.
    pub silent: bool,
    pub closed: bool,
    /// Every line the session wrote, without the newline.
    pub received: Vec<String>,
    output: Vec<u8>,
}

impl Device {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            enabled: false,
            enable_secret: ENABLE_SECRET.to_string(),
            awaiting_secret: false,
            reprompt: false,
            secret_attempts: 3,
            attempts: 0,
            echo: false,
            pending_copy: None,
            save_reply: "Building configuration...\r\n[OK]".to_string(),
            update_reply: String::new(),
            responses: HashMap::new(),
            silent: false,
            closed: false,
            received: Vec::new(),
            output: Vec::new(),
        }
    }

    fn prompt(&self) -> String {
        format!("{}{}", self.hostname, if self.enabled { "#" } else { ">" })
    }

    fn print(&mut self, text: &str) {
        if !self.silent {
            self.output.extend_from_slice(text.as_bytes());
        }
    }

    fn line(&mut self, line: &str) {
        self.received.push(line.to_string());

        if self.awaiting_secret {
            if self.echo {
                self.print(line);
            }
            self.secret(line);
            return;
        }

        if line.is_empty() {
            let body = self.pending_copy.take().unwrap_or_default();
            let prompt = self.prompt();
            self.print(&format!("\r\n{}\r\n{}", body, prompt));
            return;
        }

        if line == "enable" {
            if self.enabled {
                let prompt = self.prompt();
                self.print(&format!("enable\r\n{}", prompt));
            } else {
                self.awaiting_secret = true;
                self.attempts = 0;
                self.print("enable\r\nPassword: ");
            }
            return;
        }

        if let Some(target) = line.strip_prefix("copy running-config ") {
            self.pending_copy = Some(self.save_reply.clone());
            self.print(&format!("{}\r\nDestination filename [{}]? ", line, target));
            return;
        }

        if line.starts_with("copy ") {
            self.pending_copy = Some(self.update_reply.clone());
            self.print(&format!("{}\r\nDestination filename [running-config]? ", line));
            return;
        }

        let body = if line.starts_with("terminal ") {
            String::new()
        } else {
            self.responses.get(line).cloned().unwrap_or_else(|| {
                "              ^\r\n% Invalid input detected at '^' marker.\r\n".to_string()
            })
        };
        let prompt = self.prompt();
        self.print(&format!("{}\r\n{}{}", line, body, prompt));
    }

    fn secret(&mut self, line: &str) {
        if line == self.enable_secret {
            self.awaiting_secret = false;
            self.enabled = true;
            let prompt = self.prompt();
            self.print(&format!("\r\n{}", prompt));
            return;
        }

        if !self.reprompt {
            self.awaiting_secret = false;
            let prompt = self.prompt();
            self.print(&format!("\r\n% Access denied\r\n\r\n{}", prompt));
            return;
        }

        self.attempts += 1;
        if self.attempts < self.secret_attempts {
            self.print("\r\nPassword: ");
        } else {
            self.awaiting_secret = false;
            let prompt = self.prompt();
            self.print(&format!("\r\n% Bad secrets\r\n\r\n{}", prompt));
        }
    }
}

pub struct ScriptedShell {
    device: Arc<Mutex<Device>>,
}

impl ShellChannel for ScriptedShell {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let mut device = self.device.lock().unwrap();
        if device.closed {
            return Err(TransportError::Disconnected.into());
        }
        let text = String::from_utf8_lossy(data).into_owned();
        for line in text.split_inclusive('\n') {
            device.line(line.trim_end_matches('\n'));
        }
        Ok(())
    }

    async fn drain(&mut self) -> Result<Vec<u8>> {
        let mut device = self.device.lock().unwrap();
        let data = std::mem::take(&mut device.output);
        if device.closed && data.is_empty() {
            return Err(ChannelError::Closed.into());
        }
        Ok(data)
    }

    async fn close(&mut self) -> Result<()> {
        self.device.lock().unwrap().closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.device.lock().unwrap().closed
    }
}

pub enum Behavior {
    Accept,
    Reject(fn() -> Error),
    Hang,
}

pub struct ScriptedConnector {
    device: Arc<Mutex<Device>>,
    behavior: Behavior,
}

impl Connector for ScriptedConnector {
    type Channel = ScriptedShell;

    async fn connect(&self, _config: &SshConfig) -> Result<ScriptedShell> {
        match self.behavior {
            Behavior::Accept => Ok(ScriptedShell {
                device: Arc::clone(&self.device),
            }),
            Behavior::Reject(make) => Err(make()),
            Behavior::Hang => std::future::pending().await,
        }
    }
}

/// Connector wired to `device`, plus a handle to inspect it.
pub fn scripted(device: Device, behavior: Behavior) -> (ScriptedConnector, Arc<Mutex<Device>>) {
    let device = Arc::new(Mutex::new(device));
    let connector = ScriptedConnector {
        device: Arc::clone(&device),
        behavior,
    };
    (connector, device)
}

/// Builder with test credentials and no pacing delay.
pub fn builder(host: &str) -> SessionBuilder {
    SessionBuilder::new(host)
        .username("admin")
        .password("secret")
        .enable_secret(ENABLE_SECRET)
        .pacing(PacingConfig::fixed(Duration::ZERO))
}

pub fn session_with(
    device: Device,
    behavior: Behavior,
) -> (Session<ScriptedConnector>, Arc<Mutex<Device>>) {
    let (connector, device) = scripted(device, behavior);
    let session = builder("10.255.138.120").build_with(connector).unwrap();
    (session, device)
}

pub async fn logged_in(device: Device) -> (Session<ScriptedConnector>, Arc<Mutex<Device>>) {
    let (mut session, device) = session_with(device, Behavior::Accept);
    session.login().await.unwrap();
    (session, device)
}

pub fn received(device: &Arc<Mutex<Device>>) -> Vec<String> {
    device.lock().unwrap().received.clone()
}
