//! Show commands: log in to an IOS device and capture command output
//!
//! Runs each `--cmd` in order and appends the raw output to
//! `<dest>/cis_<host>_<day-of-year>.log` under a timestamped header.
//! Prints a JSON result on stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example show_commands -- --host 10.255.138.120 --user admin --password secret \
//!     --enable secret --dest /tmp --cmd "show version" --cmd "show inventory"
//! ```
//!
//! Set `--debug` to log every sent and received chunk (RUST_LOG=ioscraper::wire=info).

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use serde_json::json;

use ioscraper::{Session, SessionBuilder};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let result = match run(&args).await {
        Ok(path) => json!({
            "changed": false,
            "content": "Success.",
            "dest": path.display().to_string(),
        }),
        Err(msg) => json!({ "failed": true, "msg": msg }),
    };

    println!("{}", result);
    if result.get("failed").is_some() {
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<PathBuf, String> {
    let path = output_path(&args.dest, &args.host);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|_| "Error opening output file.".to_string())?;

    let mut builder = SessionBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .timeout(Duration::from_secs(args.timeout))
        .debug(args.debug);

    if let Some(password) = &args.password {
        builder = builder.password(password);
    } else if let Some(key_path) = &args.key {
        builder = builder.private_key(key_path);
    } else {
        return Err("Must provide either --password or --key".to_string());
    }
    if let Some(enable) = &args.enable {
        builder = builder.enable_secret(enable);
    }

    let mut session = builder.build().map_err(|e| e.to_string())?;

    if session.login().await.is_err() {
        return Err(failure_message(&session));
    }

    if session.escalate().await.is_err() {
        let _ = session.logoff().await;
        return Err("Enable password specified and an error occured entering enable mode.".to_string());
    }

    let commands: Vec<&str> = args.commands.iter().map(String::as_str).collect();
    let transcripts = match session.run_commands(&commands).await {
        Ok(transcripts) => transcripts,
        Err(_) => {
            let _ = session.logoff().await;
            return Err("Error issuing commands.".to_string());
        }
    };

    let header = format!(
        " ### {} {} ###\r\n",
        Local::now().format("%a %b %e %H:%M:%S %Y"),
        session.hostname()
    );
    let written = file
        .write_all(header.as_bytes())
        .and_then(|_| {
            transcripts
                .iter()
                .try_for_each(|t| file.write_all(t.raw.as_bytes()))
        });

    let _ = session.logoff().await;
    written.map_err(|e| format!("Error writing output file: {}", e))?;
    Ok(path)
}

fn output_path(dest: &Path, host: &str) -> PathBuf {
    dest.join(format!("cis_{}_{}.log", host, Local::now().format("%j")))
}

fn failure_message<C: ioscraper::Connector>(session: &Session<C>) -> String {
    session
        .last_error()
        .unwrap_or("No connection could be made to target machine")
        .to_string()
}

/// Simple argument parser
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    enable: Option<String>,
    dest: PathBuf,
    commands: Vec<String>,
    timeout: u64,
    debug: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 22u16;
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = None;
        let mut key = None;
        let mut enable = None;
        let mut dest = env::temp_dir();
        let mut commands = Vec::new();
        let mut timeout = 4u64;
        let mut debug = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(22);
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                }
                "--key" | "-k" => {
                    i += 1;
                    if i < args.len() {
                        key = Some(PathBuf::from(&args[i]));
                    }
                }
                "--enable" | "-e" => {
                    i += 1;
                    if i < args.len() {
                        enable = Some(args[i].clone());
                    }
                }
                "--dest" | "-d" => {
                    i += 1;
                    if i < args.len() {
                        dest = PathBuf::from(&args[i]);
                    }
                }
                "--cmd" | "-c" => {
                    i += 1;
                    if i < args.len() {
                        commands.push(args[i].clone());
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(4);
                    }
                }
                "--debug" => debug = true,
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        if commands.is_empty() {
            commands.push("show version".to_string());
        }

        Self {
            host,
            port,
            user,
            password,
            key,
            enable,
            dest,
            commands,
            timeout,
            debug,
        }
    }

    fn print_help() {
        println!(
            r#"ioscraper show_commands example

USAGE:
    cargo run --example show_commands -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Target host [default: localhost]
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Username [default: $USER]
    -P, --password <PASS>    Password for authentication
    -k, --key <PATH>         Path to SSH private key
    -e, --enable <SECRET>    Enable secret, escalates before running commands
    -d, --dest <DIR>         Directory for the output file [default: temp dir]
    -c, --cmd <COMMAND>      Command to run, repeatable [default: show version]
    -t, --timeout <SECS>     Connection timeout [default: 4]
    --debug                  Log the wire conversation
    --help                   Print this help message
"#
        );
    }
}
