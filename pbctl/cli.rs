mod error;

use clap::{Parser, Subcommand};
use error::App;
use futures_util::{SinkExt, StreamExt};
use playbridge::config::DEFAULT_PORT;
use playbridge::protocol::Command;
use serde::Serialize;
use serde_json::{json, Value};
use std::process;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type StdResult<T> = std::result::Result<T, App>;

const RESPONSE_TIMEOUT_SECS: u64 = 5;

#[derive(Parser)]
#[command(
    name = "pbctl",
    about = "Control a running playbridge player.",
    version = "1.0.0"
)]
struct Cli {
    #[arg(long, global = true, default_value = "localhost", help = "playbridge host")]
    host: String,

    #[arg(short, long, global = true, default_value_t = DEFAULT_PORT, help = "playbridge port")]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Toggle between playing and paused")]
    PlayPause,

    #[command(about = "Play the next track")]
    Next,

    #[command(about = "Play the previous track")]
    Previous,

    #[command(about = "Skip forward")]
    Forward,

    #[command(about = "Skip backward")]
    Backward,

    #[command(about = "Print the current transcription")]
    Transcription,

    #[command(about = "Check that playbridge answers heartbeats")]
    Heartbeat,

    #[command(about = "Send a raw command and print the response")]
    Send(SendCommand),

    #[command(about = "Run the control channel test suite")]
    Test,

    #[command(about = "Start playbridge")]
    Start,
}

#[derive(Parser)]
struct SendCommand {
    #[arg(help = "Command name, e.g. play_pause")]
    name: String,
}

#[derive(Serialize)]
struct Request<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<&'a str>,
    timestamp: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl<'a> Request<'a> {
    fn command(name: &'a str) -> Self {
        Self {
            kind: "command",
            command: Some(name),
            timestamp: now_seconds(),
            data: Some(json!({})),
        }
    }

    fn heartbeat() -> Self {
        Self {
            kind: "heartbeat",
            command: None,
            timestamp: now_seconds(),
            data: None,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn now_seconds() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

struct Controller {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Controller {
    async fn connect(host: &str, port: u16) -> StdResult<Self> {
        let (ws, _) = connect_async(format!("ws://{host}:{port}")).await?;
        Ok(Self { ws })
    }

    // `None` sends a heartbeat
    async fn request(&mut self, command: Option<&str>) -> StdResult<Value> {
        let request = command.map_or_else(Request::heartbeat, Request::command);
        self.ws
            .send(Message::Text(serde_json::to_string(&request)?))
            .await?;
        let label = command.unwrap_or("heartbeat").to_string();
        timeout(
            Duration::from_secs(RESPONSE_TIMEOUT_SECS),
            self.wait_for_reply(command),
        )
        .await
        .map_err(|_| App::Timeout(label, RESPONSE_TIMEOUT_SECS))?
    }

    async fn wait_for_reply(&mut self, command: Option<&str>) -> StdResult<Value> {
        while let Some(message) = self.ws.next().await {
            let Message::Text(text) = message? else {
                continue;
            };
            let reply: Value = serde_json::from_str(&text)?;
            if is_reply_to(&reply, command) {
                return Ok(reply);
            }
        }
        Err(App::Closed)
    }
}

fn is_reply_to(reply: &Value, command: Option<&str>) -> bool {
    match command {
        None => reply["type"] == "heartbeat_response",
        Some(name) => reply["type"] == "response" && reply["command"] == name,
    }
}

#[tokio::main]
async fn main() -> StdResult<()> {
    let cli = Cli::parse();
    let (host, port) = (cli.host.as_str(), cli.port);
    match cli.command {
        Commands::PlayPause => run_command(host, port, Command::PlayPause).await,
        Commands::Next => run_command(host, port, Command::Next).await,
        Commands::Previous => run_command(host, port, Command::Previous).await,
        Commands::Forward => run_command(host, port, Command::Forward).await,
        Commands::Backward => run_command(host, port, Command::Backward).await,
        Commands::Transcription => run_command(host, port, Command::GetTranscription).await,
        Commands::Heartbeat => handle_heartbeat(host, port).await,
        Commands::Send(send_cmd) => handle_send(host, port, &send_cmd.name).await,
        Commands::Test => {
            if !run_test_suite(host, port).await {
                process::exit(1);
            }
            Ok(())
        }
        Commands::Start => start_playbridge(host, port).await,
    }
}

async fn run_command(host: &str, port: u16, command: Command) -> StdResult<()> {
    let mut controller = Controller::connect(host, port).await?;
    let reply = controller.request(Some(command.name())).await?;
    ensure_success(command.name(), &reply)?;
    println!("{}", describe(command, &reply));
    Ok(())
}

fn ensure_success(label: &str, reply: &Value) -> StdResult<()> {
    if reply["success"] == true {
        return Ok(());
    }
    let error = reply["error"].as_str().unwrap_or("unknown error");
    Err(App::CommandFailed(label.to_string(), error.to_string()))
}

fn describe(command: Command, reply: &Value) -> String {
    match command {
        Command::PlayPause => {
            if reply["isPlaying"] == true {
                "Playing".to_string()
            } else {
                "Paused".to_string()
            }
        }
        Command::Next | Command::Previous => format!(
            "Now playing {}",
            reply["currentFile"].as_str().unwrap_or("?")
        ),
        Command::Forward | Command::Backward => format!(
            "Position {:.1}s",
            reply["currentTime"].as_f64().unwrap_or_default()
        ),
        Command::GetTranscription => reply["transcription"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
    }
}

async fn handle_heartbeat(host: &str, port: u16) -> StdResult<()> {
    let mut controller = Controller::connect(host, port).await?;
    let reply = controller.request(None).await?;
    println!("playbridge is alive (timestamp {})", reply["timestamp"]);
    Ok(())
}

async fn handle_send(host: &str, port: u16, name: &str) -> StdResult<()> {
    if name.trim().is_empty() {
        return Err(App::InvalidInput("command name is empty".to_string()));
    }
    let mut controller = Controller::connect(host, port).await?;
    let reply = controller.request(Some(name)).await?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    ensure_success(name, &reply)
}

/// Exercise every command once. Returns whether all checks passed.
async fn run_test_suite(host: &str, port: u16) -> bool {
    println!("playbridge control channel test suite");
    println!("{}", "=".repeat(50));
    println!("Testing ws://{host}:{port}");
    println!("{}", "=".repeat(50));

    let mut controller = match Controller::connect(host, port).await {
        Ok(controller) => Some(controller),
        Err(e) => {
            eprintln!("Connection error: {e}");
            None
        }
    };

    let checks = [
        ("Heartbeat", None),
        ("Play/Pause", Some(Command::PlayPause)),
        ("Next", Some(Command::Next)),
        ("Previous", Some(Command::Previous)),
        ("Forward", Some(Command::Forward)),
        ("Backward", Some(Command::Backward)),
        ("Get Transcription", Some(Command::GetTranscription)),
    ];

    let mut results = vec![("Connection", controller.is_some())];
    for (label, command) in checks {
        let passed = match controller.as_mut() {
            Some(controller) => check(controller, command).await,
            None => false,
        };
        results.push((label, passed));
    }

    println!("{}", "=".repeat(50));
    println!("Test Results Summary:");
    for (label, passed) in &results {
        let status = if *passed { "✓ PASS" } else { "✗ FAIL" };
        println!("  {label}: {status}");
    }
    let passed = results.iter().filter(|(_, passed)| *passed).count();
    println!("Overall: {passed}/{} tests passed", results.len());
    passed == results.len()
}

async fn check(controller: &mut Controller, command: Option<Command>) -> bool {
    let reply = match controller.request(command.map(Command::name)).await {
        Ok(reply) => reply,
        Err(e) => {
            eprintln!("  {e}");
            return false;
        }
    };
    let Some(command) = command else {
        return true;
    };
    if let Err(e) = ensure_success(command.name(), &reply) {
        eprintln!("  {e}");
        return false;
    }
    match command {
        Command::GetTranscription => reply["transcription"]
            .as_str()
            .is_some_and(|text| !text.is_empty()),
        _ => true,
    }
}

async fn start_playbridge(host: &str, port: u16) -> StdResult<()> {
    if Controller::connect(host, port).await.is_ok() {
        println!("playbridge is already running");
        return Ok(());
    }

    let current_exe_path = std::env::current_exe()?;
    let exe_dir = current_exe_path.parent().ok_or_else(|| {
        App::InvalidInput("Failed to get the directory of the executable".to_string())
    })?;
    let playbridge_path = exe_dir.join("playbridge");

    if !playbridge_path.exists() {
        return Err(App::InvalidInput(
            "playbridge executable not found in the same directory".to_string(),
        ));
    }

    let child = tokio::process::Command::new(playbridge_path).spawn()?;
    println!("playbridge started, process ID: {:?}", child.id());
    Ok(())
}
