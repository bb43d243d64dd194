//! Terminal client for Rogue AI game rooms.
//!
//! Creates or joins a room, prints lobby, game and board updates as they
//! arrive and sends prompt commands back to the server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin rogueai-client -- --create
//! cargo run --bin rogueai-client -- -r ABC123
//! cargo run --bin rogueai-client -- -r ABC123 --socket-url ws://127.0.0.1:8080
//! ```

use clap::Parser;

use rogueai_client::{
    ClientConfig,
    terminal::{RoomTarget, run_client},
};
use rogueai_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "rogueai-client")]
#[command(about = "Terminal client for Rogue AI game rooms", long_about = None)]
struct Args {
    /// Code of the room to join
    #[arg(short = 'r', long, conflicts_with = "create", required_unless_present = "create")]
    room: Option<String>,

    /// Create a new room and join it
    #[arg(long)]
    create: bool,

    /// WebSocket endpoint of the game server
    #[arg(long, env = "ROGUEAI_SOCKET_URL", default_value = rogueai_client::config::DEFAULT_SOCKET_URL)]
    socket_url: String,

    /// HTTP API base URL of the game server
    #[arg(long, env = "ROGUEAI_API_URL", default_value = rogueai_client::config::DEFAULT_API_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = ClientConfig::default()
        .with_socket_url(args.socket_url)
        .with_api_url(args.api_url);
    let target = match args.room {
        Some(code) => RoomTarget::Join(code),
        None => RoomTarget::Create,
    };

    if let Err(e) = run_client(config, target).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
