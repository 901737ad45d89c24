//! Relay server binary
//!
//! Run with: roomcast [BIND_ADDR]
//!
//! The listening port comes from the `PORT` environment variable (default
//! 8080); an explicit BIND_ADDR argument overrides it entirely.
//!
//! Examples:
//!   roomcast                      # binds to 0.0.0.0:8080 (or $PORT)
//!   roomcast localhost            # binds to 127.0.0.1:8080
//!   roomcast 127.0.0.1:9000       # binds to 127.0.0.1:9000

use std::net::SocketAddr;

use roomcast::{RelayServer, ServerConfig};

/// Parse a bind address from a command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:8080
/// - "localhost:9000" -> 127.0.0.1:9000
/// - "127.0.0.1" -> 127.0.0.1:8080
/// - "0.0.0.0:9000" -> 0.0.0.0:9000
fn parse_bind_addr(arg: &str, default_port: u16) -> Result<SocketAddr, String> {
    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: roomcast [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:$PORT, PORT defaults to 8080)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  roomcast                      # binds to 0.0.0.0:8080");
    eprintln!("  PORT=9000 roomcast            # binds to 0.0.0.0:9000");
    eprintln!("  roomcast localhost:9000       # binds to 127.0.0.1:9000");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roomcast=info".parse()?),
        )
        .init();

    let mut config = ServerConfig::from_env();

    if let Some(addr_str) = args.get(1) {
        match parse_bind_addr(addr_str, config.bind_addr.port()) {
            Ok(addr) => config = config.bind(addr),
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }

    println!(
        "WebSocket relay listening on ws://{}",
        config.bind_addr
    );

    let server = RelayServer::new(config);

    server.run_until(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
