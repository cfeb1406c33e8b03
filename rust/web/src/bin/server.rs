//! Lesson server binary
//!
//! Usage: cargo run -p coup-web --bin coup-web-server -- --port 8080

use coup_web::{LogFormat, ServerConfig, WebServer};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug)]
struct ServerArgs {
    host: String,
    port: u16,
    static_dir: Option<PathBuf>,
    ttl_secs: Option<u64>,
    log_format: LogFormat,
}

enum Parsed {
    Run(ServerArgs),
    Help,
}

fn parse_args(args: &[String]) -> Result<Parsed, String> {
    let mut parsed = ServerArgs {
        host: "127.0.0.1".to_string(),
        port: 8080,
        static_dir: None,
        ttl_secs: None,
        log_format: LogFormat::Pretty,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{name} requires a value"))
        };
        match arg.as_str() {
            "--host" | "-h" => parsed.host = value("--host")?,
            "--port" | "-p" => {
                parsed.port = value("--port")?
                    .parse()
                    .map_err(|_| "invalid port number".to_string())?
            }
            "--static-dir" | "-d" => parsed.static_dir = Some(PathBuf::from(value("--static-dir")?)),
            "--ttl-secs" => {
                let secs: u64 = value("--ttl-secs")?
                    .parse()
                    .map_err(|_| "invalid session TTL".to_string())?;
                if secs == 0 {
                    return Err("--ttl-secs must be >= 1".to_string());
                }
                parsed.ttl_secs = Some(secs);
            }
            "--log-json" => parsed.log_format = LogFormat::Json,
            "--help" => return Ok(Parsed::Help),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    Ok(Parsed::Run(parsed))
}

/// First existing candidate, else `static` under the working dir (created on start).
fn default_static_dir() -> std::io::Result<PathBuf> {
    let current_dir = std::env::current_dir()?;
    let candidates = [
        current_dir.join("rust").join("web").join("static"),
        current_dir.join("static"),
    ];
    Ok(candidates
        .iter()
        .find(|p| p.exists())
        .cloned()
        .unwrap_or_else(|| current_dir.join("static")))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            print_help();
            return Ok(());
        }
        Err(message) => {
            eprintln!("Error: {message}");
            print_help();
            std::process::exit(2);
        }
    };

    if let Err(err) = coup_web::init_logging(args.log_format) {
        eprintln!("Warning: logging disabled: {err}");
    }

    let static_path = match args.static_dir {
        Some(dir) => dir,
        None => default_static_dir()?,
    };

    let mut config = ServerConfig::new(args.host, args.port, static_path);
    if let Some(secs) = args.ttl_secs {
        config = config.with_session_ttl(Duration::from_secs(secs));
    }

    tracing::info!(
        host = config.host(),
        port = config.port(),
        static_dir = %config.static_dir().display(),
        session_ttl_secs = config.session_ttl().as_secs(),
        "starting coup lesson server"
    );

    let handle = WebServer::new(config)?.start().await?;
    println!("Server running at http://{}", handle.address());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down");
    handle.shutdown().await?;
    Ok(())
}

fn print_help() {
    println!("Coup lesson server");
    println!();
    println!("Usage: coup-web-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>           Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>           Port to bind to (default: 8080)");
    println!("  --static-dir, -d <DIR>      Static files directory");
    println!("  --ttl-secs <SECS>           Idle road session lifetime (default: 1800)");
    println!("  --log-json                  Emit logs as JSON lines");
    println!("  --help                      Show this help message");
}
