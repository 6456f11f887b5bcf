use std::net::{IpAddr, SocketAddr};

use clap::{Parser, Subcommand};
use serde_json::Value;

use header_ipware::ipware::{HeaderIpWare, IpWareOptions};

#[derive(Parser)]
#[command(name = "ipware-cli")]
#[command(about = "Resolve client IPs offline or query a running header-ipware server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a client IP from headers given on the command line
    Resolve {
        /// Request header as "Name: value" (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Connection peer address, used as a last resort
        #[arg(long)]
        peer: Option<IpAddr>,

        /// Comma-separated header precedence (natural names)
        #[arg(long, value_delimiter = ',')]
        precedence: Option<Vec<String>>,

        /// Take the rightmost address of a chain as the client
        #[arg(long)]
        rightmost: bool,

        /// Expected number of proxies
        #[arg(long, allow_negative_numbers = true)]
        proxy_count: Option<i64>,

        /// Comma-separated trusted proxy prefixes
        #[arg(long, value_delimiter = ',')]
        proxy_list: Option<Vec<String>>,

        /// Require the proxy route to match exactly
        #[arg(long)]
        strict: bool,
    },
    /// Ask a running server for the caller's address
    Query {
        #[arg(short, long, default_value = "http://localhost:8000")]
        url: String,

        /// Extra request header as "Name: value" (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in {raw:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            headers,
            peer,
            precedence,
            rightmost,
            proxy_count,
            proxy_list,
            strict,
        } => {
            let options = IpWareOptions {
                precedence,
                leftmost: !rightmost,
                proxy_count,
                proxy_list,
            };
            let ipware = HeaderIpWare::new(options)?;
            let peer = peer.map(|ip| SocketAddr::new(ip, 0));
            let resolution = ipware.get_client_ip_from_parts(&headers, peer, strict);
            println!("{}", serde_json::to_string_pretty(&resolution)?);
        }
        Commands::Query { url, headers } => {
            let client = reqwest::Client::new();
            let mut req = client.get(&url);
            for (name, value) in &headers {
                req = req.header(name.as_str(), value.as_str());
            }
            print_response(req.send().await?).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
