use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use serde_json::Value;
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Parser)]
#[command(name = "price-cli")]
#[command(about = "Command-line client for the price lookup service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search products by name
    Search {
        query: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show the change history
    History,
    /// Stay connected and print every live-update notice
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Search { query, limit } => {
            let mut params = vec![("q", query)];
            if let Some(limit) = limit {
                params.push(("limite", limit.to_string()));
            }
            let res = client
                .get(format!("{}/api/productos/buscar", cli.url))
                .query(&params)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::History => {
            let res = client.get(format!("{}/api/historial", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Watch => watch(&cli.url).await?,
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn watch(base: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ws_url = format!("{}/ws", base.replacen("http", "ws", 1));
    let (mut socket, _) = connect_async(ws_url.as_str()).await?;
    eprintln!("Connected to {}", ws_url);

    while let Some(frame) = socket.next().await {
        match frame? {
            Message::Text(text) => println!("{}", text.as_str()),
            Message::Close(_) => break,
            _ => {}
        }
    }

    eprintln!("Connection closed");
    Ok(())
}
