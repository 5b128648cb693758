use clap::{Parser, Subcommand};
use password_encoder::stats::StatsReport;

#[derive(Parser)]
#[command(name = "encoder-cli")]
#[command(about = "Client for the password encoder service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:12345")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a password and print the id of its digest
    Hash { password: String },
    /// Fetch the digest stored under an id
    Get { id: u64 },
    /// Show submission statistics
    Stats,
    /// Ask the server to drain and stop
    Shutdown,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Hash { password } => {
            let res = client
                .post(format!("{}/hash", cli.url))
                .form(&[("password", password)])
                .send()
                .await?;
            print_text(res).await?;
        }
        Commands::Get { id } => {
            let res = client.get(format!("{}/hash/{}", cli.url, id)).send().await?;
            print_text(res).await?;
        }
        Commands::Stats => {
            let res = client.get(format!("{}/stats", cli.url)).send().await?;
            if !res.status().is_success() {
                return print_text(res).await;
            }
            let stats: StatsReport = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Shutdown => {
            let res = client.post(format!("{}/shutdown", cli.url)).send().await?;
            print_text(res).await?;
        }
    }

    Ok(())
}

async fn print_text(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if status.is_success() {
        print!("{}", text);
    } else {
        eprintln!("Error: server returned status {}", status);
        eprint!("{}", text);
    }
    Ok(())
}
