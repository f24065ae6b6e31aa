use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "rides-cli")]
#[command(about = "Command-line client for the carpool matching service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered driver offers
    Drivers,
    /// Find drivers near a pickup point
    SearchProximity {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, default_value_t = 1)]
        seats: u32,
        /// Requested departure, epoch seconds. Defaults to now.
        #[arg(long)]
        time: Option<i64>,
        #[arg(long)]
        max_distance_km: Option<f64>,
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Find rides between two cities
    SearchCity {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long, default_value_t = 1)]
        seats: u32,
    },
    /// Reserve seats on a driver's offer
    Lock {
        driver_id: String,
        #[arg(long, default_value_t = 1)]
        seats: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Drivers => {
            let res = client.get(format!("{}/drivers", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::SearchProximity {
            lat,
            lon,
            seats,
            time,
            max_distance_km,
            top_n,
        } => {
            let requested_time = match time {
                Some(t) => t,
                None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64,
            };
            let mut body = json!({
                "location": { "lat": lat, "lon": lon },
                "requested_time": requested_time,
                "seats_needed": seats,
            });
            if let Some(km) = max_distance_km {
                body["max_distance_km"] = json!(km);
            }
            if let Some(n) = top_n {
                body["top_n"] = json!(n);
            }
            let res = client
                .post(format!("{}/matches/proximity", cli.url))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::SearchCity { from, to, seats } => {
            let res = client
                .post(format!("{}/matches/city-pair", cli.url))
                .json(&json!({ "from": from, "to": to, "seats": seats }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Lock { driver_id, seats } => {
            let res = client
                .post(format!("{}/drivers/{}/seats/lock", cli.url, driver_id))
                .json(&json!({ "seats": seats }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
