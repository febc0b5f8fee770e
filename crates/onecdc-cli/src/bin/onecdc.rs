use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use onecdc_cli::summary;
use onecdc_core::{polyline, TravelMode};
use onecdc_routes::{
    compute_route_view, AbortHandle, FetchOptions, RouteView, RouteViewRequest, RoutesClient,
    RoutesConfig,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan and inspect OneCDC shopping routes", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a route from a navigation payload
    Plan {
        /// JSON file with the cart's navigation payload
        #[arg(long)]
        payload: PathBuf,

        /// Override the payload's transport mode (walking, driving, transit)
        #[arg(long)]
        mode: Option<TravelMode>,

        /// Routes API key
        #[arg(long, env = "ROUTES_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Routes API base URL
        #[arg(long, env = "ROUTES_API_URL")]
        api_url: Option<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode an encoded polyline into lat,lng lines
    Decode {
        encoded: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("onecdc_cli=info".parse()?))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Plan {
            payload,
            mode,
            api_key,
            api_url,
            json,
        } => plan(payload, mode, api_key, api_url, json).await,
        Command::Decode { encoded } => decode(&encoded),
    }
}

async fn plan(
    payload: PathBuf,
    mode: Option<TravelMode>,
    api_key: Option<String>,
    api_url: Option<String>,
    json: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(&payload)
        .with_context(|| format!("reading {}", payload.display()))?;
    let mut request = RouteViewRequest::from_json(&text)
        .with_context(|| format!("parsing {}", payload.display()))?;
    if let Some(mode) = mode {
        request.transport_mode = mode;
    }

    let mut config = RoutesConfig::from_env();
    if api_key.is_some() {
        config.api_key = api_key;
    }
    if let Some(api_url) = api_url {
        config.api_url = api_url;
    }
    if config.api_key.is_none() {
        tracing::warn!("No Routes API key; legs will be straight-line estimates");
    }

    let client = RoutesClient::new(&config)?;
    let options = FetchOptions::from(&config);

    let (handle, signal) = AbortHandle::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.abort();
        }
    });

    let view = match compute_route_view(&client, &options, &request, &signal).await {
        Ok(view) => view,
        Err(_) => bail!("interrupted"),
    };

    match view {
        RouteView::Ready(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", summary::render(&result));
            }
            Ok(())
        }
        RouteView::RedirectToCart { reason } => bail!("nothing to route: {}", reason),
    }
}

fn decode(encoded: &str) -> Result<()> {
    let points = polyline::decode(encoded.trim())?;
    for point in points {
        println!("{:.5},{:.5}", point.lat, point.lng);
    }
    Ok(())
}
