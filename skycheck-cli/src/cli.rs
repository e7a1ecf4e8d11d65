use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use skycheck_core::{
    Config, Coordinates, FetchError, LatestQuery, Outcome, WeatherClient, WeatherQuery,
    WeatherReport,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "skycheck",
    version,
    about = "Current weather conditions for a place or coordinates",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub lookup: LookupArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and optional home coordinates.
    Configure,

    /// Read queries from stdin, one per line; a newer line cancels a pending lookup.
    Interactive {
        /// Print each result as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Place name or "lat, lon" pair.
    #[arg(conflicts_with_all = ["here", "lat"])]
    pub query: Option<String>,

    /// Use the home coordinates from the config file.
    #[arg(long, conflicts_with = "lat")]
    pub here: bool,

    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl LookupArgs {
    fn resolve_query(&self, config: &Config) -> anyhow::Result<String> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Ok(WeatherQuery::from(Coordinates::new(lat, lon)).to_string());
        }
        if self.here {
            return Ok(WeatherQuery::from(config.home_coordinates()?).to_string());
        }
        match &self.query {
            Some(q) => Ok(q.clone()),
            None => bail!("Nothing to look up.\nHint: pass a place name, --here, or --lat/--lon."),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Interactive { json }) => {
                let client = WeatherClient::from_config(&Config::load()?)?;
                interactive(client, json).await
            }
            None => {
                let config = Config::load()?;
                let query = self.lookup.resolve_query(&config)?;
                let client = WeatherClient::from_config(&config)?;

                let report = client.fetch_current(&query).await.map_err(into_user_error)?;
                print_report(&report, self.lookup.json)
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let latitude = inquire::CustomType::<f64>::new("Home latitude (Esc to skip):")
        .with_error_message("Please type a number, e.g. 42.98")
        .prompt_skippable()
        .context("Failed to read latitude")?;

    if let Some(latitude) = latitude {
        let longitude = inquire::CustomType::<f64>::new("Home longitude:")
            .with_error_message("Please type a number, e.g. -81.25")
            .prompt()
            .context("Failed to read longitude")?;
        config.home = Some(Coordinates::new(latitude, longitude));
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn interactive(client: WeatherClient, json: bool) -> anyhow::Result<()> {
    let (session, mut deliveries) = LatestQuery::new(Arc::new(client));
    let mut session = Some(session);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line(), if session.is_some() => {
                match line.context("Failed to read stdin")? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        if let Some(s) = session.as_mut() {
                            s.submit(line);
                        }
                    }
                    // EOF: let the pending lookup finish, then the channel closes.
                    None => {
                        if let Some(s) = session.take() {
                            s.close();
                        }
                    }
                }
            }
            Some(delivery) = deliveries.recv() => match delivery.outcome {
                Outcome::Completed(Ok(report)) => print_report(&report, json)?,
                Outcome::Completed(Err(err)) => eprintln!("{}", into_user_error(err)),
                Outcome::Superseded => {}
            },
            else => break,
        }
    }

    Ok(())
}

/// The core has already logged the cause; the user only gets the short message.
fn into_user_error(err: FetchError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

fn print_report(report: &WeatherReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
