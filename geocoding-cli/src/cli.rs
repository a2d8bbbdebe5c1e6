use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use geocoding_core::{
    BoundingBox, Config, GeocodeClient, LngLat, ProximityFormat, ReqwestTransport,
};
use serde_json::Value;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geocode", version, about = "Mapbox geocoding CLI")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Per-invocation overrides of the stored configuration.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Access token to use instead of the configured one.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Bias results toward this point, as "lng,lat".
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub center: Option<LngLat>,

    /// Restrict results to "minLng,minLat,maxLng,maxLat".
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub bbox: Option<BoundingBox>,

    /// Send the center without the `proximity=` parameter name.
    #[arg(long, global = true)]
    pub bare_proximity: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively store the access token and search defaults.
    Configure,

    /// Geocode an address.
    Forward {
        address: String,

        /// Dataset, e.g. "mapbox.places" or "mapbox.places-permanent".
        #[arg(long)]
        dataset: Option<String>,
    },

    /// Look up addresses near a coordinate.
    #[command(allow_negative_numbers = true)]
    Reverse {
        lng: f64,
        lat: f64,

        #[arg(long)]
        dataset: Option<String>,
    },

    /// Print the request URL for an address without sending it.
    Url {
        address: String,

        #[arg(long)]
        dataset: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => crate::configure::run(),
            Command::Forward { address, dataset } => {
                let (cfg, client) = self.overrides.load()?;
                let dataset = dataset.as_deref().unwrap_or(cfg.dataset());
                let data = client.geocode(dataset, &address).await?;
                print_json(&data)
            }
            Command::Reverse { lng, lat, dataset } => {
                let (cfg, client) = self.overrides.load()?;
                let dataset = dataset.as_deref().unwrap_or(cfg.dataset());
                let data = client.reverse_geocode(dataset, lng, lat).await?;
                print_json(&data)
            }
            Command::Url { address, dataset } => {
                let (cfg, client) = self.overrides.load()?;
                let dataset = dataset.as_deref().unwrap_or(cfg.dataset());
                println!("{}", client.build_url(dataset, &address)?);
                Ok(())
            }
        }
    }
}

impl Overrides {
    fn load(&self) -> Result<(Config, GeocodeClient<ReqwestTransport>)> {
        let cfg = Config::load()?;
        let client = self.build_client(&cfg)?;
        Ok((cfg, client))
    }

    fn build_client(&self, cfg: &Config) -> Result<GeocodeClient<ReqwestTransport>> {
        let transport = match cfg.timeout() {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
            None => ReqwestTransport::new(),
        };

        let mut client = GeocodeClient::from_settings(cfg.client_settings(), transport);

        if let Some(token) = &self.token {
            client.set_access_token(token.clone());
        }
        if self.center.is_some() {
            client.set_search_center(self.center);
        }
        if self.bbox.is_some() {
            client.set_search_bounds(self.bbox);
        }
        if self.bare_proximity {
            client.set_proximity_format(ProximityFormat::Bare);
        }

        Ok(client)
    }
}

fn print_json(data: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}
