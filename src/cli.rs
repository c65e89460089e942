//! Command line interface

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use hotelfinder::api::{AppState, SearchResponse};
use hotelfinder::presentation::format_distance;
use hotelfinder::{
    AggregatorMode, Coordinate, Directions, DirectionsProvider, DistanceKind, HotelFinder,
    HotelFinderConfig, LocationParser, web,
};

#[derive(Parser)]
#[command(name = "hotelfinder")]
#[command(about = "Find hotels near a location")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API (and the widget assets, if configured)
    Serve {
        /// Address to bind, overrides the configuration
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on, overrides the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Search hotels near a place name, address or "lat,lng"
    Search {
        location: String,
        /// Search radius in meters
        #[arg(short, long)]
        radius: Option<u32>,
        /// Use generated sample hotels only
        #[arg(long)]
        synthetic: bool,
        /// Seed for repeatable sample data
        #[arg(long)]
        seed: Option<u64>,
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a directions link between two coordinates
    Directions {
        /// Start point as "lat,lng"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Coordinate,
        /// End point as "lat,lng"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        to: Coordinate,
        /// google or osm; defaults to the configured provider
        #[arg(long)]
        provider: Option<DirectionsProvider>,
    },
}

fn parse_coordinate(input: &str) -> std::result::Result<Coordinate, String> {
    LocationParser::parse_coordinates(input).map_err(|e| e.to_string())
}

impl Cli {
    /// Fold command line flags into the loaded configuration
    fn apply_overrides(&self, config: &mut HotelFinderConfig) {
        match &self.command {
            Commands::Serve { host, port } => {
                if let Some(host) = host {
                    config.server.host.clone_from(host);
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
            }
            Commands::Search {
                synthetic, seed, ..
            } => {
                if *synthetic {
                    config.search.mode = AggregatorMode::Synthetic;
                }
                if seed.is_some() {
                    config.search.random_seed = *seed;
                }
            }
            Commands::Directions { .. } => {}
        }
    }

    pub async fn run(self, mut config: HotelFinderConfig) -> Result<()> {
        self.apply_overrides(&mut config);
        match self.command {
            Commands::Serve { .. } => serve(config).await,
            Commands::Search {
                location,
                radius,
                json,
                ..
            } => search(&config, &location, radius, json).await,
            Commands::Directions { from, to, provider } => {
                let finder = HotelFinder::from_config(&config)?;
                let directions = finder.directions(from, to, provider).await?;
                println!("🧭 {}", directions.directions_url);
                println!("📏 {}", describe_distance(&directions));
                Ok(())
            }
        }
    }
}

fn describe_distance(directions: &Directions) -> String {
    match (directions.distance_kind, directions.duration_minutes) {
        (DistanceKind::Road, Some(minutes)) => {
            format!("{} by road, about {minutes} min", directions.distance_text)
        }
        (DistanceKind::Road, None) => format!("{} by road", directions.distance_text),
        (DistanceKind::StraightLine, _) => format!("{} straight-line", directions.distance_text),
    }
}

async fn serve(config: HotelFinderConfig) -> Result<()> {
    let finder = HotelFinder::from_config(&config).context("Failed to set up hotel finder")?;
    let state = AppState::new(Arc::new(finder), config.google_api_key().is_some());
    let app = web::app(state, config.server.static_dir.as_deref());
    web::run(app, &config.server.host, config.server.port).await
}

async fn search(
    config: &HotelFinderConfig,
    location: &str,
    radius: Option<u32>,
    json: bool,
) -> Result<()> {
    let finder = HotelFinder::from_config(config)?;
    let results = finder
        .search(location, radius)
        .await
        .with_context(|| format!("Search for '{location}' failed"))?;
    let response = SearchResponse::from_results(results, finder.directions_provider());

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!(
        "📍 {} ({})",
        response.location.display_address,
        response.location.coordinate.format_coordinates()
    );
    if let Some(notice) = &response.notice {
        println!("⚠️  {notice}");
    }
    println!(
        "Found {} hotel(s) within {}:\n",
        response.hotels.len(),
        format_distance(f64::from(response.radius_meters) / 1000.0)
    );
    for hotel in &response.hotels {
        println!("{hotel}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("hotelfinder").chain(args.iter().copied()))
    }

    #[test]
    fn test_search_flags_override_config() {
        let cli = parse(&["search", "London", "--synthetic", "--seed", "3", "-r", "2000"]).unwrap();
        let mut config = HotelFinderConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.search.mode, AggregatorMode::Synthetic);
        assert_eq!(config.search.random_seed, Some(3));

        let Commands::Search {
            location, radius, ..
        } = cli.command
        else {
            panic!("expected search command");
        };
        assert_eq!(location, "London");
        assert_eq!(radius, Some(2000));
    }

    #[test]
    fn test_search_without_flags_keeps_config() {
        let cli = parse(&["search", "Paris"]).unwrap();
        let mut config = HotelFinderConfig::default();
        config.search.random_seed = Some(42);
        cli.apply_overrides(&mut config);
        assert_eq!(config.search.mode, AggregatorMode::Remote);
        assert_eq!(config.search.random_seed, Some(42));
    }

    #[test]
    fn test_serve_flags_override_config() {
        let cli = parse(&["serve", "--host", "127.0.0.1", "-p", "3000"]).unwrap();
        let mut config = HotelFinderConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_global_flags() {
        let cli = parse(&["search", "Rome", "--verbose", "--config", "custom.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_directions_arguments() {
        let cli = parse(&[
            "directions", "--from", "-33.8688,151.2093", "--to", "-33.87,151.21", "--provider", "osm",
        ])
        .unwrap();
        let Commands::Directions { from, to, provider } = cli.command else {
            panic!("expected directions command");
        };
        assert_eq!(from.lat, -33.8688);
        assert_eq!(to.lng, 151.21);
        assert_eq!(provider, Some(DirectionsProvider::OpenStreetMap));
    }

    #[test]
    fn test_invalid_coordinates_are_rejected() {
        assert!(parse(&["directions", "--from", "91,0", "--to", "0,0"]).is_err());
        assert!(parse(&["directions", "--from", "north", "--to", "0,0"]).is_err());
        assert!(parse(&["directions", "--from", "0,0", "--to", "0,0", "--provider", "bing"]).is_err());
    }

    #[test]
    fn test_parse_coordinate() {
        let coordinate = parse_coordinate("51.5074, -0.1278").unwrap();
        assert_eq!(coordinate.lat, 51.5074);
        assert_eq!(coordinate.lng, -0.1278);
        assert!(parse_coordinate("0,181").unwrap_err().contains("Invalid input"));
    }

    #[test]
    fn test_describe_distance() {
        let mut directions = Directions {
            directions_url: String::new(),
            distance_km: 5.3,
            distance_text: "5.3 km".to_string(),
            duration_minutes: None,
            distance_kind: DistanceKind::StraightLine,
        };
        assert_eq!(describe_distance(&directions), "5.3 km straight-line");

        directions.distance_kind = DistanceKind::Road;
        directions.duration_minutes = Some(17);
        assert_eq!(describe_distance(&directions), "5.3 km by road, about 17 min");
    }

    #[tokio::test]
    async fn test_run_directions() {
        let cli = parse(&["directions", "--from", "51.5,-0.12", "--to", "51.51,-0.13"]).unwrap();
        assert!(cli.run(HotelFinderConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_synthetic_search() {
        let cli = parse(&["search", "London", "--synthetic", "--seed", "3", "--json"]).unwrap();
        assert!(cli.run(HotelFinderConfig::default()).await.is_ok());
    }
}
