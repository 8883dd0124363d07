//! Command-line client for the accessibility map.
//!
//! Loads places from the backend API with a static-snapshot fallback,
//! answers queries over them, renders a terminal map, and submits
//! community contributions.

mod output;
mod term_map;

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use aasaan::client::ApiClient;
use aasaan::config::ApiConfig;
use aasaan::contributions::ContributionTracker;
use aasaan::map::{MapEvent, MapSync};
use aasaan::models::{
    AccessibilityStatus, ContributionData, GeoPoint, LevelSetting, PlaceFilters,
    RestroomAccessibility,
};
use aasaan::store::PlacesStore;

use output::OutputFormat;
use term_map::TerminalMap;

#[derive(Parser, Debug)]
#[command(name = "aasaan")]
#[command(about = "Community accessibility map client")]
#[command(version)]
struct Cli {
    /// Backend API base URL (env: AASAAN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Snapshot URL used when the backend is down (env: AASAAN_DATA_URL)
    #[arg(long, global = true)]
    data_url: Option<String>,

    /// Optional TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List places, optionally filtered
    Places {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Search places by name, local name or address
    Search {
        query: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List places within a radius of a point, closest first
    Nearby {
        #[arg(long)]
        lat: f64,

        #[arg(long)]
        lon: f64,

        /// Search radius in kilometres
        #[arg(long, default_value_t = 5.0)]
        radius_km: f64,

        #[arg(long, default_value_t = 20)]
        limit: usize,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Aggregate accessibility statistics
    Stats {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List the distinct place categories
    Categories,
    /// Render the filtered places on a terminal map
    Map {
        #[command(flatten)]
        filters: FilterArgs,

        /// Read place ids from stdin and focus them
        #[arg(long)]
        interactive: bool,
    },
    /// Submit a new place contribution
    Contribute(ContributeArgs),
    /// Check backend health
    Health,
    /// Print the static data export links
    Links,
}

/// Filter flags shared by the listing commands. Unset flags impose no
/// constraint.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Keep only these statuses (repeatable)
    #[arg(long = "status", value_parser = parse_status)]
    status: Vec<AccessibilityStatus>,

    /// Keep only these categories (repeatable)
    #[arg(long = "category")]
    category: Vec<String>,

    /// Require a ramp
    #[arg(long)]
    ramp: bool,

    /// Require a step-free entrance
    #[arg(long)]
    step_free: bool,

    /// Require an accessible restroom (any grading above none)
    #[arg(long)]
    restroom: bool,

    /// Require tactile paving
    #[arg(long)]
    tactile: bool,

    /// Require audio signage
    #[arg(long)]
    audio: bool,

    /// Require braille signage
    #[arg(long)]
    braille: bool,

    /// Require staff assistance
    #[arg(long)]
    staff: bool,
}

impl FilterArgs {
    fn to_filters(&self) -> PlaceFilters {
        PlaceFilters {
            accessibility_status: (!self.status.is_empty()).then(|| self.status.clone()),
            category: (!self.category.is_empty()).then(|| self.category.clone()),
            ramp_present: self.ramp.then_some(true),
            step_free_entrance: self.step_free.then_some(true),
            accessible_restroom: self.restroom.then_some(true),
            tactile_paving: self.tactile.then_some(true),
            audio_signage: self.audio.then_some(true),
            braille_signage: self.braille.then_some(true),
            staff_assistance_available: self.staff.then_some(true),
        }
    }
}

#[derive(Args, Debug)]
struct ContributeArgs {
    /// Place name
    #[arg(long)]
    name: String,

    /// Name in the local script
    #[arg(long)]
    name_local: Option<String>,

    /// Category key, e.g. railway_station
    #[arg(long)]
    category: String,

    #[arg(long)]
    lat: f64,

    #[arg(long)]
    lon: f64,

    #[arg(long)]
    address: Option<String>,

    /// Has a ramp
    #[arg(long)]
    ramp: bool,

    /// Has a step-free entrance
    #[arg(long)]
    step_free: bool,

    /// Restroom grading: none, partial or full
    #[arg(long, value_parser = parse_restroom, default_value = "none")]
    restroom: RestroomAccessibility,

    /// Has tactile paving
    #[arg(long)]
    tactile: bool,

    /// Has audio signage
    #[arg(long)]
    audio: bool,

    /// Has braille signage
    #[arg(long)]
    braille: bool,

    /// Lighting level: low, medium or high
    #[arg(long, value_parser = parse_level, default_value = "medium")]
    lighting: LevelSetting,

    /// Noise level: low, medium or high
    #[arg(long, value_parser = parse_level, default_value = "medium")]
    noise: LevelSetting,

    /// Staff assistance available
    #[arg(long)]
    staff: bool,

    #[arg(long)]
    notes: Option<String>,

    #[arg(long)]
    contributor_name: Option<String>,

    #[arg(long)]
    contributor_email: Option<String>,

    /// Existing place this contribution amends
    #[arg(long)]
    place_id: Option<String>,
}

impl ContributeArgs {
    fn into_data(self) -> ContributionData {
        let mut data = ContributionData {
            name: self.name,
            name_local: self.name_local,
            category: self.category,
            address: self.address,
            latitude: self.lat,
            longitude: self.lon,
            notes: self.notes,
            contributor_name: self.contributor_name,
            contributor_email: self.contributor_email,
            place_id: self.place_id,
            ..Default::default()
        };
        data.accessibility.ramp_present = self.ramp;
        data.accessibility.step_free_entrance = self.step_free;
        data.accessibility.accessible_restroom = self.restroom;
        data.accessibility.tactile_paving = self.tactile;
        data.accessibility.audio_signage = self.audio;
        data.accessibility.braille_signage = self.braille;
        data.accessibility.lighting_level = self.lighting;
        data.accessibility.noise_level = self.noise;
        data.accessibility.staff_assistance_available = self.staff;
        data
    }
}

fn parse_status(value: &str) -> Result<AccessibilityStatus, String> {
    AccessibilityStatus::ALL
        .iter()
        .copied()
        .find(|status| status.as_str() == value)
        .ok_or_else(|| {
            format!(
                "unknown status {value:?} (expected accessible, partially_accessible, \
                 not_accessible or unknown)"
            )
        })
}

fn parse_restroom(value: &str) -> Result<RestroomAccessibility, String> {
    match value {
        "none" => Ok(RestroomAccessibility::None),
        "partial" => Ok(RestroomAccessibility::Partial),
        "full" => Ok(RestroomAccessibility::Full),
        other => Err(format!(
            "unknown restroom grading {other:?} (expected none, partial or full)"
        )),
    }
}

fn parse_level(value: &str) -> Result<LevelSetting, String> {
    match value {
        "low" => Ok(LevelSetting::Low),
        "medium" => Ok(LevelSetting::Medium),
        "high" => Ok(LevelSetting::High),
        other => Err(format!(
            "unknown level {other:?} (expected low, medium or high)"
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ApiConfig::resolve(
        cli.api_url.clone(),
        cli.data_url.clone(),
        cli.config.as_deref(),
    )
    .context("Failed to resolve configuration")?;

    if config.api_base.starts_with('/') {
        warn!(
            "API base {:?} is site-relative; pass --api-url with a full origin",
            config.api_base
        );
    }

    let client = ApiClient::new(config);

    match cli.command {
        Command::Places { filters, format } => {
            let mut store = load_store(&client).await?;
            store.update_filters(filters.to_filters());
            output::print_places(&store.filtered_places(), format)?;
        }
        Command::Search { query, format } => {
            let store = load_store(&client).await?;
            output::print_places(&store.search(&query), format)?;
        }
        Command::Nearby {
            lat,
            lon,
            radius_km,
            limit,
            format,
        } => {
            let origin = GeoPoint { lat, lon };
            if !origin.is_valid() {
                anyhow::bail!("Origin ({lat}, {lon}) is outside the WGS84 range");
            }
            let store = load_store(&client).await?;
            output::print_nearby(&store.nearby(origin, radius_km, limit), format)?;
        }
        Command::Stats { format } => {
            let store = load_store(&client).await?;
            output::print_stats(&store.stats(), format)?;
        }
        Command::Categories => {
            let store = load_store(&client).await?;
            output::print_categories(&store.categories());
        }
        Command::Map {
            filters,
            interactive,
        } => {
            let mut store = load_store(&client).await?;
            store.update_filters(filters.to_filters());

            let screen = TerminalMap::new(72, 24);
            let (mut sync, events) = MapSync::new(screen.clone());
            sync.sync(&store);
            print!("{}", screen.render());

            if interactive {
                run_map_loop(&store, &mut sync, &events, &screen)?;
            }
        }
        Command::Contribute(args) => {
            let data = args.into_data();
            let mut tracker = ContributionTracker::new();
            let receipt = tracker
                .submit(&client, &data)
                .await
                .context("Failed to submit contribution")?;
            println!(
                "Contribution {} recorded for review (status: {:?})",
                receipt.id, receipt.status
            );
        }
        Command::Health => match client.health().await {
            Ok(report) => {
                println!("status: {}", report.status);
                if let Some(service) = report.service {
                    println!("service: {service}");
                }
            }
            Err(err) => {
                println!("status: unreachable ({err})");
            }
        },
        Command::Links => {
            let links = client.config().export_links();
            println!("json:    {}", links.json);
            println!("geojson: {}", links.geojson);
            println!("csv:     {}", links.csv);
        }
    }

    Ok(())
}

async fn load_store(client: &ApiClient) -> Result<PlacesStore> {
    let mut store = PlacesStore::new();
    store.load(client).await;
    if let Some(message) = store.error() {
        anyhow::bail!("{message}");
    }
    info!("Loaded {} places", store.places().len());
    Ok(store)
}

/// Read place ids from stdin, focusing each selected place on the map.
fn run_map_loop(
    store: &PlacesStore,
    sync: &mut MapSync<TerminalMap>,
    events: &std::sync::mpsc::Receiver<MapEvent>,
    screen: &TerminalMap,
) -> Result<()> {
    println!("Enter a place id to focus it (empty line to quit):");

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let id = line.trim();
        if id.is_empty() {
            break;
        }

        sync.activate_marker(id);
        match events.try_recv() {
            Ok(MapEvent::PlaceSelected(selected)) => {
                if let Some(place) = store.places().iter().find(|p| p.id == selected) {
                    output::print_place_details(place);
                    sync.focus(place);
                    print!("{}", screen.render());
                }
            }
            Err(_) => println!("No marker with id {id:?} on the map"),
        }
    }

    Ok(())
}
