//! Terminal output: aligned tables, JSON, and CSV.

use std::io;

use anyhow::Result;
use clap::ValueEnum;
use csv::WriterBuilder;
use serde::Serialize;

use aasaan::models::{category_label, Place};
use aasaan::store::Stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

const NAME_WIDTH: usize = 32;

pub fn print_places(places: &[&Place], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!(
                "{:<12} {:<NAME_WIDTH$} {:<18} {:<22} {:>9} {:>9}",
                "ID", "NAME", "CATEGORY", "STATUS", "LAT", "LON"
            );
            for place in places {
                println!(
                    "{:<12} {:<NAME_WIDTH$} {:<18} {:<22} {:>9.4} {:>9.4}",
                    truncate(&place.id, 12),
                    truncate(&place.name, NAME_WIDTH),
                    truncate(&place.category, 18),
                    place.accessibility_status.label(),
                    place.latitude,
                    place.longitude,
                );
            }
            println!("{} places", places.len());
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(io::stdout(), places)?;
            println!();
        }
        OutputFormat::Csv => {
            let mut writer = WriterBuilder::new().from_writer(io::stdout());
            writer.write_record([
                "id",
                "name",
                "name_local",
                "category",
                "latitude",
                "longitude",
                "accessibility_status",
                "address",
            ])?;
            for place in places {
                writer.write_record([
                    place.id.as_str(),
                    place.name.as_str(),
                    place.name_local.as_deref().unwrap_or(""),
                    place.category.as_str(),
                    &place.latitude.to_string(),
                    &place.longitude.to_string(),
                    place.accessibility_status.as_str(),
                    place.address.as_deref().unwrap_or(""),
                ])?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct NearbyRow<'a> {
    #[serde(flatten)]
    place: &'a Place,
    distance_km: f64,
}

pub fn print_nearby(hits: &[(&Place, f64)], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!(
                "{:>9} {:<NAME_WIDTH$} {:<18} {:<22}",
                "DIST", "NAME", "CATEGORY", "STATUS"
            );
            for (place, distance) in hits {
                println!(
                    "{:>6.2} km {:<NAME_WIDTH$} {:<18} {:<22}",
                    distance,
                    truncate(&place.name, NAME_WIDTH),
                    truncate(&place.category, 18),
                    place.accessibility_status.label(),
                );
            }
            println!("{} places", hits.len());
        }
        OutputFormat::Json => {
            let rows: Vec<NearbyRow> = hits
                .iter()
                .map(|(place, distance)| NearbyRow {
                    place,
                    distance_km: *distance,
                })
                .collect();
            serde_json::to_writer_pretty(io::stdout(), &rows)?;
            println!();
        }
        OutputFormat::Csv => {
            let mut writer = WriterBuilder::new().from_writer(io::stdout());
            writer.write_record(["id", "name", "category", "accessibility_status", "distance_km"])?;
            for (place, distance) in hits {
                writer.write_record([
                    place.id.as_str(),
                    place.name.as_str(),
                    place.category.as_str(),
                    place.accessibility_status.as_str(),
                    &format!("{distance:.3}"),
                ])?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

pub fn print_stats(stats: &Stats, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("Total places:          {}", stats.total);
            println!("Accessible:            {}", stats.accessible);
            println!("Partially accessible:  {}", stats.partially_accessible);
            println!("Not accessible:        {}", stats.not_accessible);
            println!("Unknown:               {}", stats.unknown);
            if !stats.by_category.is_empty() {
                println!();
                println!("By category:");
                for (category, count) in &stats.by_category {
                    println!("  {:<24} {:>5}  {}", category, count, category_label(category));
                }
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(io::stdout(), stats)?;
            println!();
        }
        OutputFormat::Csv => {
            let mut writer = WriterBuilder::new().from_writer(io::stdout());
            writer.write_record(["metric", "count"])?;
            writer.write_record(["total", &stats.total.to_string()])?;
            writer.write_record(["accessible", &stats.accessible.to_string()])?;
            writer.write_record([
                "partially_accessible",
                &stats.partially_accessible.to_string(),
            ])?;
            writer.write_record(["not_accessible", &stats.not_accessible.to_string()])?;
            writer.write_record(["unknown", &stats.unknown.to_string()])?;
            for (category, count) in &stats.by_category {
                writer.write_record([format!("category/{category}"), count.to_string()])?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

pub fn print_categories(categories: &[String]) {
    for category in categories {
        println!("{:<24} {}", category, category_label(category));
    }
}

/// Full details for one place, printed after a map selection.
pub fn print_place_details(place: &Place) {
    println!();
    println!("{}", place_details(place));
    println!();
}

/// The details card as text, covering everything the place record carries.
fn place_details(place: &Place) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(place.name.clone());
    if let Some(local) = &place.name_local {
        lines.push(local.clone());
    }
    lines.push(format!("  id:        {}", place.id));
    lines.push(format!("  category:  {}", category_label(&place.category)));
    lines.push(format!("  status:    {}", place.accessibility_status.label()));
    if let Some(address) = &place.address {
        lines.push(format!("  address:   {address}"));
    }
    lines.push(format!(
        "  position:  {:.4}, {:.4}",
        place.latitude, place.longitude
    ));

    let features = &place.accessibility;
    let mut available: Vec<&str> = Vec::new();
    if features.ramp_present {
        available.push("ramp");
    }
    if features.step_free_entrance {
        available.push("step-free entrance");
    }
    if features.tactile_paving {
        available.push("tactile paving");
    }
    if features.audio_signage {
        available.push("audio signage");
    }
    if features.braille_signage {
        available.push("braille signage");
    }
    if features.staff_assistance_available {
        available.push("staff assistance");
    }
    if !available.is_empty() {
        lines.push(format!("  features:  {}", available.join(", ")));
    }
    lines.push(format!(
        "  restroom:  {}",
        features.accessible_restroom.as_str()
    ));
    lines.push(format!("  lighting:  {}", features.lighting_level.as_str()));
    lines.push(format!("  noise:     {}", features.noise_level.as_str()));
    if let Some(notes) = &place.notes {
        lines.push(format!("  notes:     {notes}"));
    }
    if let Some(photo) = &place.photo_url {
        lines.push(format!("  photo:     {photo}"));
    }
    if let Some(updated) = place.last_updated() {
        lines.push(format!("  updated:   {}", updated.format("%-d %b %Y")));
    } else if !place.updated_at.is_empty() {
        lines.push(format!("  updated:   {}", place.updated_at));
    }
    lines.push(format!("  source:    {}", place.source.label()));
    lines.join("\n")
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("छत्रपती शिवाजी टर्मिनस", 8), "छत्रपती…");
        assert_eq!(truncate("exactly-ten", 11), "exactly-ten");
    }

    #[test]
    fn test_place_details_cover_environment_and_provenance() {
        let place: Place = serde_json::from_value(serde_json::json!({
            "id": "pl-001",
            "name": "Chhatrapati Shivaji Terminus",
            "category": "railway_station",
            "latitude": 18.9398,
            "longitude": 72.8355,
            "ramp_present": true,
            "accessible_restroom": "partial",
            "lighting_level": "high",
            "noise_level": "low",
            "photo_url": "https://example.org/cst.jpg",
            "accessibility_status": "partially_accessible",
            "updated_at": "2024-03-02T09:15:00Z",
            "source": "user"
        }))
        .unwrap();

        let details = place_details(&place);
        assert!(details.contains("features:  ramp"));
        assert!(details.contains("restroom:  partial"));
        assert!(details.contains("lighting:  high"));
        assert!(details.contains("noise:     low"));
        assert!(details.contains("photo:     https://example.org/cst.jpg"));
        assert!(details.contains("updated:   2 Mar 2024"));
        assert!(details.contains("source:    Community"));
    }
}
