use crate::output::read_dashboard;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a dashboard JSON file
pub fn validate_dashboard_file(file_path: &Path) -> Result<()> {
    println!("Validating dashboard: {}", file_path.display());

    let dashboard = read_dashboard(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    println!("✓ Valid dashboard JSON");
    println!("  Version: {}", dashboard.version);
    println!("  Generated: {}", dashboard.generated_at);
    println!("  Window: {} days @ {}", dashboard.days, dashboard.step);
    println!("  Threshold: {}", dashboard.threshold);
    println!("  Panels: {} ({} without data)", dashboard.panels.len(), dashboard.empty_panels());
    for panel in &dashboard.panels {
        println!("    {}", panel.summary());
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Viswall Dashboard Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string         - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string    - ISO 8601 timestamp");
        println!("  days: number            - Look-back window");
        println!("  step: string            - Prometheus step");
        println!("  threshold: number       - Share below which groups become 'Others'");
        println!("  panels: array");
        println!("    kind: 'stacked'       - timestamps, series[group,color,values], capacity, y_limit, merged");
        println!("    kind: 'bar'           - bars[group,label,color,value,capacity]");
        println!("    kind: 'no_data'       - title only");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Viswall v{}", env!("CARGO_PKG_VERSION"));
    println!("Dashboard Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Cluster usage dashboard data from Prometheus.");
}
