//! Snapshot command implementation.
//!
//! The snapshot command:
//! 1. Fetches usage and capacity series for every cluster
//! 2. Aligns them onto dense grids
//! 3. Assigns colors for the session
//! 4. Builds stacked (bucketed) and bar panels
//! 5. Writes the dashboard JSON

use super::models::SnapshotArgs;
use crate::aggregator::{
    align, bar_panel, check_group_names, stacked_panel, BarOptions, CapacityRecord, Panel,
};
use crate::output::{validate_path, write_dashboard, Dashboard};
use crate::palette::ColorRegistry;
use crate::parser::schema::DenseMatrix;
use crate::rpc::{PromSource, QueryWindow, Resource, UsageSource};
use crate::utils::config::{
    load_config, validate_threshold, DashboardConfig, DEFAULT_FILL_VALUE, OTHERS_GROUP,
};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

const MAX_DAYS: u32 = 365;

/// Aligned data of one cluster
struct ClusterData {
    name: String,
    accounts: DenseMatrix,
    nodes: DenseMatrix,
    nodes_capacity: CapacityRecord,
    /// `None` for clusters without GPU panel
    gpus: Option<(DenseMatrix, CapacityRecord)>,
}

/// Execute the snapshot command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid config file
/// * Reserved group names in the account data
/// * File write errors
///
/// Unreachable clusters are not errors; their panels read "no data".
pub fn execute_snapshot(args: SnapshotArgs) -> Result<()> {
    let start_time = Instant::now();

    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    let threshold = args.threshold.unwrap_or(config.threshold);

    let source = PromSource::new(&config).context("Failed to create Prometheus clients")?;
    let window = QueryWindow::new(args.days, args.step.clone());

    let dashboard = build_dashboard(&source, &config, &window, threshold)?;

    write_dashboard(&dashboard, &args.output).context("Failed to write dashboard JSON")?;
    info!("✓ Dashboard written to: {}", args.output.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("USAGE SUMMARY ({} days @ {})", dashboard.days, dashboard.step);
        println!("{}", "=".repeat(80));
        for panel in &dashboard.panels {
            println!("{}", panel.summary());
        }
        println!("{}", "=".repeat(80));
    }

    info!("Snapshot completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Fetch, align and assemble every panel of the wall
///
/// **Public** - takes any `UsageSource`, so it runs without a network
pub fn build_dashboard(
    source: &dyn UsageSource,
    config: &DashboardConfig,
    window: &QueryWindow,
    threshold: f64,
) -> Result<Dashboard> {
    let clusters: Vec<ClusterData> = config
        .clusters
        .keys()
        .map(|name| fetch_cluster(source, name, window, config.has_gpus(name)))
        .collect::<Result<_>>()?;

    let center_colors = ColorRegistry::build(
        clusters
            .iter()
            .flat_map(|c| c.accounts.values.keys().map(String::as_str))
            .chain(std::iter::once(OTHERS_GROUP)),
        &config.fixed_colors,
    );
    let node_colors = ColorRegistry::build(
        clusters.iter().flat_map(|c| {
            c.nodes_capacity
                .groups
                .keys()
                .chain(c.gpus.iter().flat_map(|(_, capacity)| capacity.groups.keys()))
                .map(String::as_str)
        }),
        &config.fixed_colors,
    );

    let cpu_options = BarOptions {
        hide: &config.hide_cpu,
        nicknames: &config.nicknames,
    };
    let gpu_options = BarOptions {
        hide: &config.hide_gpu,
        nicknames: &config.nicknames,
    };

    let mut panels: Vec<Panel> = Vec::new();
    for cluster in &clusters {
        let display = capitalize(&cluster.name);

        panels.push(stacked_panel(
            &format!("{} CPU Usage by Center", display),
            &cluster.accounts,
            &cluster.nodes_capacity,
            Some(threshold),
            &center_colors,
        ));
        panels.push(bar_panel(
            &format!("{} Current CPU Usage", display),
            &cluster.nodes,
            &cluster.nodes_capacity,
            cpu_options,
            &node_colors,
        ));
        if let Some((gpus, gpus_capacity)) = &cluster.gpus {
            panels.push(bar_panel(
                &format!("{} Current GPU Usage", display),
                gpus,
                gpus_capacity,
                gpu_options,
                &node_colors,
            ));
        }
    }

    for panel in panels.iter().filter(|p| !p.has_data()) {
        warn!("No data for panel '{}'", panel.title());
    }

    let dashboard = Dashboard::new(window.days, window.step.clone(), threshold, panels);
    info!(
        "Built {} panels ({} without data)",
        dashboard.panels.len(),
        dashboard.empty_panels()
    );

    Ok(dashboard)
}

fn fetch_cluster(
    source: &dyn UsageSource,
    name: &str,
    window: &QueryWindow,
    with_gpus: bool,
) -> Result<ClusterData> {
    info!("Fetching {} ...", name);

    let accounts = source.usage(name, "account", Resource::Cpus, window);
    check_group_names(&accounts)
        .with_context(|| format!("Account data of cluster {} cannot be bucketed", name))?;

    let nodes = source.usage(name, "nodes", Resource::Cpus, window);
    let nodes_capacity = source.capacity(name, "nodes", Resource::Cpus, window);

    let gpus = with_gpus.then(|| {
        let latest = window.latest();
        let usage = source.usage(name, "gputype", Resource::Gpus, &latest);
        let capacity = source.capacity(name, "gputype", Resource::Gpus, &latest);
        (
            align(&usage, DEFAULT_FILL_VALUE),
            CapacityRecord::from_matrix(align(&capacity, DEFAULT_FILL_VALUE)),
        )
    });

    debug!(
        "{}: {} accounts, {} node types, {} gpu types",
        name,
        accounts.len(),
        nodes.len(),
        gpus.as_ref().map_or(0, |(usage, _)| usage.group_count())
    );

    Ok(ClusterData {
        name: name.to_string(),
        accounts: align(&accounts, DEFAULT_FILL_VALUE),
        nodes: align(&nodes, DEFAULT_FILL_VALUE),
        nodes_capacity: CapacityRecord::from_matrix(align(&nodes_capacity, DEFAULT_FILL_VALUE)),
        gpus,
    })
}

/// Validate snapshot arguments
///
/// **Public** - can be called before execute_snapshot for early validation
pub fn validate_args(args: &SnapshotArgs) -> Result<()> {
    if args.days == 0 {
        anyhow::bail!("days must be greater than 0");
    }

    if args.days > MAX_DAYS {
        anyhow::bail!("days is too large (max {})", MAX_DAYS);
    }

    if !is_valid_step(&args.step) {
        anyhow::bail!("step must look like 30m, 1h or 1d (got '{}')", args.step);
    }

    if let Some(threshold) = args.threshold {
        validate_threshold(threshold)?;
    }

    validate_path(&args.output)?;

    Ok(())
}

/// `<digits><unit>` with unit one of s, m, h, d, w
pub fn is_valid_step(step: &str) -> bool {
    let Some(unit) = step.chars().last() else {
        return false;
    };
    let digits = &step[..step.len() - unit.len_utf8()];

    matches!(unit, 's' | 'm' | 'h' | 'd' | 'w')
        && !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && digits.chars().any(|c| c != '0')
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&SnapshotArgs::default()).is_ok());
    }

    #[test]
    fn test_validate_args_zero_days() {
        let args = SnapshotArgs {
            days: 0,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_too_many_days() {
        let args = SnapshotArgs {
            days: 400,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_bad_threshold() {
        let args = SnapshotArgs {
            threshold: Some(1.5),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_empty_output() {
        let args = SnapshotArgs {
            output: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_is_valid_step() {
        assert!(is_valid_step("1h"));
        assert!(is_valid_step("30m"));
        assert!(is_valid_step("1d"));
        assert!(!is_valid_step(""));
        assert!(!is_valid_step("h"));
        assert!(!is_valid_step("0h"));
        assert!(!is_valid_step("1.5h"));
        assert!(!is_valid_step("1y"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("rusty"), "Rusty");
        assert_eq!(capitalize(""), "");
    }
}
