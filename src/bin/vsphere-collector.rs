// Copyright (c) 2025 - Cowboy AI, Inc.
//! vSphere Collector
//!
//! Runs one collection pass and prints every synchronization row as a JSON
//! line on stdout:
//!
//! ```text
//! {"class":"virtual_machine","row":{"primary_key":"vm-42","name":"web01",...}}
//! {"class":"hypervisor","row":{"primary_key":"host-10","name":"esx01",...}}
//! ```
//!
//! Run with: cargo run --bin vsphere-collector
//!
//! Environment:
//! 1. `VSPHERE_COLLECTOR_CONFIG` - TOML configuration (default: collector.toml)
//! 2. `VSPHERE_SNAPSHOT` - JSON inventory snapshot served to the collector
//! 3. `VSPHERE_COLLECT` - `all` (default), `vm` or `hypervisor`
//! 4. `VSPHERE_SKIP_PREFLIGHT` - set to skip the endpoint probe (offline runs)
//! 5. `VSPHERE_URI`, `VSPHERE_LOGIN`, `VSPHERE_PASSWORD`, `DEFAULT_ORG_ID` -
//!    override the configuration file

use anyhow::{bail, Context, Result};
use cim_vsphere_inventory::{
    adapters::check_tls_connection, domain::RecordClass, CollectorConfig, HypervisorEmitter,
    InventoryRepository, SnapshotProvider, SyncRow, VirtualMachineEmitter,
};
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for the collector run
#[derive(Debug, Clone)]
struct RunConfig {
    config_path: String,
    snapshot_path: String,
    classes: Vec<RecordClass>,
    skip_preflight: bool,
}

impl RunConfig {
    /// Load run configuration from environment variables
    fn from_env() -> Result<Self> {
        let config_path = std::env::var("VSPHERE_COLLECTOR_CONFIG")
            .unwrap_or_else(|_| "collector.toml".to_string());

        let snapshot_path = std::env::var("VSPHERE_SNAPSHOT")
            .context("VSPHERE_SNAPSHOT not set. Point it at a JSON inventory snapshot")?;

        let classes = match std::env::var("VSPHERE_COLLECT")
            .unwrap_or_else(|_| "all".to_string())
            .to_lowercase()
            .as_str()
        {
            "all" => vec![RecordClass::VirtualMachine, RecordClass::Hypervisor],
            "vm" | "virtual_machine" => vec![RecordClass::VirtualMachine],
            "hypervisor" => vec![RecordClass::Hypervisor],
            other => bail!("VSPHERE_COLLECT must be all, vm or hypervisor, got '{}'", other),
        };

        Ok(Self {
            config_path,
            snapshot_path,
            classes,
            skip_preflight: std::env::var_os("VSPHERE_SKIP_PREFLIGHT").is_some(),
        })
    }
}

fn print_row(out: &mut impl Write, class: RecordClass, row: &SyncRow) -> Result<()> {
    let line = serde_json::json!({ "class": class.as_str(), "row": row });
    writeln!(out, "{}", line).context("Failed to write row")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting vSphere collector");

    let run = RunConfig::from_env()?;
    let config = CollectorConfig::load(&run.config_path)
        .with_context(|| format!("Failed to load configuration from {}", run.config_path))?;
    info!("Configuration loaded:");
    info!("  - vCenter: {}", config.vsphere.uri);
    info!("  - Snapshot: {}", run.snapshot_path);
    info!("  - Classes: {:?}", run.classes);

    if run.skip_preflight {
        warn!("Skipping pre-flight connection check");
    } else {
        check_tls_connection(&config.vsphere.uri, &config.vsphere.connection_options)
            .await
            .context("Pre-flight connection check failed, aborting")?;
    }

    let settings = config.settings().context("Invalid collector configuration")?;
    let provider = SnapshotProvider::from_path(&run.snapshot_path)
        .with_context(|| format!("Failed to load snapshot {}", run.snapshot_path))?;
    let repository = InventoryRepository::new(Arc::new(provider), Arc::new(settings));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut emitted = 0usize;

    for class in &run.classes {
        match class {
            RecordClass::VirtualMachine => {
                let mut emitter = VirtualMachineEmitter::open(&repository)
                    .await
                    .context("Virtual machine collection failed")?;
                while let Some(row) = emitter.fetch() {
                    print_row(&mut out, *class, &row)?;
                    emitted += 1;
                }
            }
            RecordClass::Hypervisor => {
                let mut emitter = HypervisorEmitter::open(&repository)
                    .await
                    .context("Hypervisor collection failed")?;
                while let Some(row) = emitter.fetch() {
                    print_row(&mut out, *class, &row)?;
                    emitted += 1;
                }
            }
            RecordClass::Server => {}
        }
    }

    let snapshot = repository.snapshot().await?;
    info!(
        "Collection {} at {} emitted {} rows",
        snapshot.run_id, snapshot.collected_at, emitted
    );
    Ok(())
}
