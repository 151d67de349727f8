//! Snapshot loading

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use optimizer_lib::{CostSnapshot, ResourceSnapshot};

use crate::SnapshotArgs;

pub fn load_resources(path: &Path) -> Result<ResourceSnapshot> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read resource snapshot {}", path.display()))?;
    ResourceSnapshot::from_json(&json)
        .with_context(|| format!("Invalid resource snapshot {}", path.display()))
}

pub fn load_costs(path: &Path) -> Result<CostSnapshot> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cost snapshot {}", path.display()))?;
    CostSnapshot::from_json(&json)
        .with_context(|| format!("Invalid cost snapshot {}", path.display()))
}

/// Load both snapshots named on the command line
pub fn load(args: &SnapshotArgs) -> Result<(ResourceSnapshot, CostSnapshot)> {
    Ok((load_resources(&args.resources)?, load_costs(&args.costs)?))
}
