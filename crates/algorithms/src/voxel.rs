//! Sparse-voxel outlier filter
//!
//! The selection volume is cut into cubic voxels `size_multiplier` grid
//! cells on a side. Each accepted sounding counts towards its own voxel and
//! towards the 26 neighbours. A sounding whose voxel holds fewer than
//! `min_soundings` soundings in its 3x3x3 neighbourhood is an outlier.
//!
//! Occupied voxels are kept in per-bucket lists, one bucket per 10x10x10
//! voxel block, so memory follows the occupied volume rather than the
//! bounding box.

use crate::selection::Selection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use swathgrid_core::{Error, Result};
use tracing::{debug, info};

/// Voxels per bucket side.
const BUCKET: usize = 10;

/// Parameters for the sparse-voxel filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelParams {
    /// Voxel edge in grid cells (default: 2)
    pub size_multiplier: u32,
    /// Minimum soundings in the 3x3x3 neighbourhood (default: 5)
    pub min_soundings: usize,
}

impl Default for VoxelParams {
    fn default() -> Self {
        Self {
            size_multiplier: 2,
            min_soundings: 5,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Voxel {
    count: usize,
    neighbors: usize,
    /// Selection indices, kept only while the voxel could still be sparse
    members: Vec<usize>,
}

/// Result of a filter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoxelReport {
    /// Indices into the selection of soundings in sparse voxels
    pub sparse: Vec<usize>,
    pub occupied_voxels: usize,
    pub occupied_buckets: usize,
}

/// Number of voxels along one axis, rounded up to whole buckets.
fn axis_len(span: f64, size: f64) -> usize {
    let n = (span.max(0.0) / size) as usize;
    BUCKET * (n / BUCKET + 1)
}

fn axis_index(v: f64, min: f64, size: f64, n: usize) -> usize {
    let i = ((v - min) / size).floor();
    if i <= 0.0 {
        0
    } else {
        (i as usize).min(n - 1)
    }
}

/// Find accepted soundings that sit in sparsely populated voxels.
///
/// `cell_size` is the production grid cell. `progress` receives a status
/// line every `progress_interval` soundings.
pub fn find_sparse(
    selection: &Selection,
    cell_size: f64,
    params: &VoxelParams,
    progress_interval: usize,
    progress: &mut dyn FnMut(&str),
) -> Result<VoxelReport> {
    if selection.is_empty() {
        return Err(Error::NoSelection);
    }
    if params.size_multiplier == 0 {
        return Err(Error::bad_parameter("size_multiplier", 0, "must be at least 1"));
    }
    if params.min_soundings == 0 {
        return Err(Error::bad_parameter("min_soundings", 0, "must be at least 1"));
    }
    let size = params.size_multiplier as f64 * cell_size;
    if !(size.is_finite() && size > 0.0) {
        return Err(Error::bad_parameter("cell_size", cell_size, "must be positive"));
    }

    let (x0, x1) = selection.x_range;
    let (y0, y1) = selection.y_range;
    let (z0, z1) = selection.z_range;
    let nx = axis_len(x1 - x0, size);
    let ny = axis_len(y1 - y0, size);
    let nz = axis_len(z1 - z0, size);
    let (cnx, cny, cnz) = (nx / BUCKET, ny / BUCKET, nz / BUCKET);
    let n_buckets = cnx
        .checked_mul(cny)
        .and_then(|n| n.checked_mul(cnz))
        .ok_or(Error::MemoryFailure {
            what: "voxel buckets",
            cells: usize::MAX,
        })?;
    let mut buckets: Vec<HashMap<(usize, usize, usize), Voxel>> = Vec::new();
    buckets
        .try_reserve_exact(n_buckets)
        .map_err(|_| Error::MemoryFailure {
            what: "voxel buckets",
            cells: n_buckets,
        })?;
    buckets.resize_with(n_buckets, HashMap::new);
    debug!(nx, ny, nz, size, n_buckets, "voxel volume");

    let mut occupied = 0;
    let threshold = params.min_soundings;
    for (isounding, s) in selection.soundings.iter().enumerate() {
        if s.flag.is_ok() {
            let i = axis_index(s.x, x0, size, nx);
            let j = axis_index(s.y, y0, size, ny);
            let k = axis_index(s.z, z0, size, nz);
            for ii in i.saturating_sub(1)..=(i + 1).min(nx - 1) {
                for jj in j.saturating_sub(1)..=(j + 1).min(ny - 1) {
                    for kk in k.saturating_sub(1)..=(k + 1).min(nz - 1) {
                        let bucket = ii / BUCKET + (jj / BUCKET) * cnx + (kk / BUCKET) * cnx * cny;
                        let voxel = buckets[bucket].entry((ii, jj, kk)).or_default();
                        if (ii, jj, kk) == (i, j, k) {
                            if voxel.count < threshold {
                                voxel.members.push(isounding);
                            }
                            voxel.count += 1;
                            if voxel.count == 1 {
                                occupied += 1;
                            }
                        } else {
                            voxel.neighbors += 1;
                        }
                    }
                }
            }
        }
        if progress_interval > 0 && isounding > 0 && isounding % progress_interval == 0 {
            progress(&format!(
                "Processed {} of {} soundings, {} voxels occupied",
                isounding,
                selection.len(),
                occupied
            ));
        }
    }

    let mut report = VoxelReport {
        occupied_voxels: occupied,
        ..Default::default()
    };
    for voxels in buckets.iter().filter(|b| !b.is_empty()) {
        report.occupied_buckets += 1;
        for v in voxels.values() {
            if v.count > 0 && v.count + v.neighbors < threshold {
                report.sparse.extend_from_slice(&v.members);
            }
        }
    }
    report.sparse.sort_unstable();
    info!(
        occupied = report.occupied_voxels,
        sparse = report.sparse.len(),
        size,
        threshold,
        "sparse voxel filter"
    );
    Ok(report)
}
