//! Bias parameter search
//!
//! Coordinate descent over the bias parameters. Each candidate relocates
//! the selected soundings, bins them into a statistics grid twice the
//! production cell size and scores the mean per-bin depth variance. Each
//! parameter gets a coarse sweep around the current best value followed by
//! a fine sweep around the coarse winner.

use crate::selection::Selection;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use swathgrid_core::crs::Projection;
use swathgrid_core::swath::{BiasParameters, SwathFile};
use swathgrid_core::{Error, Result};
use tracing::{debug, info};

/// Which bias parameters to optimize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterMask {
    pub roll: bool,
    pub pitch: bool,
    pub heading: bool,
    pub time_lag: bool,
    pub snell: bool,
}

impl ParameterMask {
    pub const ROLL: Self = Self::only(BiasParameter::Roll);
    pub const PITCH: Self = Self::only(BiasParameter::Pitch);
    pub const HEADING: Self = Self::only(BiasParameter::Heading);
    pub const TIME_LAG: Self = Self::only(BiasParameter::TimeLag);
    pub const SNELL: Self = Self::only(BiasParameter::Snell);

    const fn only(parameter: BiasParameter) -> Self {
        Self {
            roll: matches!(parameter, BiasParameter::Roll),
            pitch: matches!(parameter, BiasParameter::Pitch),
            heading: matches!(parameter, BiasParameter::Heading),
            time_lag: matches!(parameter, BiasParameter::TimeLag),
            snell: matches!(parameter, BiasParameter::Snell),
        }
    }

    /// Roll, pitch and heading together.
    pub fn attitude() -> Self {
        Self {
            roll: true,
            pitch: true,
            heading: true,
            ..Default::default()
        }
    }

    pub fn contains(&self, parameter: BiasParameter) -> bool {
        match parameter {
            BiasParameter::Roll => self.roll,
            BiasParameter::Pitch => self.pitch,
            BiasParameter::Heading => self.heading,
            BiasParameter::TimeLag => self.time_lag,
            BiasParameter::Snell => self.snell,
        }
    }

    pub fn count(&self) -> usize {
        BiasParameter::ALL.iter().filter(|p| self.contains(**p)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// One of the five bias parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasParameter {
    Roll,
    Pitch,
    Heading,
    TimeLag,
    Snell,
}

impl BiasParameter {
    pub const ALL: [BiasParameter; 5] = [
        BiasParameter::Roll,
        BiasParameter::Pitch,
        BiasParameter::Heading,
        BiasParameter::TimeLag,
        BiasParameter::Snell,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BiasParameter::Roll => "Roll Bias",
            BiasParameter::Pitch => "Pitch Bias",
            BiasParameter::Heading => "Heading Bias",
            BiasParameter::TimeLag => "Time Lag",
            BiasParameter::Snell => "Snell Correction",
        }
    }

    pub fn get(self, bias: &BiasParameters) -> f64 {
        match self {
            BiasParameter::Roll => bias.roll,
            BiasParameter::Pitch => bias.pitch,
            BiasParameter::Heading => bias.heading,
            BiasParameter::TimeLag => bias.time_lag,
            BiasParameter::Snell => bias.snell,
        }
    }

    pub fn set(self, bias: &mut BiasParameters, value: f64) {
        match self {
            BiasParameter::Roll => bias.roll = value,
            BiasParameter::Pitch => bias.pitch = value,
            BiasParameter::Heading => bias.heading = value,
            BiasParameter::TimeLag => bias.time_lag = value,
            BiasParameter::Snell => bias.snell = value,
        }
    }

    /// Coarse and fine sweeps for this parameter.
    pub fn sweeps(self) -> (Sweep, Sweep) {
        match self {
            BiasParameter::Roll | BiasParameter::Pitch | BiasParameter::Heading => {
                (Sweep::new(11, 5.0), Sweep::new(19, 0.9))
            }
            BiasParameter::TimeLag => (Sweep::new(21, 1.0), Sweep::new(19, 0.09)),
            BiasParameter::Snell => (Sweep::new(21, 0.1), Sweep::new(19, 0.009)),
        }
    }
}

/// Evenly spaced candidates `center - half_span ..= center + half_span`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub steps: usize,
    pub half_span: f64,
}

impl Sweep {
    pub const fn new(steps: usize, half_span: f64) -> Self {
        Self { steps, half_span }
    }

    pub fn candidates(&self, center: f64) -> impl Iterator<Item = f64> + '_ {
        let start = center - self.half_span;
        let step = if self.steps > 1 {
            2.0 * self.half_span / (self.steps - 1) as f64
        } else {
            0.0
        };
        (0..self.steps).map(move |i| start + i as f64 * step)
    }
}

/// Depth statistics of one bin, relative to the first depth seen.
#[derive(Debug, Clone, Copy, Default)]
struct Bin {
    first: f64,
    sum: f64,
    sum2: f64,
    count: u32,
}

/// Variance statistics grid over the selection.
#[derive(Debug, Clone)]
pub struct VarianceGrid {
    x_min: f64,
    y_min: f64,
    d: f64,
    /// Indexed (row, col), row along local y
    bins: Array2<Bin>,
}

impl VarianceGrid {
    /// Bins of `2 * cell_size` covering the selection's local x/y ranges
    /// expanded by a quarter of their span on each side.
    pub fn new(x_range: (f64, f64), y_range: (f64, f64), cell_size: f64) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(Error::bad_parameter("cell_size", cell_size, "must be positive"));
        }
        let d = 2.0 * cell_size;
        let wx = x_range.1 - x_range.0;
        let wy = y_range.1 - y_range.0;
        let n_cols = (1.5 * wx / d).max(0.0) as usize + 1;
        let n_rows = (1.5 * wy / d).max(0.0) as usize + 1;
        let cells = n_cols.checked_mul(n_rows).ok_or(Error::MemoryFailure {
            what: "variance grid",
            cells: usize::MAX,
        })?;
        let mut data = Vec::new();
        data.try_reserve_exact(cells)
            .map_err(|_| Error::MemoryFailure {
                what: "variance grid",
                cells,
            })?;
        data.resize(cells, Bin::default());
        let bins = Array2::from_shape_vec((n_rows, n_cols), data).map_err(|_| Error::MemoryFailure {
            what: "variance grid",
            cells,
        })?;
        Ok(Self {
            x_min: x_range.0 - 0.25 * wx,
            y_min: y_range.0 - 0.25 * wy,
            d,
            bins,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.bins.dim()
    }

    /// Mean per-bin variance of the given local positions, with the number
    /// of occupied bins. `None` when no position lands in the grid.
    pub fn mean_variance<I>(&mut self, positions: I) -> Option<(f64, usize)>
    where
        I: IntoIterator<Item = (f64, f64, f64)>,
    {
        self.bins.fill(Bin::default());
        let (n_rows, n_cols) = self.bins.dim();
        for (x, y, z) in positions {
            let col = ((x - self.x_min) / self.d).floor();
            let row = ((y - self.y_min) / self.d).floor();
            if !(col >= 0.0 && row >= 0.0) {
                continue;
            }
            let (row, col) = (row as usize, col as usize);
            if row >= n_rows || col >= n_cols {
                continue;
            }
            let bin = &mut self.bins[(row, col)];
            if bin.count == 0 {
                bin.first = z;
            }
            let dz = z - bin.first;
            bin.sum += dz;
            bin.sum2 += dz * dz;
            bin.count += 1;
        }

        let (total, occupied) = self
            .bins
            .iter()
            .filter(|b| b.count > 0)
            .fold((0.0, 0usize), |(total, occupied), b| {
                let n = b.count as f64;
                (total + (b.sum2 - b.sum * b.sum / n) / n, occupied + 1)
            });
        (occupied > 0).then(|| (total / occupied as f64, occupied))
    }
}

/// Best bias parameters found and the relocated selection under them.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerResult {
    pub bias: BiasParameters,
    /// Mean per-bin variance at `bias`
    pub variance: f64,
    pub evaluations: usize,
    /// Local coordinates of every selected sounding under `bias`
    pub positions: Vec<Option<(f64, f64, f64)>>,
}

struct Search<'a> {
    selection: &'a Selection,
    files: &'a [Option<SwathFile>],
    projection: &'a Projection,
    grid: VarianceGrid,
    best: BiasParameters,
    best_variance: Option<f64>,
    best_positions: Vec<Option<(f64, f64, f64)>>,
    evaluations: usize,
}

impl Search<'_> {
    fn sweep(&mut self, parameter: BiasParameter, sweep: Sweep, progress: &mut dyn FnMut(&str)) {
        let center = parameter.get(&self.best);
        let mut candidate = self.best;
        for value in sweep.candidates(center) {
            parameter.set(&mut candidate, value);
            let positions = self.selection.relocate(self.files, &candidate, self.projection);
            let accepted = self
                .selection
                .soundings
                .iter()
                .zip(&positions)
                .filter(|(s, _)| s.flag.is_ok())
                .filter_map(|(_, p)| *p);
            self.evaluations += 1;
            let Some((variance, bins)) = self.grid.mean_variance(accepted) else {
                debug!(parameter = parameter.label(), value, "no occupied bins");
                continue;
            };
            let improved = self.best_variance.is_none_or(|best| variance < best);
            debug!(
                parameter = parameter.label(),
                value, variance, bins, improved, "bias candidate"
            );
            if improved {
                self.best = candidate;
                self.best_variance = Some(variance);
                self.best_positions = positions;
            }
            progress(&format!(
                "Optimizing {}:{:.2} Variance: {:.3} {:.3}",
                parameter.label(),
                value,
                variance,
                self.best_variance.unwrap_or(variance)
            ));
        }
    }
}

/// Search for the bias parameters that minimize depth variance over the
/// selection, starting from `start`.
///
/// Parameters outside `mask` keep their `start` value. The search is a
/// fixed sequence of sweeps: roll, pitch, heading, a fine re-sweep of those
/// attitude parameters when more than one parameter is requested, then time
/// lag and Snell ratio. Ties keep the earlier candidate.
pub fn optimize(
    selection: &Selection,
    files: &[Option<SwathFile>],
    projection: &Projection,
    cell_size: f64,
    start: BiasParameters,
    mask: ParameterMask,
    progress: &mut dyn FnMut(&str),
) -> Result<OptimizerResult> {
    if selection.is_empty() {
        return Err(Error::NoSelection);
    }
    if mask.is_empty() {
        return Err(Error::bad_parameter("mask", "none", "no parameter to optimize"));
    }
    let grid = VarianceGrid::new(selection.x_range, selection.y_range, cell_size)?;
    let mut search = Search {
        selection,
        files,
        projection,
        grid,
        best: start,
        best_variance: None,
        best_positions: Vec::new(),
        evaluations: 0,
    };

    let attitude = [BiasParameter::Roll, BiasParameter::Pitch, BiasParameter::Heading];
    for p in attitude {
        if mask.contains(p) {
            let (coarse, fine) = p.sweeps();
            search.sweep(p, coarse, progress);
            search.sweep(p, fine, progress);
        }
    }
    if mask.count() > 1 {
        for p in attitude {
            if mask.contains(p) {
                search.sweep(p, p.sweeps().1, progress);
            }
        }
    }
    for p in [BiasParameter::TimeLag, BiasParameter::Snell] {
        if mask.contains(p) {
            let (coarse, fine) = p.sweeps();
            search.sweep(p, coarse, progress);
            search.sweep(p, fine, progress);
        }
    }

    let variance = search.best_variance.ok_or_else(|| {
        Error::bad_parameter("selection", selection.len(), "no accepted soundings inside the statistics grid")
    })?;
    let best = search.best;
    info!(
        roll = best.roll,
        pitch = best.pitch,
        heading = best.heading,
        time_lag = best.time_lag,
        snell = best.snell,
        variance,
        evaluations = search.evaluations,
        "bias optimization finished"
    );
    Ok(OptimizerResult {
        bias: best,
        variance,
        evaluations: search.evaluations,
        positions: search.best_positions,
    })
}
