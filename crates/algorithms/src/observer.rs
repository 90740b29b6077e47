//! Callbacks from a session to its display layer

use crate::edit::EditEvent;
use swathgrid_core::raster::{BathymetryGrid, CellUpdate};

/// Receives progress and grid/edit notifications.
///
/// All methods default to doing nothing.
pub trait SessionObserver {
    /// Progress or status text during long passes
    fn message(&mut self, _text: &str) {}

    /// One cell was re-materialized after an edit
    fn cell_updated(&mut self, _update: CellUpdate) {}

    /// The whole grid was rebuilt
    fn grid_rebuilt(&mut self, _grid: &BathymetryGrid) {}

    /// A sounding's flag changed
    fn beam_edited(&mut self, _event: &EditEvent) {}

    /// Queued edits were flushed
    fn edits_flushed(&mut self, _count: usize) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}
