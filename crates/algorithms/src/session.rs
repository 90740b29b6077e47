//! Editing session
//!
//! A [`Session`] owns the loaded files, the current bias parameters, the
//! production grid and the active selection. Every operation goes through
//! it, so several independent sessions can live in one process.
//!
//! Typical flow:
//!
//! ```ignore
//! let mut session = Session::new(SessionConfig::default());
//! session.add_file(file);
//! session.build_grid()?;
//! session.edit_beam(id, BeamFlag::MANUAL, FlushMode::Flush)?;
//! ```

use crate::config::SessionConfig;
use crate::correction::{correct_file, project_file};
use crate::edit::{outstanding_edits, EditAction, EditEvent, EditQueue, FlushMode, OutstandingEdit};
use crate::gridding::{
    grid_beam, plan_grid, recompute_full, survey_extent, Contribution, GridOutcome, GridSounding,
    GridStats,
};
use crate::observer::{NullObserver, SessionObserver};
use crate::optimizer::{self, OptimizerResult, ParameterMask};
use crate::selection::{Selection, SelectionShape};
use crate::voxel;
use swathgrid_core::crs::Projection;
use swathgrid_core::raster::BathymetryGrid;
use swathgrid_core::swath::{BeamFlag, BiasParameters, SoundingId, SwathFile};
use swathgrid_core::{Error, Result};
use tracing::{info, warn};

/// Context of one editing session.
pub struct Session<O: SessionObserver = NullObserver> {
    config: SessionConfig,
    observer: O,
    /// Stable slots; unloading leaves `None` so handles stay valid
    files: Vec<Option<SwathFile>>,
    bias: BiasParameters,
    grid: Option<BathymetryGrid>,
    selection: Option<(SelectionShape, Selection)>,
    edits: EditQueue,
}

impl Session<NullObserver> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_observer(config, NullObserver)
    }
}

impl<O: SessionObserver> Session<O> {
    pub fn with_observer(config: SessionConfig, observer: O) -> Self {
        Self {
            bias: config.bias,
            config,
            observer,
            files: Vec::new(),
            grid: None,
            selection: None,
            edits: EditQueue::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn bias(&self) -> BiasParameters {
        self.bias
    }

    pub fn grid(&self) -> Option<&BathymetryGrid> {
        self.grid.as_ref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref().map(|(_, s)| s)
    }

    pub fn files(&self) -> &[Option<SwathFile>] {
        &self.files
    }

    pub fn file(&self, index: usize) -> Option<&SwathFile> {
        self.files.get(index).and_then(Option::as_ref)
    }

    /// Number of edits waiting for a flush.
    pub fn pending_edits(&self) -> usize {
        self.edits.len()
    }

    /// Load a decoded file into a new slot and return the slot index.
    ///
    /// Beams with non-finite raw geometry become null. The grid and the
    /// selection are dropped; call [`build_grid`](Self::build_grid) again.
    pub fn add_file(&mut self, mut file: SwathFile) -> usize {
        let index = self.files.len();
        let nulled = file.null_non_finite();
        if nulled > 0 {
            warn!(file = index, name = %file.name, nulled, "non-finite beams set to null");
        }
        info!(
            file = index,
            name = %file.name,
            pings = file.pings.len(),
            soundings = file.sounding_count(),
            "file added"
        );
        self.files.push(Some(file));
        self.invalidate();
        index
    }

    /// Unload the file in slot `index`.
    ///
    /// Returns the file's outstanding edits and discards its queued ones.
    /// The grid and the selection are dropped.
    pub fn unload_file(&mut self, index: usize) -> Result<Vec<OutstandingEdit>> {
        let file = self
            .files
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(Error::InvalidSounding {
                file: index,
                ping: 0,
                beam: 0,
            })?;
        self.edits.discard_file(index);
        self.invalidate();
        let outstanding = outstanding_edits(&file, index);
        info!(file = index, name = %file.name, edits = outstanding.len(), "file unloaded");
        Ok(outstanding)
    }

    fn invalidate(&mut self) {
        self.grid = None;
        self.selection = None;
    }

    fn correct_all(&mut self) -> usize {
        let bias = self.bias;
        self.files
            .iter_mut()
            .enumerate()
            .filter_map(|(i, f)| f.as_mut().map(|f| (i, f)))
            .map(|(i, f)| correct_file(f, i, &bias))
            .sum()
    }

    fn project_all(&mut self, projection: &Projection) {
        for file in self.files.iter_mut().flatten() {
            project_file(file, projection);
        }
    }

    /// Put the files back on the current grid after a failed rebuild.
    fn restore(&mut self) {
        if let Some(projection) = self.grid.as_ref().map(|g| *g.projection()) {
            self.correct_all();
            self.project_all(&projection);
        }
    }

    /// Correct every loaded file under the current bias and rebuild the
    /// grid from scratch.
    ///
    /// On failure the previous grid, if any, stays in place.
    pub fn build_grid(&mut self) -> Result<GridStats> {
        let anomalies = self.correct_all();
        let planned = survey_extent(self.files.iter().flatten()).and_then(|extent| {
            let plan = plan_grid(&extent, self.config.cell_size)?;
            let grid = BathymetryGrid::try_new(plan.geometry, plan.projection, self.config.algorithm)?;
            Ok((extent, plan, grid))
        });
        let (extent, plan, mut grid) = match planned {
            Ok(planned) => planned,
            Err(e) => {
                warn!("grid not rebuilt: {e}");
                self.restore();
                return Err(e);
            }
        };

        self.project_all(&plan.projection);
        let observer = &mut self.observer;
        let stats = recompute_full(&mut grid, &self.files, &mut |m| observer.message(m));

        let b = extent.bounds;
        let p = plan.projected;
        let g = plan.geometry;
        info!(
            projection = %plan.projection,
            lon_min = b.lon_min,
            lon_max = b.lon_max,
            lat_min = b.lat_min,
            lat_max = b.lat_max,
            x_min = p.x_min,
            x_max = p.x_max,
            y_min = p.y_min,
            y_max = p.y_max,
            cell_size = g.dx,
            cols = g.n_cols,
            rows = g.n_rows,
            algorithm = ?grid.algorithm(),
            gridded = stats.gridded,
            outside = stats.outside,
            failed = stats.failed,
            anomalies,
            "grid built"
        );
        self.observer.grid_rebuilt(&grid);
        self.grid = Some(grid);
        self.refresh_selection();
        Ok(stats)
    }

    fn refresh_selection(&mut self) {
        if let Some((shape, _)) = self.selection.take() {
            match Selection::select(&self.files, &shape) {
                Ok(selection) => self.selection = Some((shape, selection)),
                Err(e) => warn!("selection dropped: {e}"),
            }
        }
    }

    /// Make `bias` the session's bias parameters and rebuild the grid.
    ///
    /// Without a grid the parameters are only stored. If the rebuild fails
    /// the previous parameters are restored.
    pub fn apply_bias(&mut self, bias: BiasParameters) -> Result<GridStats> {
        let previous = self.bias;
        self.bias = bias;
        if self.grid.is_none() {
            return Ok(GridStats::default());
        }
        self.build_grid().inspect_err(|_| {
            self.bias = previous;
            self.restore();
        })
    }

    /// Change the flag of one sounding.
    ///
    /// When the beam moves between accepted and rejected, the grid cells it
    /// touches are updated and re-materialized immediately. The flag changes
    /// only once the grid has taken the edit. The edit is queued;
    /// [`FlushMode::Flush`] flushes the queue.
    pub fn edit_beam(&mut self, id: SoundingId, flag: BeamFlag, mode: FlushMode) -> Result<()> {
        let file = self
            .files
            .get(id.file)
            .and_then(Option::as_ref)
            .ok_or(Error::InvalidSounding {
                file: id.file,
                ping: id.ping,
                beam: id.beam,
            })?;
        let beam = file.beam_at(id)?;
        if beam.flag == BeamFlag::Null {
            return Err(Error::bad_parameter("flag", "null", "null beams cannot be edited"));
        }
        let old = beam.flag;
        if old != flag {
            let ping = &file.pings[id.ping];
            let time = ping.time;

            let mut touched = Vec::new();
            if old.is_ok() != flag.is_ok() {
                if let (Some(grid), Some(sounding)) =
                    (self.grid.as_mut(), GridSounding::of(file, ping, beam))
                {
                    let contribution = if flag.is_ok() {
                        Contribution::Add
                    } else {
                        Contribution::Remove
                    };
                    match grid_beam(grid, file.topography, &sounding, contribution)? {
                        GridOutcome::Touched(cells) => touched = cells,
                        GridOutcome::Outside => warn!(
                            file = id.file,
                            ping = id.ping,
                            beam = id.beam,
                            x = sounding.xy.0,
                            y = sounding.xy.1,
                            "edited sounding is outside the grid"
                        ),
                    }
                }
            }

            if let Some(beam) = self
                .files
                .get_mut(id.file)
                .and_then(Option::as_mut)
                .and_then(|f| f.beam_mut(id.ping, id.beam))
            {
                beam.flag = flag;
            }
            if let Some(grid) = self.grid.as_mut() {
                for (row, col) in touched {
                    let update = grid.materialize_cell(row, col)?;
                    self.observer.cell_updated(update);
                }
            }
            if let Some((_, selection)) = self.selection.as_mut() {
                selection.set_flag(id, flag);
            }
            let event = EditEvent {
                sounding: id,
                time,
                flag,
                action: EditAction::for_flag(flag),
            };
            self.observer.beam_edited(&event);
            self.edits.push(event);
        }
        if mode == FlushMode::Flush {
            self.flush_edits();
        }
        Ok(())
    }

    /// Hand queued edits to the caller and notify the observer.
    pub fn flush_edits(&mut self) -> Vec<EditEvent> {
        let events = self.edits.drain();
        if !events.is_empty() {
            self.observer.edits_flushed(events.len());
        }
        events
    }

    /// Select soundings of the gridded files.
    pub fn select(&mut self, shape: SelectionShape) -> Result<&Selection> {
        if self.grid.is_none() {
            return Err(Error::NoGrid);
        }
        let selection = Selection::select(&self.files, &shape)?;
        info!(
            soundings = selection.len(),
            unflagged = selection.unflagged,
            flagged = selection.flagged,
            "soundings selected"
        );
        Ok(&self.selection.insert((shape, selection)).1)
    }

    pub fn dismiss_selection(&mut self) {
        self.selection = None;
    }

    /// Show the selection as it would look under `bias`.
    ///
    /// Neither the pings nor the grid change.
    pub fn preview_bias(&mut self, bias: &BiasParameters) -> Result<&Selection> {
        let grid = self.grid.as_ref().ok_or(Error::NoGrid)?;
        let (_, selection) = self.selection.as_ref().ok_or(Error::NoSelection)?;
        let positions = selection.relocate(&self.files, bias, grid.projection());
        let (_, selection) = self.selection.as_mut().ok_or(Error::NoSelection)?;
        selection.apply_positions(&positions);
        Ok(selection)
    }

    /// Flag accepted soundings of the selection that sit in sparse voxels.
    ///
    /// Returns the number of soundings flagged. A sounding that cannot be
    /// flagged is logged and skipped; edits are flushed once.
    pub fn flag_sparse_voxels(&mut self) -> Result<usize> {
        let params = self.config.voxel;
        let cell_size = self.grid.as_ref().ok_or(Error::NoGrid)?.geometry().dx;
        let (_, selection) = self.selection.as_ref().ok_or(Error::NoSelection)?;
        self.observer.message(&format!(
            "Filtering sparse (n<{}) voxels ({}Xcell)",
            params.min_soundings, params.size_multiplier
        ));
        let observer = &mut self.observer;
        let report = voxel::find_sparse(
            selection,
            cell_size,
            &params,
            self.config.progress_interval,
            &mut |m| observer.message(m),
        )?;
        let ids: Vec<SoundingId> = report.sparse.iter().map(|&i| selection.soundings[i].id).collect();
        let mut failed = 0;
        for &id in &ids {
            if let Err(e) = self.edit_beam(id, BeamFlag::MANUAL, FlushMode::NoFlush) {
                warn!(file = id.file, ping = id.ping, beam = id.beam, "sparse sounding not flagged: {e}");
                failed += 1;
            }
        }
        self.flush_edits();
        let flagged = ids.len() - failed;
        info!(
            flagged,
            failed,
            voxels = report.occupied_voxels,
            "sparse voxels flagged"
        );
        Ok(flagged)
    }

    /// Search for better bias parameters over the selection.
    ///
    /// The selection shows the result; the grid and the session's bias are
    /// unchanged until [`apply_bias`](Self::apply_bias).
    pub fn optimize_bias(&mut self, mask: ParameterMask) -> Result<OptimizerResult> {
        let grid = self.grid.as_ref().ok_or(Error::NoGrid)?;
        let (_, selection) = self.selection.as_ref().ok_or(Error::NoSelection)?;
        let observer = &mut self.observer;
        let result = optimizer::optimize(
            selection,
            &self.files,
            grid.projection(),
            grid.geometry().dx,
            self.bias,
            mask,
            &mut |m| observer.message(m),
        )?;
        if let Some((_, selection)) = self.selection.as_mut() {
            selection.apply_positions(&result.positions);
        }
        Ok(result)
    }

    /// One-line-per-field description of a sounding.
    pub fn sounding_info(&self, id: SoundingId) -> Result<String> {
        let file = self.file(id.file).ok_or(Error::InvalidSounding {
            file: id.file,
            ping: id.ping,
            beam: id.beam,
        })?;
        let beam = file.beam_at(id)?;
        let ping = &file.pings[id.ping];
        let (lon, lat) = beam
            .corrected
            .map_or((ping.longitude, ping.latitude), |c| (c.longitude, c.latitude));
        Ok(format!(
            "Beam {} of {}   Ping {} of {}   File:{}\nPing Time: {:.6}\nLon:{:.6} Lat:{:.6} Depth:{:.3} X:{:.3} L:{:.3} A:{:.3}",
            id.beam,
            ping.beam_count(),
            id.ping,
            file.pings.len(),
            file.name,
            ping.time,
            lon,
            lat,
            beam.depth,
            beam.across_track,
            beam.along_track,
            beam.amplitude
        ))
    }

    /// Outstanding edits of every loaded file.
    pub fn outstanding_edits(&self) -> Vec<OutstandingEdit> {
        self.files
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| outstanding_edits(f, i)))
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionShape;
    use swathgrid_core::raster::{CellUpdate, GridAlgorithm};
    use swathgrid_core::swath::{Beam, FlagReason, Ping};

    #[derive(Default)]
    struct Recorder {
        messages: Vec<String>,
        cells: Vec<CellUpdate>,
        rebuilds: usize,
        edits: usize,
        flushes: Vec<usize>,
    }

    impl SessionObserver for Recorder {
        fn message(&mut self, text: &str) {
            self.messages.push(text.to_string());
        }
        fn cell_updated(&mut self, update: CellUpdate) {
            self.cells.push(update);
        }
        fn grid_rebuilt(&mut self, _grid: &BathymetryGrid) {
            self.rebuilds += 1;
        }
        fn beam_edited(&mut self, _event: &EditEvent) {
            self.edits += 1;
        }
        fn edits_flushed(&mut self, count: usize) {
            self.flushes.push(count);
        }
    }

    /// Northbound line over a flat 50 m seafloor, 11 beams every 10 m.
    fn line(name: &str) -> SwathFile {
        let mut file = SwathFile::new(name);
        for p in 0..20 {
            let beams = (-5..=5)
                .map(|b| Beam::new(50.0, 10.0 * b as f64, 0.0))
                .collect();
            file.pings.push(Ping {
                time: 1000.0 + p as f64,
                longitude: -122.0,
                latitude: 36.8 + p as f64 * 5e-5,
                heading: 0.0,
                altitude: 50.0,
                beams,
                ..Default::default()
            });
        }
        file
    }

    fn session() -> Session<Recorder> {
        let config = SessionConfig {
            algorithm: GridAlgorithm::SimpleMean,
            cell_size: Some(5.0),
            ..Default::default()
        };
        let mut s = Session::with_observer(config, Recorder::default());
        s.add_file(line("a"));
        s.build_grid().unwrap();
        s
    }

    #[test]
    fn test_build_grid_reports_progress() {
        let s = session();
        let grid = s.grid().unwrap();
        assert_eq!(s.observer().rebuilds, 1);
        assert_eq!(s.observer().messages[0], "Gridding file 1 of 1...");
        assert_eq!(grid.projection().id(), "UTM10N");
        let r = grid.value_range().unwrap();
        approx::assert_abs_diff_eq!(r.min, 50.0, epsilon = 1e-6);
        approx::assert_abs_diff_eq!(r.max, 50.0, epsilon = 1e-6);
    }

    #[test]
    fn test_build_without_files_fails() {
        let mut s = Session::new(SessionConfig::default());
        assert!(matches!(s.build_grid(), Err(Error::BadParameter { .. })));
        assert!(s.grid().is_none());
    }

    #[test]
    fn test_edit_updates_cells_and_queue() {
        let mut s = session();
        let occupied = s.grid().unwrap().occupied_count();
        let id = SoundingId::new(0, 3, 5);
        s.edit_beam(id, BeamFlag::MANUAL, FlushMode::NoFlush).unwrap();
        assert_eq!(s.pending_edits(), 1);
        assert_eq!(s.observer().edits, 1);
        assert!(!s.observer().cells.is_empty());
        assert!(s.grid().unwrap().occupied_count() <= occupied);

        // same flag again is not an edit
        s.edit_beam(id, BeamFlag::MANUAL, FlushMode::NoFlush).unwrap();
        assert_eq!(s.pending_edits(), 1);

        s.edit_beam(id, BeamFlag::Accepted, FlushMode::Flush).unwrap();
        assert_eq!(s.pending_edits(), 0);
        assert_eq!(s.observer().flushes, vec![2]);
        assert_eq!(s.grid().unwrap().occupied_count(), occupied);
        assert!(s.outstanding_edits().is_empty());
    }

    #[test]
    fn test_edit_rejects_bad_handles() {
        let mut s = session();
        let r = s.edit_beam(SoundingId::new(0, 99, 0), BeamFlag::MANUAL, FlushMode::Flush);
        assert!(matches!(r, Err(Error::InvalidSounding { ping: 99, .. })));
        let r = s.edit_beam(SoundingId::new(7, 0, 0), BeamFlag::MANUAL, FlushMode::Flush);
        assert!(matches!(r, Err(Error::InvalidSounding { file: 7, .. })));
    }

    #[test]
    fn test_unload_returns_outstanding_edits() {
        let mut s = session();
        let id = SoundingId::new(0, 1, 1);
        let flag = BeamFlag::Flagged(FlagReason::Filter);
        s.edit_beam(id, flag, FlushMode::NoFlush).unwrap();
        let edits = s.unload_file(0).unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].sounding, id);
        assert_eq!(edits[0].current, flag);
        assert_eq!(s.pending_edits(), 0);
        assert!(s.grid().is_none());
        assert!(s.unload_file(0).is_err());
    }

    #[test]
    fn test_selection_needs_grid() {
        let mut s = Session::new(SessionConfig::default());
        let shape = SelectionShape::Nav { pings: vec![(0, 0)] };
        assert_eq!(s.select(shape).err(), Some(Error::NoGrid));
        assert_eq!(s.flag_sparse_voxels().err(), Some(Error::NoGrid));
    }

    #[test]
    fn test_select_and_edit_keeps_counts() {
        let mut s = session();
        let sel = s.select(SelectionShape::Nav { pings: vec![(0, 2), (0, 3)] }).unwrap();
        assert_eq!(sel.len(), 22);
        assert_eq!(sel.unflagged, 22);
        s.edit_beam(SoundingId::new(0, 2, 0), BeamFlag::MANUAL, FlushMode::Flush).unwrap();
        let sel = s.selection().unwrap();
        assert_eq!((sel.unflagged, sel.flagged), (21, 1));
        s.dismiss_selection();
        assert!(s.selection().is_none());
    }

    #[test]
    fn test_preview_does_not_touch_grid() {
        let mut s = session();
        s.select(SelectionShape::Nav { pings: vec![(0, 10)] }).unwrap();
        let before = s.grid().unwrap().values().to_owned();
        let x0 = s.selection().unwrap().soundings[0].x;
        let bias = BiasParameters {
            heading: 10.0,
            ..Default::default()
        };
        let sel = s.preview_bias(&bias).unwrap();
        assert!((sel.soundings[0].x - x0).abs() > 1e-3);
        assert_eq!(s.grid().unwrap().values(), before.view());
        assert!(s.bias().is_identity());
    }

    #[test]
    fn test_apply_bias_rebuilds() {
        let mut s = session();
        let bias = BiasParameters {
            roll: 1.0,
            ..Default::default()
        };
        s.apply_bias(bias).unwrap();
        assert_eq!(s.bias(), bias);
        assert_eq!(s.observer().rebuilds, 2);
    }

    #[test]
    fn test_oversized_grid_keeps_previous() {
        let mut s = session();
        let geometry = *s.grid().unwrap().geometry();
        let values = s.grid().unwrap().values().to_owned();
        s.config.cell_size = Some(1e-20);

        let err = s.build_grid().unwrap_err();
        assert!(matches!(err, Error::MemoryFailure { what: "grid", .. }));
        assert_eq!(s.observer().rebuilds, 1);
        let grid = s.grid().unwrap();
        assert_eq!(*grid.geometry(), geometry);
        assert_eq!(grid.values(), values.view());

        let bias = BiasParameters {
            roll: 1.0,
            ..Default::default()
        };
        assert!(matches!(s.apply_bias(bias), Err(Error::MemoryFailure { .. })));
        assert!(s.bias().is_identity());

        // soundings are still projected onto the kept grid
        s.edit_beam(SoundingId::new(0, 3, 5), BeamFlag::MANUAL, FlushMode::Flush).unwrap();
        assert!(!s.observer().cells.is_empty());
        assert!(s.grid().unwrap().occupied_count() > 0);
    }

    #[test]
    fn test_sparse_filter_skips_unflaggable_soundings() {
        let mut s = session();
        s.select(SelectionShape::Nav {
            pings: (0..20).map(|p| (0, p)).collect(),
        })
        .unwrap();
        let moved = SoundingId::new(0, 10, 5);
        {
            let (_, sel) = s.selection.as_mut().unwrap();
            let far_x = sel.x_range.1 + 100.0;
            sel.x_range.1 = far_x;
            let i = sel.soundings.binary_search_by_key(&moved, |s| s.id).unwrap();
            sel.soundings[i].x = far_x;
            sel.soundings[i].y = sel.y_range.1;
            // a sounding of a file that is not loaded
            let mut stale = sel.soundings[i];
            stale.id = SoundingId::new(5, 0, 0);
            stale.y = sel.y_range.0;
            sel.soundings.push(stale);
            sel.recount();
        }

        assert_eq!(s.flag_sparse_voxels().unwrap(), 1);
        assert_eq!(s.observer().flushes, vec![1]);
        assert_eq!(s.pending_edits(), 0);
        assert_eq!(s.file(0).unwrap().beam_at(moved).unwrap().flag, BeamFlag::MANUAL);
        assert_eq!(s.selection().unwrap().flagged, 1);
    }

    #[test]
    fn test_failed_edit_changes_nothing() {
        let mut s = session();
        let mut file = line("b");
        file.pings[0].beams[0].depth = f64::NAN;
        let index = s.add_file(file);
        s.build_grid().unwrap();
        let values = s.grid().unwrap().values().to_owned();

        let null = SoundingId::new(index, 0, 0);
        let r = s.edit_beam(null, BeamFlag::Accepted, FlushMode::Flush);
        assert!(matches!(r, Err(Error::BadParameter { .. })));
        assert_eq!(s.file(index).unwrap().beam_at(null).unwrap().flag, BeamFlag::Null);
        assert_eq!(s.pending_edits(), 0);
        assert_eq!(s.observer().edits, 0);
        assert!(s.observer().flushes.is_empty());
        assert_eq!(s.grid().unwrap().values(), values.view());
    }

    #[test]
    fn test_sounding_info_format() {
        let s = session();
        let info = s.sounding_info(SoundingId::new(0, 2, 4)).unwrap();
        assert!(info.starts_with("Beam 4 of 11   Ping 2 of 20   File:a\n"));
        assert!(info.contains("Ping Time: 1002.000000"));
        assert!(info.contains("Depth:50.000 X:-10.000 L:0.000 A:0.000"));
        assert!(s.sounding_info(SoundingId::new(0, 2, 40)).is_err());
    }
}
