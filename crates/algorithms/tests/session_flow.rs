//! End-to-end editing sessions over synthetic surveys.

mod common;

use approx::assert_abs_diff_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use swathgrid_algorithms::prelude::*;
use swathgrid_algorithms::selection::LocalFrame;

fn config(algorithm: GridAlgorithm, cell_size: f64) -> SessionConfig {
    SessionConfig {
        algorithm,
        cell_size: Some(cell_size),
        ..Default::default()
    }
}

#[test]
fn optimizer_recovers_roll_bias() {
    common::init_tracing();
    let a = common::flat_line("north", 0.0, 60, 4.0, 2.0);
    let b = common::flat_line("south", 180.0, 60, 4.0, 2.0);
    let pings = common::all_pings(&[&a, &b]);

    let mut session = Session::new(config(GridAlgorithm::SimpleMean, 5.0));
    session.add_file(a);
    session.add_file(b);
    session.build_grid().unwrap();
    let before = session.grid().unwrap().stddev_range().unwrap();

    session.select(SelectionShape::Nav { pings }).unwrap();
    let result = session.optimize_bias(ParameterMask::ROLL).unwrap();
    assert!(
        (result.bias.roll - 2.0).abs() < 0.1,
        "roll bias {} not within 0.1 of 2.0",
        result.bias.roll
    );
    assert_abs_diff_eq!(result.bias.pitch, 0.0);
    assert_abs_diff_eq!(result.bias.snell, 1.0);
    assert_eq!(result.evaluations, 11 + 19);
    // optimizing previews only
    assert!(session.bias().is_identity());

    session.apply_bias(result.bias).unwrap();
    let after = session.grid().unwrap().stddev_range().unwrap();
    assert!(after.max < before.max);
    assert_eq!(session.selection().unwrap().len(), 2 * 60 * 21);
}

#[test]
fn voxel_filter_isolates_lonely_sounding() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut points: Vec<(f64, f64, f64)> = (0..100)
        .map(|_| {
            (
                rng.gen_range(0.0..6.0),
                rng.gen_range(0.0..6.0),
                rng.gen_range(0.0..6.0),
            )
        })
        .collect();
    // voxel edge is 2 m; ten voxel widths past the cluster
    points.push((26.0, 26.0, 26.0));

    let mut selection = Selection {
        frame: LocalFrame {
            x_origin: 0.0,
            y_origin: 0.0,
            bearing: 90.0,
        },
        z_origin: 0.0,
        x_range: (0.0, 27.0),
        y_range: (0.0, 27.0),
        z_range: (0.0, 27.0),
        soundings: points
            .iter()
            .enumerate()
            .map(|(i, &(x, y, z))| SelectedSounding {
                id: SoundingId::new(0, i, 0),
                flag: BeamFlag::Accepted,
                original_flag: BeamFlag::Accepted,
                amplitude: 0.0,
                x,
                y,
                z,
            })
            .collect(),
        unflagged: 0,
        flagged: 0,
    };
    selection.recount();

    let params = VoxelParams {
        size_multiplier: 2,
        min_soundings: 5,
    };
    let report = find_sparse(&selection, 1.0, &params, 0, &mut |_| {}).unwrap();
    assert_eq!(report.sparse, vec![100]);
}

#[test]
fn voxel_filter_flags_spike_through_session() {
    common::init_tracing();
    let mut line = common::flat_line("spiky", 0.0, 50, 2.0, 0.0);
    line.pings[25].beams[10].depth = common::DEPTH + 60.0;

    let mut session = Session::new(config(GridAlgorithm::SimpleMean, 5.0));
    session.add_file(line);
    session.build_grid().unwrap();

    let spike = SoundingId::new(0, 25, 10);
    let xy = session.file(0).unwrap().pings[25].beams[10]
        .corrected
        .and_then(|c| c.xy)
        .unwrap();
    let (row, col) = session.grid().unwrap().geometry().cell_of(xy.0, xy.1).unwrap();
    assert!(session.grid().unwrap().value(row, col).unwrap() > common::DEPTH + 1.0);

    let pings = (0..50).map(|p| (0, p)).collect();
    session.select(SelectionShape::Nav { pings }).unwrap();
    let flagged = session.flag_sparse_voxels().unwrap();
    assert_eq!(flagged, 1);
    assert_eq!(session.pending_edits(), 0);

    let beam = session.file(0).unwrap().beam_at(spike).unwrap();
    assert_eq!(beam.flag, BeamFlag::MANUAL);
    assert_abs_diff_eq!(
        session.grid().unwrap().value(row, col).unwrap(),
        common::DEPTH,
        epsilon = 1e-6
    );
    let sel = session.selection().unwrap();
    assert_eq!(sel.flagged, 1);

    let outstanding = session.outstanding_edits();
    assert_eq!(outstanding.len(), 1);
    assert_eq!(outstanding[0].sounding, spike);
    assert_eq!(outstanding[0].original, BeamFlag::Accepted);
}

#[test]
fn optimizer_recovers_roll_and_pitch_together() {
    common::init_tracing();
    // 20 pings per 10 m statistics bin along a 0.2 slope
    let a = common::sloping_line("north", 0.0, 200, 0.5, (2.0, 1.5), 0.2);
    let b = common::sloping_line("south", 180.0, 200, 0.5, (2.0, 1.5), 0.2);
    let pings = common::all_pings(&[&a, &b]);

    let mut session = Session::new(config(GridAlgorithm::SimpleMean, 5.0));
    session.add_file(a);
    session.add_file(b);
    session.build_grid().unwrap();
    session.select(SelectionShape::Nav { pings }).unwrap();

    let result = session.optimize_bias(ParameterMask::attitude()).unwrap();
    // coarse and fine per parameter, then the coupled fine re-sweep
    assert_eq!(result.evaluations, 3 * (11 + 19) + 3 * 19);
    assert!(
        (result.bias.roll - 2.0).abs() < 0.1,
        "roll bias {} not within 0.1 of 2.0",
        result.bias.roll
    );
    assert!(
        (result.bias.pitch - 1.5).abs() < 0.25,
        "pitch bias {} not within 0.25 of 1.5",
        result.bias.pitch
    );
    assert_abs_diff_eq!(result.bias.time_lag, 0.0);
    assert_abs_diff_eq!(result.bias.snell, 1.0);
    assert!(session.bias().is_identity());
}

#[test]
fn optimizer_sweeps_time_lag_then_snell() {
    common::init_tracing();
    let line = common::rolling_line("rolling", 60, 2.0, 0.5);
    let mut session = Session::new(config(GridAlgorithm::SimpleMean, 5.0));
    session.add_file(line);
    session.build_grid().unwrap();
    let before = session.grid().unwrap().stddev_range().unwrap();
    session
        .select(SelectionShape::Nav {
            pings: (0..60).map(|p| (0, p)).collect(),
        })
        .unwrap();

    let mut mask = ParameterMask::TIME_LAG;
    mask.snell = true;
    let result = session.optimize_bias(mask).unwrap();
    assert_eq!(result.evaluations, (21 + 19) + (21 + 19));
    assert!(
        (result.bias.time_lag - 0.5).abs() < 0.02,
        "time lag {} not within 0.02 of 0.5",
        result.bias.time_lag
    );
    assert!((result.bias.snell - 1.0).abs() < 0.005, "snell {}", result.bias.snell);
    assert_abs_diff_eq!(result.bias.roll, 0.0);

    session.apply_bias(result.bias).unwrap();
    let after = session.grid().unwrap().stddev_range().unwrap();
    assert!(after.max < before.max);
}

fn assert_same_values(session: &Session, before: &ndarray::Array2<f64>) {
    let now = session.grid().unwrap().values();
    assert_eq!(now.dim(), before.dim());
    for (a, b) in now.iter().zip(before.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
    }
}

#[test]
fn edit_toggle_restores_footprint_grid() {
    let mut line = common::flat_line("bump", 0.0, 40, 3.0, 0.0);
    line.pings[20].beams[10].depth = common::DEPTH - 20.0;
    let mut session = Session::new(config(GridAlgorithm::Footprint, 5.0));
    session.add_file(line);
    session.build_grid().unwrap();
    let before = session.grid().unwrap().values().to_owned();

    let bump = SoundingId::new(0, 20, 10);
    session.edit_beam(bump, BeamFlag::MANUAL, FlushMode::NoFlush).unwrap();
    assert_ne!(session.grid().unwrap().values(), before.view());

    session.edit_beam(bump, BeamFlag::Accepted, FlushMode::Flush).unwrap();
    assert_same_values(&session, &before);
    assert!(session.outstanding_edits().is_empty());
}

#[test]
fn edit_toggle_restores_shoal_bias_grid() {
    let mut line = common::flat_line("shoal", 0.0, 40, 2.0, 0.0);
    line.pings[20].beams[10].depth = common::DEPTH - 30.0;
    line.pings[21].beams[10].depth = common::DEPTH - 10.0;
    let mut session = Session::new(config(GridAlgorithm::ShoalBias, 5.0));
    session.add_file(line);
    session.build_grid().unwrap();
    let before = session.grid().unwrap().values().to_owned();

    let shoalest = SoundingId::new(0, 20, 10);
    let xy = session.file(0).unwrap().beam_at(shoalest).unwrap().corrected.and_then(|c| c.xy).unwrap();
    let (row, col) = session.grid().unwrap().geometry().cell_of(xy.0, xy.1).unwrap();
    assert_abs_diff_eq!(session.grid().unwrap().value(row, col).unwrap(), common::DEPTH - 30.0, epsilon = 1e-6);

    session.edit_beam(shoalest, BeamFlag::MANUAL, FlushMode::NoFlush).unwrap();
    let next = session.grid().unwrap().value(row, col).unwrap();
    // the next shallowest sounding of the cell takes over
    assert!(next > common::DEPTH - 30.0 + 1.0);
    assert!(next <= common::DEPTH + 1e-6);

    session.edit_beam(shoalest, BeamFlag::Accepted, FlushMode::Flush).unwrap();
    assert_same_values(&session, &before);
}

#[test]
fn footprint_grid_matches_flat_seafloor() {
    let line = common::flat_line("flat", 0.0, 40, 3.0, 0.0);
    let mut session = Session::new(config(GridAlgorithm::Footprint, 5.0));
    session.add_file(line);
    let stats = session.build_grid().unwrap();
    assert_eq!(stats.gridded, 40 * 21);
    assert_eq!(stats.failed, 0);

    let range = session.grid().unwrap().value_range().unwrap();
    assert_abs_diff_eq!(range.min, common::DEPTH, epsilon = 1e-6);
    assert_abs_diff_eq!(range.max, common::DEPTH, epsilon = 1e-6);
}

#[test]
fn non_finite_beams_are_nulled_on_load() {
    let mut line = common::flat_line("nan", 0.0, 10, 3.0, 0.0);
    line.pings[3].beams[4].depth = f64::NAN;
    let mut session = Session::new(SessionConfig::default());
    session.add_file(line);
    let beam = session.file(0).unwrap().beam_at(SoundingId::new(0, 3, 4)).unwrap();
    assert_eq!(beam.flag, BeamFlag::Null);
    session.build_grid().unwrap();
    let r = session.edit_beam(SoundingId::new(0, 3, 4), BeamFlag::Accepted, FlushMode::Flush);
    assert!(matches!(r, Err(Error::BadParameter { .. })));
}

#[test]
fn session_from_json_config() {
    let cfg: SessionConfig =
        serde_json::from_str(r#"{"algorithm":"simple_mean","cell_size":4.0,"bias":{"roll":0.5,"pitch":0.0,"heading":0.0,"time_lag":0.0,"snell":1.0}}"#)
            .unwrap();
    let mut session = Session::new(cfg);
    assert_abs_diff_eq!(session.bias().roll, 0.5);
    session.add_file(common::flat_line("cfg", 0.0, 10, 3.0, 0.0));
    session.build_grid().unwrap();
    let grid = session.grid().unwrap();
    assert_eq!(grid.algorithm(), GridAlgorithm::SimpleMean);
    assert_abs_diff_eq!(grid.geometry().dx, 4.0);
}
