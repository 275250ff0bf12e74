use agrizone::{raster, render};
use agrizone_optimization::{evaluate, solve, Instance, SolverConfig};
use std::io::Write;

const INSTANCE_TEXT: &str = "4 4\n\
    10.1 12.3 15.8 18.2\n\
    11.5 13.7 16.9 19.4\n\
    13.2 15.1 18.3 20.7\n\
    15.8 17.6 20.1 22.9\n";

#[test]
fn test_end_to_end_parse_solve_render() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(INSTANCE_TEXT.as_bytes()).unwrap();

    let grid = raster::read_grid(file.path()).unwrap();
    assert_eq!(grid.dim(), (4, 4));

    let instance = Instance::new(grid, 4).unwrap();
    let threshold = 0.3 * instance.global_variance();
    let config = SolverConfig {
        restarts: 6,
        threshold,
        seed: 42,
        parallel: false,
    };
    let report = solve(&instance, &config).unwrap();

    assert!(report.best.assignment.iter().all(|&z| z < 4));
    assert_eq!(
        report.cost,
        evaluate(&instance, &report.best.assignment, threshold)
    );
    assert!(report.unpenalized_cost <= report.cost);

    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("zones.png");
    render::save_zone_map(&png, instance.grid(), &report.best.assignment, 10, true).unwrap();
    assert!(png.metadata().unwrap().len() > 0);
}

#[test]
fn test_solver_beats_one_shot_search_on_average() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(INSTANCE_TEXT.as_bytes()).unwrap();
    let grid = raster::read_grid(file.path()).unwrap();
    let instance = Instance::new(grid, 3).unwrap();

    let many = solve(
        &instance,
        &SolverConfig {
            restarts: 10,
            seed: 7,
            ..SolverConfig::default()
        },
    )
    .unwrap();
    let one = solve(
        &instance,
        &SolverConfig {
            restarts: 1,
            seed: 7,
            ..SolverConfig::default()
        },
    )
    .unwrap();
    // restart 0 is shared between the two runs, so the 10-restart best
    // can never be worse
    assert!(many.cost <= one.cost);
}
