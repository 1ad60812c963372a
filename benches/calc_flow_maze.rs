//! Measure a FlowField generation for a level with a maze of permanent obstacles.
//!
//! Level is 300 cells by 300 cells with a snake-like maze of walls running up and down the entire level. Some of the wall cells are randomly swapped for conditional obstacles (from a fixed seed) and the right half of the level is sealed off so that both the strict and relaxed passes do real work
//!
//! ```txt
//!  _____________________________
//! |__|__|__|xx|__|__|__|xx|__|__|
//! |__|xx|__|xx|__|xx|__|xx|__|xx|
//! |__|xx|__|oo|__|xx|__|xx|__|xx|
//! |__|xx|__|xx|__|xx|__|xx|__|xx|
//! |__|oo|__|xx|__|xx|__|xx|__|xx|
//! |__|xx|__|xx|__|xx|__|xx|__|xx|
//! |__|xx|__|xx|__|xx|__|oo|__|xx|
//! |__|xx|__|xx|__|xx|__|xx|__|xx|
//! |__|xx|__|xx|__|xx|__|xx|__|xx|
//! |__|xx|__|__|__|xx|__|__|__|xx|
//! ```
//!

use bevy_flowfield_exits_plugin::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Create the [Level] before benchmarking
fn prepare_level(columns: u32, rows: u32) -> Level {
	let mut level = Level::new(GridDimensions::new(columns, rows, 1.0));
	let mut rng = StdRng::seed_from_u64(1138);
	let rows = rows as i32;
	for column in (1..columns as i32).step_by(2) {
		// alternate the gap between the top and bottom of the level
		let gap = if column % 4 == 1 { rows - 1 } else { 0 };
		let sealed = column as u32 == (columns / 2) | 1;
		for row in 0..rows {
			if row == gap && !sealed {
				continue;
			}
			let class = if rng.random_bool(0.02) {
				ObstacleClass::Conditional
			} else {
				ObstacleClass::Permanent
			};
			level.set_obstacle(GridCell::new(column, row), Some(class));
		}
	}
	level.get_exits_mut().push(GridCell::new(0, 0));
	level
}

/// Run the full recompute
fn flow_maze(level: &Level, engine: &mut FlowFieldEngine) {
	engine.recompute_level(level).unwrap();
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(20);
	let level = prepare_level(300, 300);
	let mut engine = FlowFieldEngine::default();
	group.bench_function("calc_flow_maze", |b| {
		b.iter(|| flow_maze(black_box(&level), black_box(&mut engine)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
