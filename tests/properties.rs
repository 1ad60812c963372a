//! Randomised checks of the flow field against a brute-force breadth-first
//! search
//!

use std::collections::{HashMap, VecDeque};

use bevy_flowfield_exits_plugin::prelude::*;
use proptest::prelude::*;

/// Build a level from a list of cell codes, `0` is void, `1` a permanent
/// obstacle, `2` a conditional obstacle (or ground when `conditionals` is
/// false) and anything else is plain ground
fn build_level(
	columns: u32,
	rows: u32,
	codes: &[u8],
	exits: &[(i32, i32)],
	conditionals: bool,
) -> Level {
	let dimensions = GridDimensions::new(columns, rows, 1.0);
	let mut level = Level::new(dimensions);
	for index in 0..dimensions.get_cell_count() {
		let cell = dimensions.get_cell_from_index(index);
		match codes[index] {
			0 => level.get_grid_mut().set_walkable(cell, false),
			1 => {
				level.set_obstacle(cell, Some(ObstacleClass::Permanent));
			}
			2 if conditionals => {
				level.set_obstacle(cell, Some(ObstacleClass::Conditional));
			}
			_ => {}
		}
	}
	for (column, row) in exits.iter() {
		let cell = GridCell::new(column % columns as i32, row % rows as i32);
		level.get_exits_mut().push(cell);
	}
	level
}

/// Distances from the walkable exits treating every obstacle as impassable
fn brute_force_distances(level: &Level) -> HashMap<GridCell, u32> {
	let classifier = level.classifier();
	let mut distances = HashMap::new();
	let mut queue = VecDeque::new();
	for exit in level.get_exits().get().iter() {
		if classifier.is_walkable(*exit) && !distances.contains_key(exit) {
			distances.insert(*exit, 0);
			queue.push_back(*exit);
		}
	}
	while let Some(cell) = queue.pop_front() {
		let distance = distances[&cell];
		for neighbour in Ordinal::get_orthogonal_cell_neighbours(cell) {
			if !classifier.is_walkable(neighbour)
				|| classifier.is_blocked(neighbour, AvoidanceMode::Strict)
				|| distances.contains_key(&neighbour)
			{
				continue;
			}
			distances.insert(neighbour, distance + 1);
			queue.push_back(neighbour);
		}
	}
	distances
}

/// Every cell of the level
fn all_cells(level: &Level) -> Vec<GridCell> {
	let dimensions = level.get_grid().get_dimensions();
	(0..dimensions.get_cell_count())
		.map(|i| dimensions.get_cell_from_index(i))
		.collect()
}

proptest! {
	#[test]
	fn distances_match_breadth_first_search(
		columns in 2u32..9,
		rows in 2u32..9,
		codes in prop::collection::vec(0u8..10, 64),
		exits in prop::collection::vec((0i32..8, 0i32..8), 1..4),
	) {
		let level = build_level(columns, rows, &codes, &exits, false);
		let expected = brute_force_distances(&level);
		let mut engine = FlowFieldEngine::default();
		let result = engine.recompute_level(&level);
		if expected.is_empty() {
			// every exit was void
			prop_assert!(result.is_err() || level.get_grid().get_walkable_cells().is_empty());
			return Ok(());
		}
		prop_assert!(result.is_ok());
		for cell in all_cells(&level) {
			let node = engine.get_node(cell);
			match expected.get(&cell) {
				Some(distance) => {
					prop_assert_eq!(FlowStatus::ReachesGoal, node.get_status());
					prop_assert_eq!(*distance, node.get_cost());
				}
				None => prop_assert_eq!(FlowNode::BLOCKED, node),
			}
		}
	}

	#[test]
	fn routes_descend_to_a_target(
		columns in 2u32..9,
		rows in 2u32..9,
		codes in prop::collection::vec(0u8..10, 64),
		exits in prop::collection::vec((0i32..8, 0i32..8), 1..4),
	) {
		let level = build_level(columns, rows, &codes, &exits, true);
		let mut engine = FlowFieldEngine::default();
		if engine.recompute_level(&level).is_err() {
			return Ok(());
		}
		for cell in all_cells(&level) {
			let node = engine.get_node(cell);
			if node.is_blocked() {
				continue;
			}
			let mut current = cell;
			let mut current_node = node;
			let mut steps = 0;
			while !current_node.is_target() {
				let next = current_node.get_step_target(current);
				prop_assert!(next.is_some());
				let next = next.unwrap_or(current);
				let next_node = engine.get_node(next);
				prop_assert_eq!(current_node.get_status(), next_node.get_status());
				prop_assert_eq!(current_node.get_cost(), next_node.get_cost() + 1);
				current = next;
				current_node = next_node;
				steps += 1;
				prop_assert!(steps <= node.get_cost());
			}
			prop_assert_eq!(node.get_cost(), steps);
		}
	}

	#[test]
	fn fallback_only_when_exits_unreachable(
		columns in 2u32..9,
		rows in 2u32..9,
		codes in prop::collection::vec(0u8..10, 64),
		exits in prop::collection::vec((0i32..8, 0i32..8), 1..4),
	) {
		let level = build_level(columns, rows, &codes, &exits, true);
		let expected = brute_force_distances(&level);
		let mut engine = FlowFieldEngine::default();
		if engine.recompute_level(&level).is_err() {
			return Ok(());
		}
		let classifier = level.classifier();
		for cell in all_cells(&level) {
			let node = engine.get_node(cell);
			match expected.get(&cell) {
				Some(distance) => {
					prop_assert_eq!(FlowStatus::ReachesGoal, node.get_status());
					prop_assert_eq!(*distance, node.get_cost());
				}
				None => prop_assert_ne!(FlowStatus::ReachesGoal, node.get_status()),
			}
			if !classifier.is_walkable(cell) {
				prop_assert_eq!(FlowNode::BLOCKED, node);
			}
		}
	}

	#[test]
	fn exits_are_fixed_points(
		columns in 2u32..9,
		rows in 2u32..9,
		codes in prop::collection::vec(0u8..10, 64),
		exits in prop::collection::vec((0i32..8, 0i32..8), 1..4),
	) {
		let level = build_level(columns, rows, &codes, &exits, true);
		let mut engine = FlowFieldEngine::default();
		if engine.recompute_level(&level).is_err() {
			return Ok(());
		}
		for exit in level.get_exits().get().iter() {
			if !level.get_grid().is_walkable(*exit) {
				continue;
			}
			let node = engine.get_node(*exit);
			prop_assert_eq!(FlowNode::new(Ordinal::Zero, 0, FlowStatus::ReachesGoal), node);
		}
	}

	#[test]
	fn recompute_is_idempotent(
		columns in 2u32..9,
		rows in 2u32..9,
		codes in prop::collection::vec(0u8..10, 64),
		exits in prop::collection::vec((0i32..8, 0i32..8), 1..4),
	) {
		let level = build_level(columns, rows, &codes, &exits, true);
		let mut engine = FlowFieldEngine::default();
		if engine.recompute_level(&level).is_err() {
			return Ok(());
		}
		let first = engine.get_snapshot();
		prop_assert!(engine.recompute_level(&level).is_ok());
		let second = engine.get_snapshot();
		prop_assert!(first.is_some());
		prop_assert_eq!(first, second);
		prop_assert_eq!(2, engine.get_generation());
	}
}
