//! After the strict pass has expanded from the exits some walkable cells may
//! remain unreached, sealed off by obstacles. [Reachability] records those
//! cells and collects the conditional obstacles that seed the fallback pass.
//!

use std::collections::{BTreeSet, HashMap};

use bevy::prelude::*;

use crate::prelude::*;

/// Walkable cells without a route to an exit and the fallback targets
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reachability {
	/// Walkable cells absent from the strict pass
	unreached: BTreeSet<GridCell>,
	/// Walkable cells holding a conditional obstacle
	fallback_sources: Vec<GridCell>,
}

impl Reachability {
	/// Scan every walkable cell of the `classifier` once, comparing it
	/// against the `strict` pass
	pub fn find<C: GridClassifier>(classifier: &C, strict: &IntegrationField) -> Self {
		let mut unreached = BTreeSet::new();
		let mut fallback_sources = Vec::new();
		for cell in classifier.get_walkable_cells() {
			if !strict.contains(cell) {
				unreached.insert(cell);
			}
			if classifier.is_fallback_target(cell) {
				fallback_sources.push(cell);
			}
		}
		trace!(
			"{} cells unreached, {} fallback sources",
			unreached.len(),
			fallback_sources.len()
		);
		Reachability {
			unreached,
			fallback_sources,
		}
	}
	/// Get a reference to the walkable cells absent from the strict pass
	pub fn get_unreached(&self) -> &BTreeSet<GridCell> {
		&self.unreached
	}
	pub fn is_unreached(&self, cell: GridCell) -> bool {
		self.unreached.contains(&cell)
	}
	/// Get a reference to the conditional obstacle cells in row-major order
	pub fn get_fallback_sources(&self) -> &[GridCell] {
		&self.fallback_sources
	}
	/// For each fallback source find the cost an actor on the exit side of
	/// the obstacle would pay to step onto it: the cheapest strict cost
	/// among its walkable, unblocked neighbours plus a single step. Sources
	/// without such a neighbour, or whose contact cost would reach
	/// [COST_UNREACHABLE], get no entry
	pub fn get_fallback_tie_breaks<C: GridClassifier>(
		&self,
		strict: &IntegrationField,
		classifier: &C,
		edge_costs: EdgeCosts,
	) -> HashMap<GridCell, u32> {
		let mut tie_breaks = HashMap::new();
		for source in self.fallback_sources.iter() {
			let contact = classifier
				.get_neighbours(*source)
				.into_iter()
				.filter(|n| classifier.is_walkable(*n) && !classifier.is_blocked(*n, AvoidanceMode::Strict))
				.filter_map(|n| strict.get_cost(n))
				.min();
			// a contact cost that would overflow is left without an entry
			if let Some(cost) = contact
				.and_then(|cost| cost.checked_add(edge_costs.get_step_cost()))
				.filter(|cost| *cost < COST_UNREACHABLE)
			{
				tie_breaks.insert(*source, cost);
			}
		}
		tie_breaks
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	/// 5x1 strip, exit on the left, conditional obstacle in the middle
	fn strip() -> (WalkableGrid, Vec<ObstacleLayer>) {
		let grid = WalkableGrid::new(GridDimensions::new(5, 1, 1.0));
		let layers = vec![ObstacleLayer::from_cells(
			ObstacleClass::Conditional,
			[GridCell::new(2, 0)],
		)];
		(grid, layers)
	}
	#[test]
	fn unreached_behind_conditional() {
		let (grid, layers) = strip();
		let classifier = LayeredClassifier::new(&grid, &layers);
		let strict = IntegrationField::calculate(
			&[GridCell::new(0, 0)],
			AvoidanceMode::Strict,
			None,
			&classifier,
			EdgeCosts::default(),
		);
		let reachability = Reachability::find(&classifier, &strict);
		let actual: BTreeSet<GridCell> = [GridCell::new(2, 0), GridCell::new(3, 0), GridCell::new(4, 0)]
			.into_iter()
			.collect();
		assert_eq!(&actual, reachability.get_unreached());
		assert_eq!(&[GridCell::new(2, 0)], reachability.get_fallback_sources());
	}
	#[test]
	fn tie_break_from_contact_cost() {
		let (grid, layers) = strip();
		let classifier = LayeredClassifier::new(&grid, &layers);
		let strict = IntegrationField::calculate(
			&[GridCell::new(0, 0)],
			AvoidanceMode::Strict,
			None,
			&classifier,
			EdgeCosts::default(),
		);
		let reachability = Reachability::find(&classifier, &strict);
		let result = reachability.get_fallback_tie_breaks(&strict, &classifier, EdgeCosts::default());
		// neighbour (1, 0) has a strict cost of 1
		assert_eq!(Some(&2), result.get(&GridCell::new(2, 0)));
	}
	#[test]
	fn no_tie_break_when_sealed() {
		let grid = WalkableGrid::new(GridDimensions::new(3, 1, 1.0));
		let layers = vec![
			ObstacleLayer::from_cells(ObstacleClass::Permanent, [GridCell::new(1, 0)]),
			ObstacleLayer::from_cells(ObstacleClass::Conditional, [GridCell::new(2, 0)]),
		];
		let classifier = LayeredClassifier::new(&grid, &layers);
		let strict = IntegrationField::calculate(
			&[GridCell::new(0, 0)],
			AvoidanceMode::Strict,
			None,
			&classifier,
			EdgeCosts::default(),
		);
		let reachability = Reachability::find(&classifier, &strict);
		let result = reachability.get_fallback_tie_breaks(&strict, &classifier, EdgeCosts::default());
		assert!(result.is_empty());
	}
	#[test]
	fn everything_reached() {
		let grid = WalkableGrid::new(GridDimensions::new(3, 3, 1.0));
		let classifier = LayeredClassifier::new(&grid, &[]);
		let strict = IntegrationField::calculate(
			&[GridCell::new(1, 1)],
			AvoidanceMode::Strict,
			None,
			&classifier,
			EdgeCosts::default(),
		);
		let reachability = Reachability::find(&classifier, &strict);
		assert!(reachability.get_unreached().is_empty());
		assert!(reachability.get_fallback_sources().is_empty());
	}
}
