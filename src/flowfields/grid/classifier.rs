//! A [GridClassifier] is the only view the flow field calculations have of a
//! level. It answers whether a cell is walkable ground, whether it's blocked
//! by an obstacle under a given [AvoidanceMode] and which cells neighbour it.
//!
//! Calculations may call into a classifier at any rate so implementations
//! must be free of side effects.
//!

use crate::prelude::*;

/// Defines required access to a level's layout
pub trait GridClassifier {
	/// Whether the cell is walkable ground
	fn is_walkable(&self, cell: GridCell) -> bool;
	/// Whether the cell is occupied by an obstacle that blocks movement in
	/// the given `mode`
	fn is_blocked(&self, cell: GridCell, mode: AvoidanceMode) -> bool;
	/// Every walkable cell of the level
	fn get_walkable_cells(&self) -> Vec<GridCell>;
	/// The cells an actor can step to from `cell`. Every neighbour must be
	/// orthogonally adjacent to `cell`
	fn get_neighbours(&self, cell: GridCell) -> Vec<GridCell> {
		Ordinal::get_orthogonal_cell_neighbours(cell)
	}
	/// Whether the cell is walkable ground holding a
	/// [ObstacleClass::Conditional] obstacle, these cells are the targets of
	/// the fallback pass
	fn is_fallback_target(&self, cell: GridCell) -> bool {
		self.is_walkable(cell)
			&& self.is_blocked(cell, AvoidanceMode::Strict)
			&& !self.is_blocked(cell, AvoidanceMode::Relaxed)
	}
}

/// Composes a [WalkableGrid] with any number of [ObstacleLayer]s
pub struct LayeredClassifier<'a> {
	/// Ground of the level
	grid: &'a WalkableGrid,
	/// Layers of both classes
	layers: &'a [ObstacleLayer],
}

impl<'a> LayeredClassifier<'a> {
	/// Create a new instance of [LayeredClassifier]
	pub fn new(grid: &'a WalkableGrid, layers: &'a [ObstacleLayer]) -> Self {
		LayeredClassifier { grid, layers }
	}
}

impl GridClassifier for LayeredClassifier<'_> {
	fn is_walkable(&self, cell: GridCell) -> bool {
		self.grid.is_walkable(cell)
	}
	fn is_blocked(&self, cell: GridCell, mode: AvoidanceMode) -> bool {
		self.layers
			.iter()
			.any(|layer| mode.is_blocked_by(layer.get_class()) && layer.contains(cell))
	}
	fn get_walkable_cells(&self) -> Vec<GridCell> {
		self.grid.get_walkable_cells()
	}
}
