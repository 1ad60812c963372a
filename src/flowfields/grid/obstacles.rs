//! Obstacles come in two classes. A [ObstacleClass::Permanent] obstacle (a
//! cliff, a wall of the level) can never be walked through. A
//! [ObstacleClass::Conditional] obstacle (a structure placed by a player
//! which can be destroyed) blocks actors seeking an exit, but when an actor
//! has no route to any exit it may instead treat the obstacle as something
//! to walk up to and break through.
//!

use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::prelude::*;

/// The kind of obstacle occupying a cell
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Reflect)]
pub enum ObstacleClass {
	/// Blocks movement in every pass
	Permanent,
	/// Blocks movement while seeking an exit, passable (and a target in
	/// its own right) when falling back
	Conditional,
}

/// Which obstacle classes block movement during a pass
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Reflect)]
pub enum AvoidanceMode {
	/// Both [ObstacleClass::Permanent] and [ObstacleClass::Conditional] block
	Strict,
	/// Only [ObstacleClass::Permanent] blocks
	Relaxed,
}

impl AvoidanceMode {
	/// Whether an obstacle of `class` blocks movement under this mode
	pub fn is_blocked_by(&self, class: ObstacleClass) -> bool {
		match self {
			AvoidanceMode::Strict => true,
			AvoidanceMode::Relaxed => class == ObstacleClass::Permanent,
		}
	}
}

/// A set of cells occupied by obstacles of one [ObstacleClass]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ObstacleLayer {
	/// Class of every obstacle in the layer
	class: ObstacleClass,
	/// Occupied cells
	cells: BTreeSet<GridCell>,
}

impl ObstacleLayer {
	/// Create a new empty instance of [ObstacleLayer]
	pub fn new(class: ObstacleClass) -> Self {
		ObstacleLayer {
			class,
			cells: BTreeSet::new(),
		}
	}
	/// Create a new instance of [ObstacleLayer] occupying `cells`
	pub fn from_cells(class: ObstacleClass, cells: impl IntoIterator<Item = GridCell>) -> Self {
		ObstacleLayer {
			class,
			cells: cells.into_iter().collect(),
		}
	}
	pub fn get_class(&self) -> ObstacleClass {
		self.class
	}
	/// Get a reference to the occupied cells
	pub fn get_cells(&self) -> &BTreeSet<GridCell> {
		&self.cells
	}
	pub fn contains(&self, cell: GridCell) -> bool {
		self.cells.contains(&cell)
	}
	/// Place an obstacle, returns `true` if the cell was previously free
	pub fn insert(&mut self, cell: GridCell) -> bool {
		self.cells.insert(cell)
	}
	/// Remove an obstacle, returns `true` if the cell was occupied
	pub fn remove(&mut self, cell: GridCell) -> bool {
		self.cells.remove(&cell)
	}
	pub fn is_empty(&self) -> bool {
		self.cells.is_empty()
	}
}
