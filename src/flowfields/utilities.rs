//! Useful structures and tools used by the fields
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Cost assigned to any [GridCell] that cannot reach a target, integration
/// costs saturate at this value
pub const COST_UNREACHABLE: u32 = u32::MAX;

/// Convenience way of describing the 4 orthogonal directions of movement
/// between neighbouring [GridCell]s.
///
/// Rows grow towards the south, so [Ordinal::North] is a step of `row - 1`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Reflect)]
pub enum Ordinal {
	North,
	East,
	South,
	West,
	/// Special case, a cell pointing at itself (a target) or a cell without
	/// any direction (blocked)
	#[default]
	Zero,
}

impl Ordinal {
	/// The 4 directions used when exploring neighbours, in the order they
	/// are visited
	pub const ORTHOGONAL: [Ordinal; 4] = [
		Ordinal::North,
		Ordinal::East,
		Ordinal::South,
		Ordinal::West,
	];
	/// Get the `(column, row)` offset of a single step in this direction
	pub fn get_offset(&self) -> IVec2 {
		match self {
			Ordinal::North => IVec2::new(0, -1),
			Ordinal::East => IVec2::new(1, 0),
			Ordinal::South => IVec2::new(0, 1),
			Ordinal::West => IVec2::new(-1, 0),
			Ordinal::Zero => IVec2::ZERO,
		}
	}
	/// Based on a cells `(column, row)` position find its 4 orthogonal
	/// neighbours. There are no bounds here, a [crate::prelude::GridClassifier] decides
	/// whether a neighbour can actually be walked on
	pub fn get_orthogonal_cell_neighbours(cell: GridCell) -> Vec<GridCell> {
		Ordinal::ORTHOGONAL
			.iter()
			.map(|ord| cell.step(*ord))
			.collect()
	}
	/// Returns the opposite [Ordinal] of the current
	pub fn inverse(&self) -> Ordinal {
		match self {
			Ordinal::North => Ordinal::South,
			Ordinal::East => Ordinal::West,
			Ordinal::South => Ordinal::North,
			Ordinal::West => Ordinal::East,
			Ordinal::Zero => Ordinal::Zero,
		}
	}
	/// For two cells next to each other find the [Ordinal] pointing from
	/// the `source` to the `target`. A `target` equal to the `source` gives
	/// [Ordinal::Zero].
	///
	/// This will panic if the two cells are not orthogonally adjacent, it
	/// means whatever produced the pair broke the 4-connected grid contract
	pub fn cell_to_cell_direction(target: GridCell, source: GridCell) -> Self {
		let direction = (
			target.get_column() - source.get_column(),
			target.get_row() - source.get_row(),
		);
		match direction {
			(0, 0) => Ordinal::Zero,
			(0, -1) => Ordinal::North,
			(1, 0) => Ordinal::East,
			(0, 1) => Ordinal::South,
			(-1, 0) => Ordinal::West,
			_ => panic!(
				"Cell {:?} is not orthogonally adjacent to {:?}",
				target, source
			),
		}
	}
	/// Unit vector of the direction in 2d world space where `y` points up
	/// (row 0 is at the top of the grid)
	#[cfg(feature = "2d")]
	pub fn get_2d_unit_vector(&self) -> Vec2 {
		match self {
			Ordinal::North => Vec2::new(0.0, 1.0),
			Ordinal::East => Vec2::new(1.0, 0.0),
			Ordinal::South => Vec2::new(0.0, -1.0),
			Ordinal::West => Vec2::new(-1.0, 0.0),
			Ordinal::Zero => Vec2::ZERO,
		}
	}
	/// Unit vector of the direction in 3d world space across the `x-z` plane
	/// (row 0 is furthest along `-z`)
	#[cfg(feature = "3d")]
	pub fn get_3d_unit_vector(&self) -> Vec3 {
		match self {
			Ordinal::North => Vec3::new(0.0, 0.0, -1.0),
			Ordinal::East => Vec3::new(1.0, 0.0, 0.0),
			Ordinal::South => Vec3::new(0.0, 0.0, 1.0),
			Ordinal::West => Vec3::new(-1.0, 0.0, 0.0),
			Ordinal::Zero => Vec3::ZERO,
		}
	}
}
