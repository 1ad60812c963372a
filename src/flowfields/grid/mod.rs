//! The ground a level is built upon. A grid is a rectangle of `columns x rows`
//! cells indexed from the top-left corner, each cell is either walkable
//! ground or void. Clearing cells of a rectangle produces sparse layouts
//! such as islands or corridors.
//!
//! ```text
//!  col: 0  1  2  3  4
//!      ______________
//! r 0 |__|__|__|__|__|
//! r 1 |__|__|__|__|__|
//! r 2 |__|__|__|__|__|
//! r 3 |__|__|__|__|__|
//! ```
//!

pub mod classifier;
pub mod level;
pub mod obstacles;

use bevy::prelude::*;

use crate::prelude::*;

/// ID of a cell within the grid in the format `(column, row)`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct GridCell((i32, i32));

impl GridCell {
	/// Create a new instance of [GridCell]
	pub fn new(column: i32, row: i32) -> Self {
		GridCell((column, row))
	}
	/// Get the `(column, row)` tuple
	pub fn get_column_row(&self) -> (i32, i32) {
		self.0
	}
	/// Get the column
	pub fn get_column(&self) -> i32 {
		self.0 .0
	}
	/// Get the row
	pub fn get_row(&self) -> i32 {
		self.0 .1
	}
	/// Get the cell as an `(x, y)` integer vector of `(column, row)`
	pub fn as_ivec2(&self) -> IVec2 {
		IVec2::new(self.get_column(), self.get_row())
	}
	/// Get the cell found by moving by `offset` from this one
	pub fn offset(&self, offset: IVec2) -> GridCell {
		GridCell::new(self.get_column() + offset.x, self.get_row() + offset.y)
	}
	/// Get the neighbouring cell in the direction of `ordinal`
	pub fn step(&self, ordinal: Ordinal) -> GridCell {
		self.offset(ordinal.get_offset())
	}
}

impl From<IVec2> for GridCell {
	fn from(value: IVec2) -> Self {
		GridCell::new(value.x, value.y)
	}
}

/// The number of columns and rows of a grid along with the world-space
/// size of a single cell
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Debug, Reflect)]
pub struct GridDimensions {
	/// `(columns, rows)` of the grid
	size: (u32, u32),
	/// Length of each side of a cell in world units.
	///
	/// ## In 2d
	///
	/// The pixel dimensions of a sprite tile
	///
	/// ## In 3d
	///
	/// The number of units (meters) covered by a cell along `x` and `z`
	cell_size: f32,
}

impl Default for GridDimensions {
	fn default() -> Self {
		GridDimensions {
			size: (0, 0),
			cell_size: 1.0,
		}
	}
}

impl GridDimensions {
	/// Create a new instance of [GridDimensions]
	pub fn new(columns: u32, rows: u32, cell_size: f32) -> Self {
		if cell_size <= 0.0 {
			panic!("Cell size must be greater than zero, found {}", cell_size);
		}
		GridDimensions {
			size: (columns, rows),
			cell_size,
		}
	}
	pub fn get_size(&self) -> (u32, u32) {
		self.size
	}
	/// Number of columns
	pub fn get_columns(&self) -> u32 {
		self.size.0
	}
	/// Number of rows
	pub fn get_rows(&self) -> u32 {
		self.size.1
	}
	pub fn get_cell_size(&self) -> f32 {
		self.cell_size
	}
	/// Total number of cells
	pub fn get_cell_count(&self) -> usize {
		self.size.0 as usize * self.size.1 as usize
	}
	/// Whether the `cell` lies within the bounds of the grid
	pub fn contains(&self, cell: GridCell) -> bool {
		cell.get_column() >= 0
			&& cell.get_row() >= 0
			&& (cell.get_column() as u32) < self.get_columns()
			&& (cell.get_row() as u32) < self.get_rows()
	}
	/// Row-major index of a cell, [None] when outside the grid
	pub fn get_index(&self, cell: GridCell) -> Option<usize> {
		if self.contains(cell) {
			Some(cell.get_row() as usize * self.get_columns() as usize + cell.get_column() as usize)
		} else {
			None
		}
	}
	/// The cell of a row-major index
	pub fn get_cell_from_index(&self, index: usize) -> GridCell {
		let columns = self.get_columns() as usize;
		GridCell::new((index % columns) as i32, (index / columns) as i32)
	}
	/// Length of the grid along `x` in world units
	#[cfg(any(feature = "2d", feature = "3d"))]
	fn get_world_length(&self) -> f32 {
		self.get_columns() as f32 * self.cell_size
	}
	/// Depth of the grid along `y` (2d) or `z` (3d) in world units
	#[cfg(any(feature = "2d", feature = "3d"))]
	fn get_world_depth(&self) -> f32 {
		self.get_rows() as f32 * self.cell_size
	}
	/// From a [GridCell] get the 2d position of its centre. The grid is
	/// centred on the origin with row `0` along the top (positive `y`).
	/// Returns [None] if the cell is outside of the grid
	#[cfg(feature = "2d")]
	pub fn get_xy_from_cell(&self, cell: GridCell) -> Option<Vec2> {
		if !self.contains(cell) {
			return None;
		}
		let x = -self.get_world_length() / 2.0 + (cell.get_column() as f32 + 0.5) * self.cell_size;
		// NB: rows approach negative y
		let y = self.get_world_depth() / 2.0 - (cell.get_row() as f32 + 0.5) * self.cell_size;
		Some(Vec2::new(x, y))
	}
	/// From a 2d position find the [GridCell] it sits within, [None] when
	/// the position is outside of the grid
	#[cfg(feature = "2d")]
	pub fn get_cell_from_xy(&self, position: Vec2) -> Option<GridCell> {
		let half_length = self.get_world_length() / 2.0;
		let half_depth = self.get_world_depth() / 2.0;
		if position.x < -half_length
			|| position.x > half_length
			|| position.y < -half_depth
			|| position.y > half_depth
		{
			trace!(
				"Position x {}, y {} is outside of the grid",
				position.x,
				position.y
			);
			return None;
		}
		let column = ((position.x + half_length) / self.cell_size).floor() as i32;
		let row = ((half_depth - position.y) / self.cell_size).floor() as i32;
		// safety for a position at the exact limits of the grid
		let column = column.min(self.get_columns() as i32 - 1);
		let row = row.min(self.get_rows() as i32 - 1);
		Some(GridCell::new(column, row))
	}
	/// From a [GridCell] get the 3d position of its centre on the `x-z`
	/// plane. The grid is centred on the origin with row `0` along the
	/// negative `z` edge. The `y` coordinate is defaulted to `0.0`.
	/// Returns [None] if the cell is outside of the grid
	#[cfg(feature = "3d")]
	pub fn get_xyz_from_cell(&self, cell: GridCell) -> Option<Vec3> {
		if !self.contains(cell) {
			return None;
		}
		let x = -self.get_world_length() / 2.0 + (cell.get_column() as f32 + 0.5) * self.cell_size;
		let z = -self.get_world_depth() / 2.0 + (cell.get_row() as f32 + 0.5) * self.cell_size;
		Some(Vec3::new(x, 0.0, z))
	}
	/// From a 3d position find the [GridCell] it sits within, the `y`
	/// coordinate is ignored. [None] when the position is outside of the grid
	#[cfg(feature = "3d")]
	pub fn get_cell_from_xyz(&self, position: Vec3) -> Option<GridCell> {
		let half_length = self.get_world_length() / 2.0;
		let half_depth = self.get_world_depth() / 2.0;
		if position.x < -half_length
			|| position.x > half_length
			|| position.z < -half_depth
			|| position.z > half_depth
		{
			trace!(
				"Position x {}, z {} is outside of the grid",
				position.x,
				position.z
			);
			return None;
		}
		let column = ((position.x + half_length) / self.cell_size).floor() as i32;
		let row = ((position.z + half_depth) / self.cell_size).floor() as i32;
		let column = column.min(self.get_columns() as i32 - 1);
		let row = row.min(self.get_rows() as i32 - 1);
		Some(GridCell::new(column, row))
	}
}

/// A mask of which cells of a rectangular grid are walkable ground
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, PartialEq, Debug, Default)]
pub struct WalkableGrid {
	/// Size of the grid
	dimensions: GridDimensions,
	/// Row-major flags of walkable ground
	walkable: Vec<bool>,
}

impl WalkableGrid {
	/// Create a new instance of [WalkableGrid] where every cell is walkable
	pub fn new(dimensions: GridDimensions) -> Self {
		WalkableGrid {
			dimensions,
			walkable: vec![true; dimensions.get_cell_count()],
		}
	}
	/// Create a new instance of [WalkableGrid] where no cell is walkable,
	/// ground can then be laid with [WalkableGrid::set_walkable]
	pub fn new_void(dimensions: GridDimensions) -> Self {
		WalkableGrid {
			dimensions,
			walkable: vec![false; dimensions.get_cell_count()],
		}
	}
	pub fn get_dimensions(&self) -> &GridDimensions {
		&self.dimensions
	}
	/// Whether a cell is walkable ground, anything outside the grid is not
	pub fn is_walkable(&self, cell: GridCell) -> bool {
		self.dimensions
			.get_index(cell)
			.and_then(|index| self.walkable.get(index).copied())
			.unwrap_or(false)
	}
	/// Mark a cell as ground or void
	pub fn set_walkable(&mut self, cell: GridCell, walkable: bool) {
		if let Some(flag) = self
			.dimensions
			.get_index(cell)
			.and_then(|index| self.walkable.get_mut(index))
		{
			*flag = walkable;
		} else {
			error!("Cannot mutate ground of {:?}, it is outside of the grid", cell);
		}
	}
	/// Check a grid built outside of [WalkableGrid::new] (such as one
	/// deserialized from disk) has a positive cell size and a mask covering
	/// exactly its cells
	pub fn validate(&self) -> Result<(), LevelLoadError> {
		let cell_size = self.dimensions.get_cell_size();
		if cell_size.is_nan() || cell_size <= 0.0 {
			return Err(LevelLoadError::InvalidCellSize(cell_size));
		}
		let expected = self.dimensions.get_cell_count();
		if self.walkable.len() != expected {
			return Err(LevelLoadError::MaskLength {
				columns: self.dimensions.get_columns(),
				rows: self.dimensions.get_rows(),
				expected,
				found: self.walkable.len(),
			});
		}
		Ok(())
	}
	/// All walkable cells in row-major order
	pub fn get_walkable_cells(&self) -> Vec<GridCell> {
		self.walkable
			.iter()
			.enumerate()
			.filter(|(_, walkable)| **walkable)
			.map(|(index, _)| self.dimensions.get_cell_from_index(index))
			.collect()
	}
}
