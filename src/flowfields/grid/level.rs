//! A [Level] is the host-owned description of the world: its walkable
//! ground, the obstacle layers placed upon it and the exits actors are
//! trying to reach. Level editing (placing or destroying a structure)
//! mutates the [Level], the flow fields are then recalculated from it.
//!
//! A [Level] can be loaded from a `ron` file (feature `ron`) or from a `csv`
//! file (feature `csv`) where each value describes a cell:
//!
//! | Code | Meaning |
//! |------|---------|
//! | `0`  | void, not walkable |
//! | `1`  | walkable ground |
//! | `2`  | ground with a permanent obstacle |
//! | `3`  | ground with a conditional obstacle |
//! | `4`  | ground with an exit |
//!
//! ```text
//! 1,1,1,2,1
//! 4,1,1,3,1
//! 1,1,1,2,1
//! ```
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Failures while loading a [Level] from disk
#[derive(Debug, thiserror::Error)]
pub enum LevelLoadError {
	#[error("failed opening level file: {0}")]
	Io(#[from] std::io::Error),
	#[cfg(feature = "ron")]
	#[error("failed deserializing level: {0}")]
	Ron(#[from] ron::error::SpannedError),
	#[cfg(feature = "csv")]
	#[error("failed reading level csv: {0}")]
	Csv(#[from] csv::Error),
	#[error("unknown cell code `{code}` at column {column}, row {row}")]
	UnknownCellCode {
		/// The offending value
		code: String,
		/// Column of the value
		column: usize,
		/// Row of the value
		row: usize,
	},
	#[error("row {row} has {found} cells, expected {expected}")]
	RaggedRow {
		/// Index of the row
		row: usize,
		/// Number of cells in the row
		found: usize,
		/// Number of cells in the first row
		expected: usize,
	},
	#[error("cell size must be greater than zero, found {0}")]
	InvalidCellSize(f32),
	#[error("walkable mask has {found} cells, a {columns}x{rows} grid needs {expected}")]
	MaskLength {
		/// Number of columns of the grid
		columns: u32,
		/// Number of rows of the grid
		rows: u32,
		/// Number of cells of the grid
		expected: usize,
		/// Number of entries in the mask
		found: usize,
	},
}

/// The cells actors are trying to reach
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExitSet(Vec<GridCell>);

impl ExitSet {
	/// Create a new instance of [ExitSet]
	pub fn new(exits: Vec<GridCell>) -> Self {
		ExitSet(exits)
	}
	pub fn get(&self) -> &[GridCell] {
		&self.0
	}
	pub fn push(&mut self, exit: GridCell) {
		self.0.push(exit);
	}
	/// Remove every occurrence of `exit`
	pub fn remove(&mut self, exit: GridCell) {
		self.0.retain(|e| *e != exit);
	}
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Ground, obstacles and exits of a world
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct Level {
	/// Walkable ground
	grid: WalkableGrid,
	/// Obstacles placed upon the ground
	layers: Vec<ObstacleLayer>,
	/// Targets of actors
	exits: ExitSet,
}

impl Level {
	/// Create a new instance of [Level] where all ground is walkable with no
	/// obstacles and no exits
	pub fn new(dimensions: GridDimensions) -> Self {
		Level {
			grid: WalkableGrid::new(dimensions),
			layers: Vec::new(),
			exits: ExitSet::default(),
		}
	}
	/// Create a new instance of [Level] from its parts
	pub fn from_parts(grid: WalkableGrid, layers: Vec<ObstacleLayer>, exits: ExitSet) -> Self {
		Level {
			grid,
			layers,
			exits,
		}
	}
	pub fn get_grid(&self) -> &WalkableGrid {
		&self.grid
	}
	pub fn get_grid_mut(&mut self) -> &mut WalkableGrid {
		&mut self.grid
	}
	pub fn get_layers(&self) -> &[ObstacleLayer] {
		&self.layers
	}
	pub fn get_layers_mut(&mut self) -> &mut Vec<ObstacleLayer> {
		&mut self.layers
	}
	pub fn add_layer(&mut self, layer: ObstacleLayer) {
		self.layers.push(layer);
	}
	pub fn get_exits(&self) -> &ExitSet {
		&self.exits
	}
	pub fn get_exits_mut(&mut self) -> &mut ExitSet {
		&mut self.exits
	}
	/// Get a [GridClassifier] view of the level
	pub fn classifier(&self) -> LayeredClassifier<'_> {
		LayeredClassifier::new(&self.grid, &self.layers)
	}
	/// Get the class of obstacle occupying a cell, a
	/// [ObstacleClass::Permanent] obstacle takes precedence if a cell sits in
	/// layers of both classes
	pub fn get_obstacle(&self, cell: GridCell) -> Option<ObstacleClass> {
		let mut found = None;
		for layer in self.layers.iter() {
			if layer.contains(cell) {
				if layer.get_class() == ObstacleClass::Permanent {
					return Some(ObstacleClass::Permanent);
				}
				found = Some(layer.get_class());
			}
		}
		found
	}
	/// Replace whatever obstacle occupies `cell` with `obstacle`, [None]
	/// clears the cell. The obstacle is placed into the first layer of its
	/// class (a layer is created if none exist). Returns whether the layout
	/// changed
	pub fn set_obstacle(&mut self, cell: GridCell, obstacle: Option<ObstacleClass>) -> bool {
		let before: Vec<bool> = self.layers.iter().map(|l| l.contains(cell)).collect();
		for layer in self.layers.iter_mut() {
			layer.remove(cell);
		}
		let mut created_layer = false;
		if let Some(class) = obstacle {
			if let Some(layer) = self.layers.iter_mut().find(|l| l.get_class() == class) {
				layer.insert(cell);
			} else {
				self.layers.push(ObstacleLayer::from_cells(class, [cell]));
				created_layer = true;
			}
		}
		let after: Vec<bool> = self.layers.iter().map(|l| l.contains(cell)).collect();
		created_layer || before[..] != after[..before.len()]
	}
	/// From a `ron` file generate the [Level]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, LevelLoadError> {
		let file = std::fs::File::open(path)?;
		let level: Level = ron::de::from_reader(file)?;
		level.get_grid().validate()?;
		Ok(level)
	}
	/// From a `ron` string generate the [Level]
	#[cfg(feature = "ron")]
	pub fn from_ron_str(data: &str) -> Result<Self, LevelLoadError> {
		let level: Level = ron::de::from_str(data)?;
		level.get_grid().validate()?;
		Ok(level)
	}
	/// From a `csv` file of cell codes generate the [Level]
	#[cfg(feature = "csv")]
	pub fn from_csv(path: &str, cell_size: f32) -> Result<Self, LevelLoadError> {
		let file = std::fs::File::open(path)?;
		Level::from_csv_reader(file, cell_size)
	}
	/// From any reader of `csv` cell codes generate the [Level]
	#[cfg(feature = "csv")]
	pub fn from_csv_reader<R: std::io::Read>(
		reader: R,
		cell_size: f32,
	) -> Result<Self, LevelLoadError> {
		let mut rdr = csv::ReaderBuilder::new()
			.has_headers(false)
			.flexible(true)
			.from_reader(reader);
		let mut rows = Vec::new();
		for record in rdr.records() {
			let record = record?;
			let codes: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();
			rows.push(codes);
		}
		let expected = rows.first().map_or(0, |r| r.len());
		for (row, codes) in rows.iter().enumerate() {
			if codes.len() != expected {
				return Err(LevelLoadError::RaggedRow {
					row,
					found: codes.len(),
					expected,
				});
			}
		}
		let dimensions = GridDimensions::new(expected as u32, rows.len() as u32, cell_size);
		let mut grid = WalkableGrid::new_void(dimensions);
		let mut permanent = ObstacleLayer::new(ObstacleClass::Permanent);
		let mut conditional = ObstacleLayer::new(ObstacleClass::Conditional);
		let mut exits = ExitSet::default();
		for (row, codes) in rows.iter().enumerate() {
			for (column, code) in codes.iter().enumerate() {
				let cell = GridCell::new(column as i32, row as i32);
				match code.as_str() {
					"0" => {}
					"1" => grid.set_walkable(cell, true),
					"2" => {
						grid.set_walkable(cell, true);
						permanent.insert(cell);
					}
					"3" => {
						grid.set_walkable(cell, true);
						conditional.insert(cell);
					}
					"4" => {
						grid.set_walkable(cell, true);
						exits.push(cell);
					}
					_ => {
						return Err(LevelLoadError::UnknownCellCode {
							code: code.clone(),
							column,
							row,
						})
					}
				}
			}
		}
		debug!(
			"Loaded level of {}x{} cells with {} exits",
			dimensions.get_columns(),
			dimensions.get_rows(),
			exits.get().len()
		);
		Ok(Level::from_parts(grid, vec![permanent, conditional], exits))
	}
}
