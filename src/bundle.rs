//! Groups the components needed to calculate and query the flow fields of a
//! [Level]
//!

use crate::prelude::*;
use bevy::prelude::*;

#[derive(Bundle)]
pub struct FlowFieldExitsBundle {
	/// Host-owned ground, obstacles and exits
	level: Level,
	/// Publishes and serves the flow fields
	engine: FlowFieldEngine,
	/// Tuning of the calculations
	settings: FlowFieldSettings,
}

impl FlowFieldExitsBundle {
	/// Create a new instance of [FlowFieldExitsBundle] with default
	/// [FlowFieldSettings]. No flow field is calculated until a
	/// [EventRecomputeFlowField] is sent or [FlowFieldExitsBundle::new_calculated]
	/// is used
	pub fn new(level: Level) -> Self {
		FlowFieldExitsBundle::with_settings(level, FlowFieldSettings::default())
	}
	/// Create a new instance of [FlowFieldExitsBundle] with custom settings
	pub fn with_settings(level: Level, settings: FlowFieldSettings) -> Self {
		FlowFieldExitsBundle {
			level,
			engine: FlowFieldEngine::new(settings.get_edge_costs()),
			settings,
		}
	}
	/// Create a new instance of [FlowFieldExitsBundle] where the flow field
	/// has already been calculated from the `level`
	pub fn new_calculated(level: Level, settings: FlowFieldSettings) -> Result<Self, RecomputeError> {
		let mut bundle = FlowFieldExitsBundle::with_settings(level, settings);
		bundle.engine.recompute_level(&bundle.level)?;
		Ok(bundle)
	}
	/// Create a new instance of [FlowFieldExitsBundle] where the [Level] is
	/// read from a `csv` file of cell codes
	#[cfg(feature = "csv")]
	pub fn from_csv(path: &str, cell_size: f32) -> Result<Self, LevelLoadError> {
		let level = Level::from_csv(path, cell_size)?;
		Ok(FlowFieldExitsBundle::new(level))
	}
	/// Create a new instance of [FlowFieldExitsBundle] where the [Level] is
	/// read from a `ron` file
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, LevelLoadError> {
		let level = Level::from_ron(path)?;
		Ok(FlowFieldExitsBundle::new(level))
	}
	pub fn get_level(&self) -> &Level {
		&self.level
	}
	pub fn get_engine(&self) -> &FlowFieldEngine {
		&self.engine
	}
	pub fn get_settings(&self) -> &FlowFieldSettings {
		&self.settings
	}
}
