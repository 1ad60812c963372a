//! Defines the Bevy [Plugin] for FlowFieldExits
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod flow_layer;
pub mod obstacle_layer;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	Tidy,
	Calculate,
}

/// How a requested recompute is carried out
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum RecomputeMode {
	/// Calculate and publish within the system that handles the request
	#[default]
	Immediate,
	/// Calculate on the [bevy::tasks::AsyncComputeTaskPool] against a copy
	/// of the [Level], the previous field stays published until the task
	/// finishes
	Background,
}

/// Failures while loading [FlowFieldSettings] from disk
#[cfg(feature = "ron")]
#[derive(Debug, thiserror::Error)]
pub enum SettingsLoadError {
	#[error("failed opening settings file: {0}")]
	Io(#[from] std::io::Error),
	#[error("failed deserializing settings: {0}")]
	Ron(#[from] ron::error::SpannedError),
}

/// Tuning of the flow field calculations of an entity
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Reflect)]
pub struct FlowFieldSettings {
	/// Cost model of each step
	edge_costs: EdgeCosts,
	/// Where recomputes run
	recompute_mode: RecomputeMode,
}

impl FlowFieldSettings {
	/// Create a new instance of [FlowFieldSettings]
	pub fn new(edge_costs: EdgeCosts, recompute_mode: RecomputeMode) -> Self {
		FlowFieldSettings {
			edge_costs,
			recompute_mode,
		}
	}
	pub fn get_edge_costs(&self) -> EdgeCosts {
		self.edge_costs
	}
	pub fn get_recompute_mode(&self) -> RecomputeMode {
		self.recompute_mode
	}
	/// From a `ron` file generate the [FlowFieldSettings]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, SettingsLoadError> {
		let file = std::fs::File::open(path)?;
		let settings: FlowFieldSettings = ron::de::from_reader(file)?;
		Ok(settings)
	}
}

pub struct FlowFieldExitsPlugin;

impl Plugin for FlowFieldExitsPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<Ordinal>()
			.register_type::<GridCell>()
			.register_type::<GridDimensions>()
			.register_type::<ObstacleClass>()
			.register_type::<AvoidanceMode>()
			.register_type::<FlowNode>()
			.register_type::<FlowStatus>()
			.register_type::<EdgeCosts>()
			.register_type::<EngineState>()
			.register_type::<RecomputeMode>()
			.register_type::<FlowFieldSettings>()
			.add_event::<obstacle_layer::EventUpdateObstacleCell>()
			.add_event::<flow_layer::EventRecomputeFlowField>()
			.add_event::<flow_layer::EventInvalidateFlowField>()
			.add_event::<flow_layer::EventFlowFieldPublished>()
			.configure_sets(Update, (OrderingSet::Tidy, OrderingSet::Calculate).chain())
			.add_systems(
				Update,
				(
					flow_layer::process_invalidate_requests.in_set(OrderingSet::Tidy),
					(
						obstacle_layer::process_obstacle_updates,
						flow_layer::process_recompute_requests,
						flow_layer::poll_background_recomputes,
					)
						.chain()
						.in_set(OrderingSet::Calculate),
				),
			);
	}
}
