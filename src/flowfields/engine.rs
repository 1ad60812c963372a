//! The [FlowFieldEngine] owns the most recently published [FlowField] and
//! answers queries against it.
//!
//! A recompute runs the full pipeline:
//!
//! 1. Strict pass from the exits, every obstacle is impassable
//! 2. Find the walkable cells the strict pass could not reach and the
//!    conditional obstacles that act as fallback targets
//! 3. Relaxed pass from the conditional obstacles, only permanent obstacles
//!    are impassable. Equal routes prefer the obstacle that is cheapest to
//!    reach from the exit side
//! 4. Combine both passes into a [FlowField]
//!
//! The new field is built in full before it replaces the old one, a reader
//! holding a snapshot from [FlowFieldEngine::get_snapshot] keeps seeing its
//! own generation.
//!

use std::sync::Arc;

use bevy::prelude::*;

use crate::prelude::*;

/// Reasons a recompute cannot produce a [FlowField]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecomputeError {
	#[error("no exits have been defined")]
	NoExits,
	#[error("none of the {count} exits lie on walkable ground")]
	NoValidExits {
		/// Number of exits that were rejected
		count: usize,
	},
}

/// Whether the engine holds a published [FlowField]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum EngineState {
	/// Never calculated, invalidated or the last recompute failed
	Uninitialized,
	/// A field has been published
	Ready,
}

/// Run both passes over the `classifier` and combine them into a new
/// [FlowField].
///
/// Exits which are not walkable are dropped with a warning and duplicates
/// are collapsed. A classifier without any walkable ground produces an empty
/// field
pub fn build_flow_field<C: GridClassifier>(
	classifier: &C,
	exits: &[GridCell],
	edge_costs: EdgeCosts,
) -> Result<FlowField, RecomputeError> {
	if exits.is_empty() {
		return Err(RecomputeError::NoExits);
	}
	let mut valid_exits: Vec<GridCell> = Vec::with_capacity(exits.len());
	for exit in exits.iter() {
		if !classifier.is_walkable(*exit) {
			warn!("Exit {:?} is not on walkable ground, ignoring it", exit);
		} else if !valid_exits.contains(exit) {
			valid_exits.push(*exit);
		}
	}
	if valid_exits.is_empty() {
		if classifier.get_walkable_cells().is_empty() {
			warn!("Grid has no walkable cells, publishing an empty flow field");
			return Ok(FlowField::default());
		}
		return Err(RecomputeError::NoValidExits { count: exits.len() });
	}
	debug!("Calculating flow field from {} exits", valid_exits.len());
	let strict = IntegrationField::calculate(
		&valid_exits,
		AvoidanceMode::Strict,
		None,
		classifier,
		edge_costs,
	);
	let reachability = Reachability::find(classifier, &strict);
	let relaxed = if reachability.get_unreached().is_empty() {
		IntegrationField::default()
	} else {
		let tie_breaks = reachability.get_fallback_tie_breaks(&strict, classifier, edge_costs);
		IntegrationField::calculate(
			reachability.get_fallback_sources(),
			AvoidanceMode::Relaxed,
			Some(&tie_breaks),
			classifier,
			edge_costs,
		)
	};
	let field = FlowField::combine(&strict, &relaxed, &reachability);
	debug!(
		"Flow field calculated, {} cells reach an exit, {} reach a fallback, {} blocked",
		field.count_status(FlowStatus::ReachesGoal),
		field.count_status(FlowStatus::ReachesFallback),
		field.count_status(FlowStatus::Blocked),
	);
	Ok(field)
}

/// Holds the published [FlowField] of a [Level]
#[derive(Component, Debug, Clone, Default)]
pub struct FlowFieldEngine {
	/// The published field
	current: Option<Arc<FlowField>>,
	/// Incremented on every publish
	generation: u64,
	/// Cost model used by each recompute
	edge_costs: EdgeCosts,
}

impl FlowFieldEngine {
	/// Create a new instance of [FlowFieldEngine]
	pub fn new(edge_costs: EdgeCosts) -> Self {
		FlowFieldEngine {
			current: None,
			generation: 0,
			edge_costs,
		}
	}
	pub fn get_edge_costs(&self) -> EdgeCosts {
		self.edge_costs
	}
	pub fn set_edge_costs(&mut self, edge_costs: EdgeCosts) {
		self.edge_costs = edge_costs;
	}
	/// Rebuild the [FlowField] from the `classifier` and `exits` and publish
	/// it. On failure any previous field is dropped
	pub fn recompute<C: GridClassifier>(
		&mut self,
		classifier: &C,
		exits: &[GridCell],
	) -> Result<(), RecomputeError> {
		let result = build_flow_field(classifier, exits, self.edge_costs);
		self.apply(result)
	}
	/// Rebuild the [FlowField] from a [Level] and publish it
	pub fn recompute_level(&mut self, level: &Level) -> Result<(), RecomputeError> {
		self.recompute(&level.classifier(), level.get_exits().get())
	}
	/// Publish a successful result or drop to [EngineState::Uninitialized]
	/// on a failed one
	pub fn apply(&mut self, result: Result<FlowField, RecomputeError>) -> Result<(), RecomputeError> {
		match result {
			Ok(field) => {
				self.publish(field);
				Ok(())
			}
			Err(e) => {
				error!("Flow field recompute failed: {}", e);
				self.current = None;
				Err(e)
			}
		}
	}
	/// Replace the current field with `field`, returning the new generation
	pub fn publish(&mut self, field: FlowField) -> u64 {
		self.current = Some(Arc::new(field));
		self.generation += 1;
		self.generation
	}
	/// Drop the current field, queries return [FlowNode::BLOCKED] until the
	/// next recompute
	pub fn invalidate(&mut self) {
		if self.current.take().is_some() {
			debug!("Flow field invalidated");
		}
	}
	/// Get the node of `cell`, [FlowNode::BLOCKED] when no field has been
	/// published or the cell has no node
	pub fn get_node(&self, cell: GridCell) -> FlowNode {
		match &self.current {
			Some(field) => field.get_node(cell),
			None => {
				trace!("No flow field published, {:?} is blocked", cell);
				FlowNode::BLOCKED
			}
		}
	}
	pub fn get_state(&self) -> EngineState {
		if self.current.is_some() {
			EngineState::Ready
		} else {
			EngineState::Uninitialized
		}
	}
	pub fn is_ready(&self) -> bool {
		self.get_state() == EngineState::Ready
	}
	/// Number of fields published so far
	pub fn get_generation(&self) -> u64 {
		self.generation
	}
	/// Get a shared handle to the current field, it remains valid after
	/// later recomputes replace it
	pub fn get_snapshot(&self) -> Option<Arc<FlowField>> {
		self.current.clone()
	}
}
