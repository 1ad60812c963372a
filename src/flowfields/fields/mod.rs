//! The kinds of fields used by the algorithm
//!

pub mod flow_field;
pub mod integration_field;
pub mod reachability;

use bevy::prelude::*;

use crate::prelude::*;

/// How a [GridCell] relates to the targets of the flow fields
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Reflect)]
pub enum FlowStatus {
	/// Cannot reach an exit or a conditional obstacle, or isn't walkable
	#[default]
	Blocked,
	/// Has a route to an exit
	ReachesGoal,
	/// Cut off from every exit but has a route to a conditional obstacle
	ReachesFallback,
}

/// The result of the flow field calculations for a single [GridCell].
///
/// The [Ordinal] of a node points from its cell towards the neighbour
/// that lies one step closer to the target (its predecessor in the search
/// which expanded outward from the targets). An actor moves by stepping onto
/// the cell given by [FlowNode::get_step_target]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Reflect)]
pub struct FlowNode {
	/// Direction to the predecessor
	ordinal: Ordinal,
	/// Cost of reaching the target
	cost: u32,
	/// What the cell can reach
	status: FlowStatus,
}

impl Default for FlowNode {
	fn default() -> Self {
		FlowNode::BLOCKED
	}
}

impl FlowNode {
	/// Returned for any cell that is unresolved, outside the grid or queried
	/// before a flow field exists
	pub const BLOCKED: FlowNode = FlowNode {
		ordinal: Ordinal::Zero,
		cost: COST_UNREACHABLE,
		status: FlowStatus::Blocked,
	};
	/// Create a new instance of [FlowNode]
	pub fn new(ordinal: Ordinal, cost: u32, status: FlowStatus) -> Self {
		FlowNode {
			ordinal,
			cost,
			status,
		}
	}
	/// Direction from this cell towards its predecessor, i.e the neighbour
	/// to step onto
	pub fn get_ordinal(&self) -> Ordinal {
		self.ordinal
	}
	/// `(column, row)` offset from this cell to its predecessor
	pub fn get_predecessor_offset(&self) -> IVec2 {
		self.ordinal.get_offset()
	}
	pub fn get_cost(&self) -> u32 {
		self.cost
	}
	pub fn get_status(&self) -> FlowStatus {
		self.status
	}
	pub fn is_blocked(&self) -> bool {
		self.status == FlowStatus::Blocked
	}
	/// An exit or a conditional obstacle that the node's route ends upon
	pub fn is_target(&self) -> bool {
		!self.is_blocked() && self.cost == 0
	}
	/// For an actor standing on `from` (the cell this node describes) get
	/// the cell it should step onto next. A target returns `from` itself and
	/// a blocked node returns [None]
	pub fn get_step_target(&self, from: GridCell) -> Option<GridCell> {
		if self.is_blocked() {
			None
		} else {
			Some(from.offset(self.get_predecessor_offset()))
		}
	}
}
