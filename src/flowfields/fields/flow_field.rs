//! A [FlowField] is the final, queryable product of a recompute. It maps
//! every walkable cell of a level to a [FlowNode] describing which
//! neighbour an actor standing on the cell should step onto next.
//!
//! It merges two [IntegrationField]s:
//!
//! * the strict pass, expanded from the exits while treating every obstacle
//!   as impassable. Cells it reaches flow towards an exit
//! * the relaxed pass, expanded from the conditional obstacles while only
//!   treating permanent obstacles as impassable. Cells the strict pass
//!   could not reach but the relaxed pass could flow towards the nearest
//!   conditional obstacle, so that an actor trapped behind a barricade
//!   walks up to it and can break through
//!
//! Anything else that is walkable is explicitly marked as blocked.
//!
//! A steering pipeline/character controller should read each node to
//! provide movement.
//!

use std::collections::HashMap;

use bevy::prelude::*;

use crate::prelude::*;

/// Per cell movement directions towards an exit or a fallback target
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlowField(HashMap<GridCell, FlowNode>);

impl FlowField {
	/// Merge the `strict` and `relaxed` passes. Every cell reached by the
	/// strict pass or listed as unreached by `reachability` gets a node:
	///
	/// 1. Reached by the strict pass, [FlowStatus::ReachesGoal]
	/// 2. Unreached by the strict pass but reached by the relaxed pass,
	///    [FlowStatus::ReachesFallback]
	/// 3. Otherwise [FlowNode::BLOCKED]
	///
	/// Panics if a predecessor is not orthogonally adjacent to its cell
	pub fn combine(
		strict: &IntegrationField,
		relaxed: &IntegrationField,
		reachability: &Reachability,
	) -> Self {
		let mut nodes = HashMap::with_capacity(strict.len() + reachability.get_unreached().len());
		for (cell, integration) in strict.get().iter() {
			let ordinal = Ordinal::cell_to_cell_direction(integration.get_predecessor(), *cell);
			nodes.insert(
				*cell,
				FlowNode::new(ordinal, integration.get_cost(), FlowStatus::ReachesGoal),
			);
		}
		for cell in reachability.get_unreached().iter() {
			if nodes.contains_key(cell) {
				continue;
			}
			let node = match relaxed.get().get(cell) {
				Some(integration) => {
					let ordinal =
						Ordinal::cell_to_cell_direction(integration.get_predecessor(), *cell);
					FlowNode::new(ordinal, integration.get_cost(), FlowStatus::ReachesFallback)
				}
				None => FlowNode::BLOCKED,
			};
			nodes.insert(*cell, node);
		}
		FlowField(nodes)
	}
	/// Get a reference to the map of nodes
	pub fn get(&self) -> &HashMap<GridCell, FlowNode> {
		&self.0
	}
	/// Get the node of a cell, [FlowNode::BLOCKED] when the cell has none
	pub fn get_node(&self, cell: GridCell) -> FlowNode {
		self.0.get(&cell).copied().unwrap_or(FlowNode::BLOCKED)
	}
	/// Number of cells with a node
	pub fn len(&self) -> usize {
		self.0.len()
	}
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
	pub fn iter(&self) -> impl Iterator<Item = (&GridCell, &FlowNode)> {
		self.0.iter()
	}
	/// Count the nodes with a [FlowStatus]
	pub fn count_status(&self, status: FlowStatus) -> usize {
		self.0.values().filter(|n| n.get_status() == status).count()
	}
	/// Follow the nodes from `start` until a target is reached, the returned
	/// route includes both `start` and the target. A blocked `start` gives an
	/// empty route.
	///
	/// The walk is capped at the number of nodes in the field so a malformed
	/// field cannot loop forever
	pub fn trace_route(&self, start: GridCell) -> Vec<GridCell> {
		let mut route = Vec::new();
		let mut current = start;
		for _ in 0..=self.len() {
			let node = self.get_node(current);
			if node.is_blocked() {
				return route;
			}
			route.push(current);
			if node.is_target() {
				return route;
			}
			match node.get_step_target(current) {
				Some(next) => current = next,
				None => return route,
			}
		}
		warn!("Route from {:?} did not terminate at a target", start);
		route
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	/// Run both passes over the layout
	fn build(
		grid: &WalkableGrid,
		layers: &[ObstacleLayer],
		exits: &[GridCell],
	) -> FlowField {
		let classifier = LayeredClassifier::new(grid, layers);
		let costs = EdgeCosts::default();
		let strict = IntegrationField::calculate(exits, AvoidanceMode::Strict, None, &classifier, costs);
		let reachability = Reachability::find(&classifier, &strict);
		let tie_breaks = reachability.get_fallback_tie_breaks(&strict, &classifier, costs);
		let relaxed = IntegrationField::calculate(
			reachability.get_fallback_sources(),
			AvoidanceMode::Relaxed,
			Some(&tie_breaks),
			&classifier,
			costs,
		);
		FlowField::combine(&strict, &relaxed, &reachability)
	}
	#[test]
	fn goal_strip() {
		let grid = WalkableGrid::new(GridDimensions::new(4, 1, 1.0));
		let field = build(&grid, &[], &[GridCell::new(0, 0)]);
		assert_eq!(4, field.len());
		let exit = field.get_node(GridCell::new(0, 0));
		assert_eq!(FlowNode::new(Ordinal::Zero, 0, FlowStatus::ReachesGoal), exit);
		let far = field.get_node(GridCell::new(3, 0));
		assert_eq!(FlowNode::new(Ordinal::West, 3, FlowStatus::ReachesGoal), far);
	}
	#[test]
	fn fallback_strip() {
		let grid = WalkableGrid::new(GridDimensions::new(5, 1, 1.0));
		let layers = vec![ObstacleLayer::from_cells(
			ObstacleClass::Conditional,
			[GridCell::new(2, 0)],
		)];
		let field = build(&grid, &layers, &[GridCell::new(0, 0)]);
		let barricade = field.get_node(GridCell::new(2, 0));
		assert_eq!(FlowNode::new(Ordinal::Zero, 0, FlowStatus::ReachesFallback), barricade);
		let far = field.get_node(GridCell::new(4, 0));
		assert_eq!(FlowNode::new(Ordinal::West, 2, FlowStatus::ReachesFallback), far);
		assert_eq!(2, field.count_status(FlowStatus::ReachesGoal));
		assert_eq!(3, field.count_status(FlowStatus::ReachesFallback));
	}
	#[test]
	fn sealed_strip() {
		let grid = WalkableGrid::new(GridDimensions::new(4, 1, 1.0));
		let layers = vec![ObstacleLayer::from_cells(
			ObstacleClass::Permanent,
			[GridCell::new(1, 0)],
		)];
		let field = build(&grid, &layers, &[GridCell::new(0, 0)]);
		// the obstacle cell is walkable ground so it's covered too
		assert_eq!(4, field.len());
		assert_eq!(FlowNode::BLOCKED, field.get_node(GridCell::new(1, 0)));
		assert_eq!(FlowNode::BLOCKED, field.get_node(GridCell::new(3, 0)));
	}
	#[test]
	fn missing_cell_is_sentinel() {
		let field = FlowField::default();
		assert_eq!(FlowNode::BLOCKED, field.get_node(GridCell::new(-3, 9)));
	}
	#[test]
	fn trace_route_to_exit() {
		let grid = WalkableGrid::new(GridDimensions::new(3, 3, 1.0));
		let field = build(&grid, &[], &[GridCell::new(0, 0)]);
		let route = field.trace_route(GridCell::new(2, 2));
		assert_eq!(5, route.len());
		assert_eq!(Some(&GridCell::new(2, 2)), route.first());
		assert_eq!(Some(&GridCell::new(0, 0)), route.last());
	}
	#[test]
	fn trace_route_blocked() {
		let field = FlowField::default();
		assert!(field.trace_route(GridCell::new(0, 0)).is_empty());
	}
}
