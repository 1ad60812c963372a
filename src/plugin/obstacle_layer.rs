//! Logic for handling changes to the obstacles of a [Level], each [Level]
//! that changes has its flow field recomputed
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Used to place, replace or clear the obstacle of a cell
#[derive(Event)]
pub struct EventUpdateObstacleCell {
	/// Cell to update
	cell: GridCell,
	/// Obstacle the cell should hold, [None] clears it
	obstacle: Option<ObstacleClass>,
	/// Owner of the [Level] to update, [None] updates every [Level]
	entity: Option<Entity>,
}

impl EventUpdateObstacleCell {
	/// Create a new instance of [EventUpdateObstacleCell] applied to every
	/// [Level]
	pub fn new(cell: GridCell, obstacle: Option<ObstacleClass>) -> Self {
		EventUpdateObstacleCell {
			cell,
			obstacle,
			entity: None,
		}
	}
	/// Shorthand for clearing the obstacle of a cell, such as when a
	/// structure has been destroyed
	pub fn clear(cell: GridCell) -> Self {
		EventUpdateObstacleCell::new(cell, None)
	}
	/// Restrict the update to the [Level] of a single entity
	pub fn with_entity(mut self, entity: Entity) -> Self {
		self.entity = Some(entity);
		self
	}
	pub fn get_cell(&self) -> GridCell {
		self.cell
	}
	pub fn get_obstacle(&self) -> Option<ObstacleClass> {
		self.obstacle
	}
	pub fn get_entity(&self) -> Option<Entity> {
		self.entity
	}
}

/// Read [EventUpdateObstacleCell] and update the obstacle layers of each
/// targeted [Level]. Every [Level] that changed gets a single recompute
/// request
#[cfg(not(tarpaulin_include))]
pub fn process_obstacle_updates(
	mut events: EventReader<EventUpdateObstacleCell>,
	mut query: Query<(Entity, &mut Level)>,
	mut event_recompute: EventWriter<EventRecomputeFlowField>,
) {
	// coalesce events so that many edits in one tick cause one recompute
	let mut changed: Vec<Entity> = Vec::new();
	for event in events.read() {
		for (entity, mut level) in query.iter_mut() {
			if event.get_entity().is_some_and(|target| target != entity) {
				continue;
			}
			let cell = event.get_cell();
			if !level.get_grid().get_dimensions().contains(cell) {
				error!(
					"Cannot update obstacle of {:?} in {:?}, it is outside of the grid",
					cell, entity
				);
				continue;
			}
			if level.set_obstacle(cell, event.get_obstacle()) {
				debug!(
					"Obstacle of {:?} in {:?} set to {:?}",
					cell,
					entity,
					event.get_obstacle()
				);
				if !changed.contains(&entity) {
					changed.push(entity);
				}
			}
		}
	}
	for entity in changed {
		event_recompute.write(EventRecomputeFlowField::for_entity(entity));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn update_targets_every_level_by_default() {
		let event = EventUpdateObstacleCell::new(GridCell::new(1, 1), Some(ObstacleClass::Conditional));
		assert_eq!(None, event.get_entity());
		let event = EventUpdateObstacleCell::clear(GridCell::new(1, 1)).with_entity(Entity::from_raw(3));
		assert_eq!(Some(Entity::from_raw(3)), event.get_entity());
		assert_eq!(None, event.get_obstacle());
	}
}
