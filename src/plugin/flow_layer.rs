//! Logic relating to [FlowField] generation and publishing
//!

use crate::prelude::*;
use bevy::{
	prelude::*,
	tasks::{block_on, futures_lite::future, AsyncComputeTaskPool, Task},
};

/// Request that the [FlowField] of an entity, or of every entity, is
/// recalculated from its [Level]
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecomputeFlowField(Option<Entity>);

impl EventRecomputeFlowField {
	/// Recompute every entity with a [Level] and a [FlowFieldEngine]
	pub fn all() -> Self {
		EventRecomputeFlowField(None)
	}
	/// Recompute a single entity
	pub fn for_entity(entity: Entity) -> Self {
		EventRecomputeFlowField(Some(entity))
	}
	pub fn get_entity(&self) -> Option<Entity> {
		self.0
	}
}

/// Request that the [FlowField] of an entity, or of every entity, is
/// dropped
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventInvalidateFlowField(Option<Entity>);

impl EventInvalidateFlowField {
	/// Invalidate every [FlowFieldEngine]
	pub fn all() -> Self {
		EventInvalidateFlowField(None)
	}
	/// Invalidate a single entity
	pub fn for_entity(entity: Entity) -> Self {
		EventInvalidateFlowField(Some(entity))
	}
	pub fn get_entity(&self) -> Option<Entity> {
		self.0
	}
}

/// Emitted whenever a new [FlowField] has been published
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFlowFieldPublished {
	/// Owner of the [FlowFieldEngine]
	entity: Entity,
	/// Generation of the published field
	generation: u64,
}

impl EventFlowFieldPublished {
	/// Create a new instance of [EventFlowFieldPublished]
	pub fn new(entity: Entity, generation: u64) -> Self {
		EventFlowFieldPublished { entity, generation }
	}
	pub fn get_entity(&self) -> Entity {
		self.entity
	}
	pub fn get_generation(&self) -> u64 {
		self.generation
	}
}

/// A recompute running on the [AsyncComputeTaskPool]. Inserting a new one
/// drops (and so cancels) any task already in flight
#[derive(Component)]
pub struct PendingRecompute(Task<Result<FlowField, RecomputeError>>);

/// Which entities a batch of events applies to
#[derive(Default)]
struct Targets {
	/// At least one event asked for every entity
	all: bool,
	/// Specific entities
	entities: Vec<Entity>,
}

impl Targets {
	/// Coalesce the entities of a batch of events
	fn from_requests(requests: impl Iterator<Item = Option<Entity>>) -> Self {
		let mut targets = Targets::default();
		for request in requests {
			match request {
				None => targets.all = true,
				Some(entity) => {
					if !targets.entities.contains(&entity) {
						targets.entities.push(entity);
					}
				}
			}
		}
		targets
	}
	/// Whether the `entity` is affected
	fn contains(&self, entity: Entity) -> bool {
		self.all || self.entities.contains(&entity)
	}
	/// Whether any entity is affected
	fn is_empty(&self) -> bool {
		!self.all && self.entities.is_empty()
	}
}

/// Process [EventRecomputeFlowField], either rebuilding the [FlowField]
/// straight away or handing a copy of the [Level] to a background task
/// based on the [FlowFieldSettings] of the entity
#[cfg(not(tarpaulin_include))]
pub fn process_recompute_requests(
	mut events: EventReader<EventRecomputeFlowField>,
	mut query: Query<(
		Entity,
		&Level,
		&mut FlowFieldEngine,
		Option<&FlowFieldSettings>,
		Has<PendingRecompute>,
	)>,
	mut commands: Commands,
	mut event_published: EventWriter<EventFlowFieldPublished>,
) {
	// several systems may request a recompute in the same tick, only run once
	let targets = Targets::from_requests(events.read().map(|e| e.get_entity()));
	if targets.is_empty() {
		return;
	}
	for (entity, level, mut engine, settings, has_pending) in query.iter_mut() {
		if !targets.contains(entity) {
			continue;
		}
		let settings = settings.copied().unwrap_or_default();
		engine.set_edge_costs(settings.get_edge_costs());
		match settings.get_recompute_mode() {
			RecomputeMode::Immediate => {
				// an older background result must not replace this one
				if has_pending {
					commands.entity(entity).remove::<PendingRecompute>();
				}
				debug!("Recomputing flow field of {:?}", entity);
				if engine.recompute_level(level).is_ok() {
					event_published.write(EventFlowFieldPublished::new(
						entity,
						engine.get_generation(),
					));
				}
			}
			RecomputeMode::Background => {
				debug!("Spawning background flow field recompute for {:?}", entity);
				let snapshot = level.clone();
				let edge_costs = settings.get_edge_costs();
				let task_pool = AsyncComputeTaskPool::get();
				let task = task_pool.spawn(async move {
					build_flow_field(
						&snapshot.classifier(),
						snapshot.get_exits().get(),
						edge_costs,
					)
				});
				commands.entity(entity).insert(PendingRecompute(task));
			}
		}
	}
}

/// Check each [PendingRecompute] and publish the result once it's finished
#[cfg(not(tarpaulin_include))]
pub fn poll_background_recomputes(
	mut query: Query<(Entity, &mut FlowFieldEngine, &mut PendingRecompute)>,
	mut commands: Commands,
	mut event_published: EventWriter<EventFlowFieldPublished>,
) {
	for (entity, mut engine, mut pending) in query.iter_mut() {
		if let Some(result) = block_on(future::poll_once(&mut pending.0)) {
			commands.entity(entity).remove::<PendingRecompute>();
			if engine.apply(result).is_ok() {
				debug!("Published background flow field of {:?}", entity);
				event_published.write(EventFlowFieldPublished::new(
					entity,
					engine.get_generation(),
				));
			}
		}
	}
}

/// Process [EventInvalidateFlowField], dropping the [FlowField] and
/// cancelling any recompute still running so it cannot publish afterwards
#[cfg(not(tarpaulin_include))]
pub fn process_invalidate_requests(
	mut events: EventReader<EventInvalidateFlowField>,
	mut query: Query<(Entity, &mut FlowFieldEngine, Has<PendingRecompute>)>,
	mut commands: Commands,
) {
	let targets = Targets::from_requests(events.read().map(|e| e.get_entity()));
	if targets.is_empty() {
		return;
	}
	for (entity, mut engine, has_pending) in query.iter_mut() {
		if !targets.contains(entity) {
			continue;
		}
		engine.invalidate();
		if has_pending {
			commands.entity(entity).remove::<PendingRecompute>();
		}
	}
}
