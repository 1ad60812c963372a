//! The IntegrationField stores, for every [GridCell] reachable from a set of
//! sources, the cumulative cost of travelling to the nearest source and the
//! neighbour (predecessor) which lies one step closer to it.
//!
//! It is calculated as a multi-source uniform-cost search. Every source is
//! seeded at a cost of `0` and pointing at itself, an expanding wavefront is
//! then processed cheapest-first:
//!
//! 1. Pop the cheapest cell from the frontier, discarding it if a better
//!    route to it has been recorded since it was queued
//! 2. Find its orthogonal neighbours (North, East, South, West)
//! 3. Ignore neighbours that are not walkable or are blocked under the
//!    [AvoidanceMode] of the pass
//! 4. Add the step cost to the current cell's cost and record it on the
//!    neighbour if it's an improvement, queueing the neighbour. A route
//!    whose cost would reach [COST_UNREACHABLE] is never recorded
//! 5. Repeat until the frontier is empty
//!
//! On an open grid this produces the familiar diamond pattern around a
//! source at `(2, 2)`:
//!
//! ```text
//!  _____________________________
//! |     |     |     |     |     |
//! |  4  |  3  |  2  |  3  |  4  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  3  |  2  |  1  |  2  |  3  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  2  |  1  |  0  |  1  |  2  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  3  |  2  |  1  |  2  |  3  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  4  |  3  |  2  |  3  |  4  |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! Equal costs are resolved by a secondary tie-break cost. Each source can
//! be given a tie-break value which is inherited by every cell routed
//! through it, so when a cell is equally close to two sources it routes to
//! the one with the smaller tie-break value. Without a tie-break value the
//! order of the cells themselves decides, which keeps the result
//! deterministic.
//!

use std::{
	cmp::Ordering,
	collections::{BinaryHeap, HashMap},
};

use bevy::prelude::*;

use crate::prelude::*;

/// Largest supported cost of a single step, larger values are lowered to it
pub const MAX_STEP_COST: u32 = u16::MAX as u32;

/// The cost model of moving between neighbouring cells. Every move onto a
/// walkable, unblocked neighbour costs the same
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Reflect)]
pub struct EdgeCosts {
	/// Cost of a single orthogonal step
	#[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_step_cost"))]
	step_cost: u32,
}

/// Read a step cost from disk applying the same limits as [EdgeCosts::new]
#[cfg(feature = "serde")]
fn deserialize_step_cost<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let step_cost = <u32 as serde::Deserialize>::deserialize(deserializer)?;
	Ok(EdgeCosts::new(step_cost).get_step_cost())
}

impl Default for EdgeCosts {
	fn default() -> Self {
		EdgeCosts { step_cost: 1 }
	}
}

impl EdgeCosts {
	/// Create a new instance of [EdgeCosts]. A `step_cost` of `0` would make
	/// every cell equidistant so it is raised to `1`, anything above
	/// [MAX_STEP_COST] is lowered to it
	pub fn new(step_cost: u32) -> Self {
		if step_cost == 0 {
			warn!("A step cost of 0 is not supported, using 1");
		}
		if step_cost > MAX_STEP_COST {
			warn!(
				"A step cost of {} is not supported, using {}",
				step_cost, MAX_STEP_COST
			);
		}
		EdgeCosts {
			step_cost: step_cost.clamp(1, MAX_STEP_COST),
		}
	}
	pub fn get_step_cost(&self) -> u32 {
		self.step_cost
	}
}

/// What the search has recorded about a single cell
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct IntegrationCell {
	/// Cost of reaching the nearest source
	cost: u32,
	/// Tie-break value inherited from the source the route ends at
	tie_break: u32,
	/// Neighbour one step closer to the source, a source points to itself
	predecessor: GridCell,
}

impl IntegrationCell {
	pub fn get_cost(&self) -> u32 {
		self.cost
	}
	pub fn get_tie_break(&self) -> u32 {
		self.tie_break
	}
	pub fn get_predecessor(&self) -> GridCell {
		self.predecessor
	}
}

/// An entry of the search frontier
#[derive(Debug, PartialEq, Eq)]
struct FrontierEntry {
	/// Cost of the route when the entry was queued
	cost: u32,
	/// Tie-break value of the route when the entry was queued
	tie_break: u32,
	/// The cell to expand
	cell: GridCell,
}

impl Ord for FrontierEntry {
	fn cmp(&self, other: &Self) -> Ordering {
		// BinaryHeap is a max-heap, reverse so the cheapest entry is popped first
		(other.cost, other.tie_break, other.cell).cmp(&(self.cost, self.tie_break, self.cell))
	}
}

impl PartialOrd for FrontierEntry {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Costs and predecessors of every cell reached from a set of sources
#[derive(Debug, Default, PartialEq, Clone)]
pub struct IntegrationField(HashMap<GridCell, IntegrationCell>);

impl IntegrationField {
	/// From a list of `sources` expand outward over the walkable cells of the
	/// `classifier` that are not blocked under `mode`, recording the cost of
	/// every reachable cell and its predecessor.
	///
	/// `tie_break_costs` optionally assigns sources a secondary cost used
	/// purely to order routes of equal cost. Sources which aren't walkable
	/// are ignored, if none remain the field is empty
	pub fn calculate<C: GridClassifier>(
		sources: &[GridCell],
		mode: AvoidanceMode,
		tie_break_costs: Option<&HashMap<GridCell, u32>>,
		classifier: &C,
		edge_costs: EdgeCosts,
	) -> Self {
		let mut field = IntegrationField::default();
		let mut frontier = BinaryHeap::new();
		for source in sources.iter() {
			if !classifier.is_walkable(*source) {
				trace!("Ignoring source {:?}, it is not walkable", source);
				continue;
			}
			let tie_break = tie_break_costs
				.and_then(|costs| costs.get(source).copied())
				.unwrap_or(COST_UNREACHABLE);
			if field.relax(*source, 0, tie_break, *source) {
				frontier.push(FrontierEntry {
					cost: 0,
					tie_break,
					cell: *source,
				});
			}
		}
		let step_cost = edge_costs.get_step_cost();
		let mut overflowed = false;
		while let Some(entry) = frontier.pop() {
			// a better route has been recorded since this entry was queued
			if let Some(best) = field.0.get(&entry.cell) {
				if (entry.cost, entry.tie_break) > (best.cost, best.tie_break) {
					continue;
				}
			}
			for neighbour in classifier.get_neighbours(entry.cell) {
				if !classifier.is_walkable(neighbour) || classifier.is_blocked(neighbour, mode) {
					continue;
				}
				let Some(cost) = entry
					.cost
					.checked_add(step_cost)
					.filter(|cost| *cost < COST_UNREACHABLE)
				else {
					overflowed = true;
					continue;
				};
				if field.relax(neighbour, cost, entry.tie_break, entry.cell) {
					frontier.push(FrontierEntry {
						cost,
						tie_break: entry.tie_break,
						cell: neighbour,
					});
				}
			}
		}
		if overflowed {
			warn!(
				"Routes exceeding the maximum cost were dropped, step cost {} is too large for the grid",
				step_cost
			);
		}
		field
	}
	/// Record a route to `cell` if it's cheaper than what is known, or of
	/// equal cost with a smaller tie-break. Returns whether the route was
	/// recorded
	fn relax(&mut self, cell: GridCell, cost: u32, tie_break: u32, predecessor: GridCell) -> bool {
		let candidate = IntegrationCell {
			cost,
			tie_break,
			predecessor,
		};
		match self.0.get_mut(&cell) {
			Some(existing) => {
				if (cost, tie_break) < (existing.cost, existing.tie_break) {
					*existing = candidate;
					true
				} else {
					false
				}
			}
			None => {
				self.0.insert(cell, candidate);
				true
			}
		}
	}
	/// Get a reference to the map of reached cells
	pub fn get(&self) -> &HashMap<GridCell, IntegrationCell> {
		&self.0
	}
	/// Get the cost of reaching a source from `cell`, [None] if unreached
	pub fn get_cost(&self, cell: GridCell) -> Option<u32> {
		self.0.get(&cell).map(|c| c.cost)
	}
	/// Get the neighbour of `cell` one step closer to a source, [None] if
	/// unreached. A source is its own predecessor
	pub fn get_predecessor(&self, cell: GridCell) -> Option<GridCell> {
		self.0.get(&cell).map(|c| c.predecessor)
	}
	/// Get the cost of every reached cell
	pub fn get_costs(&self) -> HashMap<GridCell, u32> {
		self.0.iter().map(|(cell, c)| (*cell, c.cost)).collect()
	}
	/// Get the predecessor of every reached cell
	pub fn get_predecessors(&self) -> HashMap<GridCell, GridCell> {
		self.0.iter().map(|(cell, c)| (*cell, c.predecessor)).collect()
	}
	pub fn contains(&self, cell: GridCell) -> bool {
		self.0.contains_key(&cell)
	}
	/// Number of reached cells
	pub fn len(&self) -> usize {
		self.0.len()
	}
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
