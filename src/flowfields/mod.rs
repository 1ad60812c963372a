//! Flowfields are a means of handling pathfinding for a crowd of actors.
//!
//! [Fixing Pathfinding Once and For All](https://web.archive.org/web/20150905073624/http://www.ai-blog.net/archives/000152.html)
//!
//! [jdxdev](https://www.jdxdev.com/blog/2020/05/03/flowfields/)
//!
//! [leifnode](https://leifnode.com/2013/12/flow-field-pathfinding/)
//!
//! Rather than each actor calculating its own route, a single field is
//! calculated for the whole grid pointing every walkable cell towards the
//! nearest of several exits. Any number of actors then navigate by reading
//! the cell they stand on.
//!
//! Obstacles placed upon the grid come in two classes:
//!
//! * Permanent - never walkable, a cliff or the boundary wall of a level
//! * Conditional - a structure that can be destroyed. Actors seeking an exit
//!   treat it as impassable, but an actor completely sealed off from every
//!   exit will instead walk up to the nearest conditional obstacle so it can
//!   break through
//!
//! Definitions:
//!
//! * Grid - a rectangle of `columns x rows` cells indexed from the top-left
//!   corner, each cell is walkable ground or void
//!
//! ```text
//!  _____________________________
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! ```
//!
//! * Level - the grid, the obstacle layers placed upon it and the exits
//! * Integration field - the cost-to-target of every cell reachable from a
//!   set of targets, along with the neighbour one step closer to the target
//! * Flow field - the per cell direction of movement and whether the cell
//!   reaches an exit, reaches a fallback obstacle or is blocked
//!

pub mod engine;
pub mod fields;
pub mod grid;
pub mod utilities;
