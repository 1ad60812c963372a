//! `use bevy_flowfield_exits_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::flowfields::{
	engine::*,
	fields::{flow_field::*, integration_field::*, reachability::*, *},
	grid::{classifier::*, level::*, obstacles::*, *},
	utilities::*,
	*,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	plugin::{flow_layer::*, obstacle_layer::*, *},
};
