mod combat_state;
#[allow(clippy::module_inception)]
pub mod processor;


pub use combat_state::{CombatTransition, advance_combat_state};
pub use processor::{Dispatch, EventProcessor};
