pub mod cache;
pub mod info;
pub mod registry;

pub use cache::{DEFAULT_RETAINED_ENCOUNTERS, SessionCache};
pub use info::{ContentProgress, EndlessDungeonProgress, LogInfo, TrialProgress, ZoneInfo};
pub use registry::{AbilityCache, AbilityInfo, EffectCache, EffectInfo, PlayerRegistry};
