mod classes;
mod gear_sets;
mod skill_lines;

pub use classes::class_name;
pub use gear_sets::GearSetTable;
pub use skill_lines::{MIN_SKILL_LINE_MATCHES, SkillLine, infer_skill_lines, skill_line_for_ability};
