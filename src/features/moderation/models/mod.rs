mod gate;

pub use gate::{plan, GatePlan, ModerationAction};
