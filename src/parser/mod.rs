pub mod feature;
pub mod types;

pub use feature::{parse_feature_content, parse_feature_file};
pub use types::{Feature, Scenario, Step, StepArgument};
