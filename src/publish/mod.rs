pub mod repository;
pub mod steps;

pub use repository::{parse_github_remote, RepositoryInfo};
pub use steps::{PublishStep, Publisher, StepOutcome, DEFAULT_MESSAGE_PREFIX};
