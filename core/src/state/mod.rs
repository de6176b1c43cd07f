pub mod cache;

pub use cache::{MissionState, SessionCache};
