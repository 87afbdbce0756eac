pub mod climb;
pub mod engine;
pub mod gear_table;
pub mod physics;
pub mod search;

pub use crate::domain::model::{BestResult, ClimbProfile, GearSearchRequest, SearchDomains};
pub use crate::domain::ports::{RequestSource, Storage};
pub use crate::utils::error::Result;
