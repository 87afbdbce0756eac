use crate::domain::model::GearSearchRequest;
use crate::utils::error::Result;

/// Anything that can describe a climb to search over (CLI args, TOML, Lambda events).
pub trait RequestSource {
    fn search_request(&self) -> Result<GearSearchRequest>;
}

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}
