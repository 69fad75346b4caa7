//! Port for displaying a rendered chart artifact.

use crate::domain::error::MarketError;
use std::path::Path;

pub trait ViewerPort {
    /// Hand the artifact at `path` to a viewer. Returns once the viewer has
    /// been launched, not when it exits.
    fn open(&self, path: &Path) -> Result<(), MarketError>;
}
