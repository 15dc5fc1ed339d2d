use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Request method suffix of the corpus files, indexed by phase number.
const PHASE_ACTIONS: [&str; 3] = ["get", "post", "get"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase(u8);

impl Phase {
    /// # Errors
    ///
    /// Returns an error unless `number` is 1, 2, or 3.
    pub fn new(number: u8) -> Result<Self, ConfigError> {
        match number {
            1..=3 => Ok(Self(number)),
            _ => Err(ConfigError::InvalidPhase { phase: number }),
        }
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn action(self) -> &'static str {
        let index = usize::from(self.0).saturating_sub(1);
        PHASE_ACTIONS.get(index).copied().unwrap_or("get")
    }

    #[must_use]
    pub fn request_file(self, root: &Path) -> PathBuf {
        root.join("ammo").join(format!("{}ammo", self.file_prefix()))
    }

    #[must_use]
    pub fn answer_file(self, root: &Path) -> PathBuf {
        root.join("answers")
            .join(format!("{}answ", self.file_prefix()))
    }

    fn file_prefix(self) -> String {
        format!("phase_{}_{}.", self.0, self.action())
    }
}
