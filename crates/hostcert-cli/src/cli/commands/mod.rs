//! Command implementations.

pub mod config;
pub mod inspect;
pub mod provision;

use std::path::PathBuf;

use crate::config::Config;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Defaults loaded from the config file
    pub config: Config,

    /// Verbose output
    pub verbose: bool,
}

impl Context {
    /// Output root: flag, then config file, then `out`.
    pub fn out_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.config.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from("out"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_dir_precedence() {
        let mut ctx = Context {
            config: Config::default(),
            verbose: false,
        };
        assert_eq!(ctx.out_dir(None), PathBuf::from("out"));

        ctx.config.out_dir = Some(PathBuf::from("/srv/machines"));
        assert_eq!(ctx.out_dir(None), PathBuf::from("/srv/machines"));
        assert_eq!(ctx.out_dir(Some(PathBuf::from("here"))), PathBuf::from("here"));
    }
}
