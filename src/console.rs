//! Verbosity-gated console reporting.

use crate::config::ConfigError;
use colored::Colorize;

/// Output level selected with `-v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// `-v 0`: no output at all.
    Quiet,
    /// `-v 1`: progress and short errors.
    #[default]
    Normal,
    /// `-v 2`: adds schema violation detail and full error chains.
    Verbose,
}

impl Verbosity {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Quiet,
            1 => Verbosity::Normal,
            _ => Verbosity::Verbose,
        }
    }
}

/// All user-facing output goes through here so the verbosity contract
/// holds in one place: level 0 prints nothing, ever.
pub struct Console {
    verbosity: Verbosity,
}

impl Console {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Progress line for a completed step.
    pub fn step(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            println!("  {} {message}", "✓".green().bold());
        }
    }

    /// Extra diagnostic detail, shown only at the highest verbosity.
    pub fn detail(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            println!("    {}", message.dimmed());
        }
    }

    /// Report a fatal error: a short message at normal verbosity, the
    /// full cause chain and any schema violation detail at verbose.
    pub fn failure(&self, error: &anyhow::Error) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }

        eprintln!("{} {error}", "error:".red().bold());

        if self.verbosity >= Verbosity::Verbose {
            for cause in error.chain().skip(1) {
                eprintln!("  {} {cause}", "caused by:".dimmed());
            }
            if let Some(ConfigError::SchemaViolation { violations }) =
                error.downcast_ref::<ConfigError>()
            {
                for violation in violations {
                    eprintln!("  {}", violation.dimmed());
                }
            }
        }
    }
}
