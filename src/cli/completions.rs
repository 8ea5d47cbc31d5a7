//! shell completion scripts for bash, zsh, and fish

use std::str::FromStr;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use super::Cli;

const BIN_NAME: &str = "gridfilter";

/// supported shells for completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

impl FromStr for CompletionShell {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bash" => Ok(Self::Bash),
            "zsh" => Ok(Self::Zsh),
            "fish" => Ok(Self::Fish),
            _ => Err(()),
        }
    }
}

impl CompletionShell {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
        }
    }

    fn to_clap_shell(self) -> Shell {
        match self {
            Self::Bash => Shell::Bash,
            Self::Zsh => Shell::Zsh,
            Self::Fish => Shell::Fish,
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::Zsh, Self::Bash, Self::Fish]
    }
}

/// detect current shell from SHELL environment variable
pub fn detect_shell() -> Option<CompletionShell> {
    std::env::var("SHELL")
        .ok()
        .and_then(|s| s.rsplit('/').next().map(String::from))
        .and_then(|name| name.parse().ok())
}

/// generate completion script content for a shell
pub fn generate_completion(shell: CompletionShell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell.to_clap_shell(), &mut cmd, BIN_NAME, &mut buf);
    buf
}
