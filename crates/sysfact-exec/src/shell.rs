//! Shells a command string can be dispatched through.

/// The shell used to run a resolution's command string.
///
/// The string is handed to the shell unmodified; quoting and word splitting
/// are the shell's problem, not the resolution's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Sh,
    Bash,
    Cmd,
}

impl Shell {
    /// Shell used when the caller does not pick one.
    pub fn default_for_platform() -> Self {
        if cfg!(target_os = "windows") {
            Shell::Cmd
        } else {
            Shell::Sh
        }
    }

    pub fn executable(&self) -> &'static str {
        match self {
            Shell::Sh => "sh",
            Shell::Bash => "bash",
            Shell::Cmd => "cmd.exe",
        }
    }

    /// Flag that makes the shell run one command string and exit.
    pub fn command_flag(&self) -> &'static str {
        match self {
            Shell::Sh | Shell::Bash => "-c",
            Shell::Cmd => "/c",
        }
    }
}
