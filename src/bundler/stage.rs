//! Pipeline stages and their static properties.

use std::fmt;

/// One step of the release pipeline.
///
/// Stages are named after the CLI command that requests them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Compile the executable.
    Build,
    /// Assemble the `.app` bundle.
    Bundle,
    /// Pack the bundle into a `.dmg`.
    Package,
    /// Open the disk image.
    Install,
}

impl Stage {
    /// All stages in dependency order.
    pub const ALL: [Stage; 4] = [Stage::Build, Stage::Bundle, Stage::Package, Stage::Install];

    /// CLI command that requests this stage.
    pub fn command(&self) -> &'static str {
        match self {
            Stage::Build => "binary",
            Stage::Bundle => "app",
            Stage::Package => "dmg",
            Stage::Install => "install",
        }
    }

    /// Look a stage up by its CLI command name.
    pub fn from_command(command: &str) -> Option<Stage> {
        Stage::ALL.into_iter().find(|s| s.command() == command)
    }

    /// One-line description for the help listing.
    pub fn description(&self) -> &'static str {
        match self {
            Stage::Build => "Build the executable with the selected features",
            Stage::Bundle => "Copy the .app template and insert the executable",
            Stage::Package => "Pack the .app bundle into a .dmg disk image",
            Stage::Install => "Open the disk image to mount and install it",
        }
    }

    /// The stage whose output this stage consumes.
    pub fn prerequisite(&self) -> Option<Stage> {
        match self {
            Stage::Build => None,
            Stage::Bundle => Some(Stage::Build),
            Stage::Package => Some(Stage::Bundle),
            Stage::Install => Some(Stage::Package),
        }
    }

    /// Whether the stage's tool does its own incremental check.
    ///
    /// Cargo knows every input of a build (build scripts, path dependencies,
    /// workspace members), so `Build` always hands over to it. Cargo leaves
    /// an up-to-date executable untouched, which keeps later stages fresh.
    pub fn delegates_staleness(&self) -> bool {
        matches!(self, Stage::Build)
    }

    /// Where the stage's artifact lives, relative to the release directory.
    ///
    /// `None` for stages without an output artifact; those always run.
    pub fn artifact_pattern(&self) -> Option<&'static str> {
        match self {
            Stage::Build => Some("{ReleaseDirectory}/{binary}"),
            Stage::Bundle => Some("{ReleaseDirectory}/osx/{AppName}"),
            Stage::Package => Some("{ReleaseDirectory}/osx/{DmgName}"),
            Stage::Install => None,
        }
    }

    /// Key used in the persisted state file.
    pub(crate) fn state_key(&self) -> &'static str {
        match self {
            Stage::Build => "build",
            Stage::Bundle => "bundle",
            Stage::Package => "package",
            Stage::Install => "install",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_command(stage.command()), Some(stage));
        }
        assert_eq!(Stage::from_command("clean"), None);
    }

    #[test]
    fn prerequisites_form_a_chain() {
        assert_eq!(Stage::Build.prerequisite(), None);
        assert_eq!(Stage::Install.prerequisite(), Some(Stage::Package));
        assert!(Stage::Install.artifact_pattern().is_none());
    }
}
