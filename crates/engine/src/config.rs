//! Engine configuration.

use std::path::PathBuf;

/// Filesystem and verbosity settings for the external runner invocation.
///
/// Constructed once at process start and handed to the engine; no global
/// settings object exists.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Runner working directory holding `project/`, `env/`, and artifacts.
    pub private_data_dir: PathBuf,
    /// Playbook directory override; defaults to `<private_data_dir>/project`.
    pub project_dir: Option<PathBuf>,
    /// Artifact directory override.
    pub artifact_dir: Option<PathBuf>,
    /// Suppress runner stdout.
    pub quiet: bool,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var            | Default    |
    /// |--------------------|------------|
    /// | `PRIVATE_DATA_DIR` | `/ansible` |
    /// | `PROJECT_DIR`      | unset      |
    /// | `ARTIFACT_DIR`     | unset      |
    /// | `ANSIBLE_QUIET`    | `true`     |
    pub fn from_env() -> Self {
        let private_data_dir =
            PathBuf::from(std::env::var("PRIVATE_DATA_DIR").unwrap_or_else(|_| "/ansible".into()));

        let project_dir = std::env::var("PROJECT_DIR").ok().map(PathBuf::from);
        let artifact_dir = std::env::var("ARTIFACT_DIR").ok().map(PathBuf::from);

        let quiet: bool = std::env::var("ANSIBLE_QUIET")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("ANSIBLE_QUIET must be true or false");

        Self {
            private_data_dir,
            project_dir,
            artifact_dir,
            quiet,
        }
    }

    /// Directory holding playbook files: the project dir when set,
    /// otherwise `<private_data_dir>/project`.
    pub fn playbook_dir(&self) -> PathBuf {
        self.project_dir
            .clone()
            .unwrap_or_else(|| self.private_data_dir.join("project"))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            private_data_dir: PathBuf::from("/ansible"),
            project_dir: None,
            artifact_dir: None,
            quiet: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playbook_dir_defaults_under_private_data_dir() {
        let config = EngineConfig::default();
        assert_eq!(config.playbook_dir(), PathBuf::from("/ansible/project"));
    }

    #[test]
    fn playbook_dir_prefers_project_dir() {
        let config = EngineConfig {
            project_dir: Some(PathBuf::from("/srv/playbooks")),
            ..Default::default()
        };
        assert_eq!(config.playbook_dir(), PathBuf::from("/srv/playbooks"));
    }
}
