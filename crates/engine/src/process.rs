//! Subprocess engine shelling out to `ansible-runner run`.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::EngineConfig;
use crate::event::{EventSink, RawStatus};
use crate::request::ExecutionRequest;
use crate::{EngineError, EngineOutcome, PlaybookEngine};

/// Runs playbooks as `ansible-runner` child processes.
///
/// Emits `starting` before the spawn, `running` once the child is up, and
/// `successful`/`failed` from the exit status, with `{"rc": <code>}` as the
/// result payload. A spawn failure returns an error without a terminal
/// event; the dispatcher surfaces `failed` on this engine's behalf.
pub struct ProcessEngine {
    config: EngineConfig,
}

impl ProcessEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Stage extravars where the runner picks them up:
    /// `<private_data_dir>/env/extravars`.
    async fn write_extravars(&self, request: &ExecutionRequest) -> Result<(), EngineError> {
        if request.extravars.is_empty() {
            return Ok(());
        }

        let env_dir = self.config.private_data_dir.join("env");
        tokio::fs::create_dir_all(&env_dir)
            .await
            .map_err(EngineError::Staging)?;

        let body = serde_json::to_vec(&request.extravars)?;
        tokio::fs::write(env_dir.join("extravars"), body)
            .await
            .map_err(EngineError::Staging)
    }

    fn build_command(&self, request: &ExecutionRequest) -> Command {
        let mut cmd = Command::new("ansible-runner");
        cmd.arg("run")
            .arg(&self.config.private_data_dir)
            .arg("-p")
            .arg(&request.playbook)
            .arg("--ident")
            .arg(request.identifier.to_string());

        if let Some(project_dir) = &self.config.project_dir {
            cmd.arg("--project-dir").arg(project_dir);
        }
        if let Some(artifact_dir) = &self.config.artifact_dir {
            cmd.arg("--artifact-dir").arg(artifact_dir);
        }
        if !request.cmdline.is_empty() {
            cmd.arg("--cmdline").arg(&request.cmdline);
        }
        if self.config.quiet {
            cmd.arg("-q");
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        cmd.stdin(Stdio::null());
        // The dispatcher may drop this future on watchdog expiry; reap the
        // child with it.
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl PlaybookEngine for ProcessEngine {
    async fn run(
        &self,
        request: ExecutionRequest,
        sink: EventSink,
    ) -> Result<EngineOutcome, EngineError> {
        self.write_extravars(&request).await?;

        sink.emit(RawStatus::starting()).await;

        let mut child = self
            .build_command(&request)
            .spawn()
            .map_err(EngineError::Spawn)?;

        sink.emit(RawStatus::running()).await;

        let status = child.wait().await.map_err(EngineError::Wait)?;
        let rc = status.code();
        let result = serde_json::json!({ "rc": rc });

        tracing::info!(
            identifier = %request.identifier,
            playbook = %request.playbook,
            rc = ?rc,
            "Playbook process exited",
        );

        if status.success() {
            sink.emit(RawStatus::successful().with_result(result)).await;
        } else {
            sink.emit(RawStatus::failed().with_result(result)).await;
        }

        Ok(EngineOutcome {
            identifier: request.identifier,
            rc,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use runbook_core::types::JobId;

    use super::*;
    use crate::request::ExtraVars;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.as_std()
            .get_args()
            .map(|arg: &OsStr| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn command_targets_private_data_dir_and_playbook() {
        let engine = ProcessEngine::new(EngineConfig::default());
        let identifier = JobId::new_v4();
        let request = ExecutionRequest::new(identifier, "site.yml", None, None);

        let cmd = engine.build_command(&request);
        let args = args_of(&cmd);

        assert_eq!(cmd.as_std().get_program().to_string_lossy(), "ansible-runner");
        assert_eq!(args[0], "run");
        assert_eq!(args[1], "/ansible");
        assert!(args.windows(2).any(|w| w[0] == "-p" && w[1] == "site.yml"));
        assert!(args
            .windows(2)
            .any(|w| w[0] == "--ident" && w[1] == identifier.to_string()));
        assert!(args.contains(&"-q".to_string()));
        assert!(!args.contains(&"--cmdline".to_string()));
    }

    #[test]
    fn tag_filter_passes_through_cmdline() {
        let engine = ProcessEngine::new(EngineConfig::default());
        let request = ExecutionRequest::new(
            JobId::new_v4(),
            "site.yml",
            Some(ExtraVars::new()),
            Some(vec!["tag1".to_string(), "tag2".to_string()]),
        );

        let args = args_of(&engine.build_command(&request));
        assert!(args
            .windows(2)
            .any(|w| w[0] == "--cmdline" && w[1] == "--tags tag1,tag2"));
    }

    #[test]
    fn verbose_config_omits_quiet_flag() {
        let engine = ProcessEngine::new(EngineConfig {
            quiet: false,
            ..Default::default()
        });
        let request = ExecutionRequest::new(JobId::new_v4(), "site.yml", None, None);

        let args = args_of(&engine.build_command(&request));
        assert!(!args.contains(&"-q".to_string()));
    }
}
