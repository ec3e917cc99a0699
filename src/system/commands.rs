use async_trait::async_trait;
use std::error::Error;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

pub type CommandResult = Result<String, Box<dyn Error + Send + Sync>>;

/// Abstraction for command execution to enable testing without real commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, command: &str, args: &[&str]) -> CommandResult;
}

/// Real command executor backed by tokio::process
pub struct RealCommandExecutor;

#[async_trait]
impl CommandExecutor for RealCommandExecutor {
    async fn execute(&self, command: &str, args: &[&str]) -> CommandResult {
        let output = TokioCommand::new(command)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if output.status.success() {
            Ok(String::from_utf8(output.stdout)?)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!("Command failed ({}): {}", output.status, stderr.trim()).into())
        }
    }
}

/// Demo command executor that returns predefined responses
pub struct DemoCommandExecutor;

impl DemoCommandExecutor {
    fn get_demo_response(&self, command: &str, args: &[&str]) -> Option<&'static str> {
        match (command, args) {
            ("kstat", ["-j", "/zfs|zone_zfs/:::"]) => Some(crate::demo::DEMO_KSTAT_JSON),
            _ => None,
        }
    }
}

#[async_trait]
impl CommandExecutor for DemoCommandExecutor {
    async fn execute(&self, command: &str, args: &[&str]) -> CommandResult {
        if let Some(response) = self.get_demo_response(command, args) {
            Ok(response.to_string())
        } else {
            Err(format!("Demo: Command not mocked: {} {:?}", command, args).into())
        }
    }
}
