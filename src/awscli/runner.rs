// Runs aws CLI commands
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished command.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandOutput {
    /// The command exited with a zero status.
    pub success: bool,

    /// Everything written to stdout.
    pub stdout: String,

    /// Everything written to stderr.
    pub stderr: String,
}

/// Runs commands of the aws CLI.
///
/// `args` never include the program name itself.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs the command to completion, capturing its output.
    async fn output(&self, args: &[String]) -> io::Result<CommandOutput>;

    /// Runs the command attached to our own stdout and stderr, returning
    /// whether it succeeded.
    async fn status(&self, args: &[String]) -> io::Result<bool>;
}

/// `CommandRunner` that spawns a real process.
#[derive(Debug)]
pub struct AwsCommand {
    program: String,
}

impl AwsCommand {
    /// Return a new `AwsCommand` running `program`.
    pub fn new<P: Into<String>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    // Dropping the returned future, for example when a timeout fires, also
    // kills the child.
    fn command(&self, args: &[String]) -> Command {
        debug!("command: {} {}", self.program, args.join(" "));

        let mut command = Command::new(&self.program);

        command
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        command
    }
}

#[async_trait]
impl CommandRunner for AwsCommand {
    async fn output(&self, args: &[String]) -> io::Result<CommandOutput> {
        let output = self.command(args).output().await?;

        let output = CommandOutput {
            success: output.status.success(),
            stdout:  String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr:  String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!("output: success: {}", output.success);

        Ok(output)
    }

    async fn status(&self, args: &[String]) -> io::Result<bool> {
        let status = self.command(args).status().await?;

        debug!("status: {}", status);

        Ok(status.success())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// `CommandRunner` returning scripted outputs in order and recording
    /// the arguments of every call.
    #[derive(Default)]
    pub struct ScriptedRunner {
        outputs:   Mutex<VecDeque<io::Result<CommandOutput>>>,
        pub delay: Option<Duration>,
        pub calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedRunner {
        pub fn new(outputs: Vec<io::Result<CommandOutput>>) -> Self {
            Self {
                outputs: Mutex::new(outputs.into()),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }

        fn next(&self, args: &[String]) -> io::Result<CommandOutput> {
            self.calls.lock().unwrap().push(args.to_vec());

            self.outputs.lock()
                .unwrap()
                .pop_front()
                .expect("no scripted output left")
        }
    }

    /// Successful command output.
    pub fn success(stdout: &str) -> io::Result<CommandOutput> {
        Ok(CommandOutput {
            success: true,
            stdout:  stdout.into(),
            stderr:  String::new(),
        })
    }

    /// Failed command output.
    pub fn failure(stderr: &str) -> io::Result<CommandOutput> {
        Ok(CommandOutput {
            success: false,
            stdout:  String::new(),
            stderr:  stderr.into(),
        })
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn output(&self, args: &[String]) -> io::Result<CommandOutput> {
            let output = self.next(args);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            output
        }

        async fn status(&self, args: &[String]) -> io::Result<bool> {
            self.next(args).map(|output| output.success)
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_aws_command_output() {
        let runner = AwsCommand::new("sh");

        let args = vec![
            "-c".to_string(),
            "echo listed; echo oops >&2; exit 3".to_string(),
        ];

        let ret = runner.output(&args).await.unwrap();

        let expected = CommandOutput {
            success: false,
            stdout:  "listed\n".into(),
            stderr:  "oops\n".into(),
        };

        assert_eq!(ret, expected);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_aws_command_status() {
        let runner = AwsCommand::new("sh");

        let ok  = runner.status(&["-c".to_string(), "exit 0".to_string()]).await.unwrap();
        let err = runner.status(&["-c".to_string(), "exit 255".to_string()]).await.unwrap();

        assert!(ok);
        assert!(!err);
    }

    #[tokio::test]
    async fn test_aws_command_missing_program() {
        let runner = AwsCommand::new("s3probe-no-such-program");
        let ret    = runner.output(&[]).await;

        assert!(ret.is_err());
    }
}
