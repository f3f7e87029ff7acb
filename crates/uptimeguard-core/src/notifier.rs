//! User notification through an external presenter executable.
//!
//! The presenter speaks the jamfHelper argument convention and blocks until a
//! button is pressed or its own timeout fires. Its stdout carries the result:
//!
//! | stdout | meaning      |
//! |--------|--------------|
//! | `0`    | button 1     |
//! | `2`    | button 2     |
//! | other  | timeout/cancel |

use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

use crate::error::NotifierError;

/// Extra time granted to the presenter beyond its own timeout before it is killed.
const WATCHDOG_SLACK_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowStyle {
    /// Standard utility window
    Utility,
    /// Heads-up overlay
    Hud,
}

impl WindowStyle {
    fn as_arg(self) -> &'static str {
        match self {
            WindowStyle::Utility => "utility",
            WindowStyle::Hud => "hud",
        }
    }
}

/// What the user did with a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    /// 1-indexed button
    Button(u8),
    TimedOut,
}

/// One modal dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dialog {
    pub style: WindowStyle,
    pub title: String,
    pub heading: String,
    pub description: String,
    pub button1: String,
    pub button2: Option<String>,
    /// 1-indexed
    pub default_button: u8,
    pub icon: PathBuf,
    pub timeout_secs: u64,
    /// When false the user cannot close the window without a button.
    pub cancellable: bool,
}

impl Dialog {
    /// Build the presenter argument list.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-windowType".to_string(),
            self.style.as_arg().to_string(),
            "-title".to_string(),
            self.title.clone(),
            "-heading".to_string(),
            self.heading.clone(),
            "-description".to_string(),
            self.description.clone(),
            "-icon".to_string(),
            self.icon.display().to_string(),
            "-button1".to_string(),
            self.button1.clone(),
        ];
        if let Some(ref button2) = self.button2 {
            args.push("-button2".to_string());
            args.push(button2.clone());
        }
        args.push("-defaultButton".to_string());
        args.push(self.default_button.to_string());
        args.push("-timeout".to_string());
        args.push(self.timeout_secs.to_string());
        if !self.cancellable {
            args.push("-lockHUD".to_string());
        }
        args
    }
}

/// Presents dialogs and blocks until they are dismissed.
pub trait Notifier {
    fn show(&self, dialog: &Dialog) -> Result<Choice, NotifierError>;
}

/// Map presenter stdout to a [`Choice`].
pub fn parse_presenter_output(stdout: &str) -> Choice {
    match stdout.trim() {
        "0" => Choice::Button(1),
        "2" => Choice::Button(2),
        _ => Choice::TimedOut,
    }
}

/// Invokes the presenter executable at a fixed path.
#[derive(Debug, Clone)]
pub struct PresenterNotifier {
    path: PathBuf,
}

impl PresenterNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Notifier for PresenterNotifier {
    fn show(&self, dialog: &Dialog) -> Result<Choice, NotifierError> {
        tracing::debug!(
            heading = %dialog.heading,
            style = dialog.style.as_arg(),
            timeout_secs = dialog.timeout_secs,
            "Showing dialog"
        );

        let mut child = Command::new(&self.path)
            .args(dialog.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| NotifierError::Spawn {
                path: self.path.clone(),
                source,
            })?;

        // Drain stdout while waiting so a chatty presenter cannot fill the pipe.
        let reader = child.stdout.take().map(|mut out| {
            thread::spawn(move || {
                let mut buf = String::new();
                out.read_to_string(&mut buf).map(|_| buf)
            })
        });

        let limit = Duration::from_secs(dialog.timeout_secs + WATCHDOG_SLACK_SECS);
        match child.wait_timeout(limit).map_err(NotifierError::Wait)? {
            Some(status) => {
                tracing::trace!(exit_code = status.code(), "Presenter exited");
            }
            None => {
                tracing::warn!(
                    limit_secs = limit.as_secs(),
                    "Presenter outlived its timeout, killing it"
                );
                if let Err(e) = child.kill() {
                    tracing::error!(error = %e, "Failed to kill presenter");
                }
                if let Err(e) = child.wait() {
                    tracing::error!(error = %e, "Failed to reap presenter");
                }
                return Ok(Choice::TimedOut);
            }
        }

        let stdout = match reader {
            Some(handle) => handle
                .join()
                .map_err(|_| NotifierError::Wait(io::Error::other("stdout reader panicked")))?
                .map_err(NotifierError::Wait)?,
            None => String::new(),
        };
        let choice = parse_presenter_output(&stdout);
        tracing::debug!(?choice, "Dialog dismissed");
        Ok(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog() -> Dialog {
        Dialog {
            style: WindowStyle::Utility,
            title: "IT".into(),
            heading: "Restart".into(),
            description: "Please restart".into(),
            button1: "Restart Now".into(),
            button2: Some("Defer".into()),
            default_button: 2,
            icon: PathBuf::from("/tmp/icon.png"),
            timeout_secs: 180,
            cancellable: true,
        }
    }

    #[test]
    fn parses_buttons_and_timeouts() {
        assert_eq!(parse_presenter_output("0\n"), Choice::Button(1));
        assert_eq!(parse_presenter_output("2"), Choice::Button(2));
        assert_eq!(parse_presenter_output("239"), Choice::TimedOut);
        assert_eq!(parse_presenter_output(""), Choice::TimedOut);
    }

    #[test]
    fn args_include_both_buttons_and_default() {
        let args = dialog().to_args();
        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
        assert_eq!(args[pos("-windowType") + 1], "utility");
        assert_eq!(args[pos("-button2") + 1], "Defer");
        assert_eq!(args[pos("-defaultButton") + 1], "2");
        assert_eq!(args[pos("-timeout") + 1], "180");
        assert!(!args.contains(&"-lockHUD".to_string()));
    }

    #[test]
    fn single_button_locked_dialog() {
        let mut d = dialog();
        d.style = WindowStyle::Hud;
        d.button2 = None;
        d.default_button = 1;
        d.cancellable = false;
        let args = d.to_args();
        assert!(!args.contains(&"-button2".to_string()));
        assert!(args.contains(&"hud".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("-lockHUD"));
    }

    #[cfg(unix)]
    fn script(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("presenter.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn reads_button_from_presenter_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = PresenterNotifier::new(script(dir.path(), "echo 2"));
        assert_eq!(notifier.show(&dialog()).unwrap(), Choice::Button(2));
    }

    #[cfg(unix)]
    #[test]
    fn output_larger_than_pipe_buffer_does_not_stall() {
        let dir = tempfile::tempdir().unwrap();
        // Well past a 64 KiB pipe buffer, then the result code.
        let path = script(dir.path(), "head -c 262144 /dev/zero | tr '\\0' ' '\necho 0");
        let mut d = dialog();
        d.timeout_secs = 1;

        let started = std::time::Instant::now();
        let choice = PresenterNotifier::new(path).show(&d).unwrap();

        assert_eq!(choice, Choice::Button(1));
        assert!(started.elapsed() < Duration::from_secs(WATCHDOG_SLACK_SECS));
    }

    #[test]
    fn missing_presenter_is_spawn_error() {
        let notifier = PresenterNotifier::new("/nonexistent/uptimeguard/presenter");
        assert!(matches!(
            notifier.show(&dialog()),
            Err(NotifierError::Spawn { .. })
        ));
    }
}
