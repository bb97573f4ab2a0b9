// Notification delivery sink
// reason: tokio::process for the optional external notifier command

use carcare_core::domain::{NotificationRequest, NotificationSound};
use carcare_core::port::DispatchError;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{info, warn};

/// Upper bound for an external notifier run (10 seconds)
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a due notification ends up
#[derive(Debug, Clone)]
pub enum DeliverySink {
    /// Emit a structured log event
    Log,
    /// Run an external program with the title and body as arguments.
    /// Content is also exposed through `CARCARE_NOTIFICATION_*` variables.
    Command { program: String, args: Vec<String> },
}

impl DeliverySink {
    /// Parse a whitespace-separated command line; empty means `Log`
    pub fn from_command_line(command: Option<&str>) -> Self {
        let mut parts = command.unwrap_or_default().split_whitespace();
        match parts.next() {
            Some(program) => DeliverySink::Command {
                program: program.to_string(),
                args: parts.map(str::to_string).collect(),
            },
            None => DeliverySink::Log,
        }
    }

    pub async fn deliver(&self, request: &NotificationRequest) -> Result<(), DispatchError> {
        match self {
            DeliverySink::Log => {
                info!(
                    identifier = %request.identifier,
                    title = %request.content.title,
                    body = %request.content.body,
                    critical = request.content.sound == NotificationSound::Critical,
                    badge = request.content.badge,
                    category = %request.content.category,
                    "Maintenance reminder"
                );
                Ok(())
            }
            DeliverySink::Command { program, args } => run_command(program, args, request).await,
        }
    }
}

async fn run_command(
    program: &str,
    args: &[String],
    request: &NotificationRequest,
) -> Result<(), DispatchError> {
    let content = &request.content;
    let sound = match content.sound {
        NotificationSound::Critical => "critical",
        NotificationSound::Standard => "standard",
    };

    let child = Command::new(program)
        .args(args)
        .arg(&content.title)
        .arg(&content.body)
        .env("CARCARE_NOTIFICATION_ID", &request.identifier)
        .env("CARCARE_NOTIFICATION_TITLE", &content.title)
        .env("CARCARE_NOTIFICATION_BODY", &content.body)
        .env("CARCARE_NOTIFICATION_CATEGORY", &content.category)
        .env("CARCARE_NOTIFICATION_SOUND", sound)
        .env("CARCARE_NOTIFICATION_BADGE", if content.badge { "1" } else { "0" })
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| DispatchError::Unavailable(format!("cannot spawn {}: {}", program, e)))?;

    let output = match timeout(DELIVERY_TIMEOUT, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(DispatchError::Unavailable(e.to_string())),
        Err(_) => {
            return Err(DispatchError::Unavailable(format!(
                "{} timed out after {:?}",
                program, DELIVERY_TIMEOUT
            )))
        }
    };

    if output.status.success() {
        info!(identifier = %request.identifier, program, "Reminder delivered");
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            identifier = %request.identifier,
            program,
            exit_code = ?output.status.code(),
            stderr = %stderr.trim(),
            "Notifier command failed"
        );
        Err(DispatchError::Rejected(format!(
            "{} exited with {:?}",
            program,
            output.status.code()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carcare_core::domain::{MaintenanceType, ReminderTier};
    use chrono::{FixedOffset, TimeZone};

    fn request() -> NotificationRequest {
        let fire_at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 5, 1, 9, 0, 0)
            .unwrap();
        NotificationRequest::new(MaintenanceType::ReplaceChain, ReminderTier::FinalWeek, fire_at)
    }

    #[test]
    fn test_empty_command_means_log() {
        assert!(matches!(DeliverySink::from_command_line(None), DeliverySink::Log));
        assert!(matches!(
            DeliverySink::from_command_line(Some("   ")),
            DeliverySink::Log
        ));
    }

    #[test]
    fn test_command_line_split() {
        match DeliverySink::from_command_line(Some("notify-send -u normal")) {
            DeliverySink::Command { program, args } => {
                assert_eq!(program, "notify-send");
                assert_eq!(args, vec!["-u", "normal"]);
            }
            DeliverySink::Log => panic!("expected command sink"),
        }
    }

    #[tokio::test]
    async fn test_log_sink_always_succeeds() {
        assert!(DeliverySink::Log.deliver(&request()).await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_rejected() {
        let sink = DeliverySink::from_command_line(Some("false"));
        assert!(matches!(
            sink.deliver(&request()).await,
            Err(DispatchError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let sink = DeliverySink::from_command_line(Some("/nonexistent/carcare-notifier"));
        assert!(matches!(
            sink.deliver(&request()).await,
            Err(DispatchError::Unavailable(_))
        ));
    }
}
