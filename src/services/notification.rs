//! Desktop notifications through `notify-send`

use tokio::process::Command;
use tracing::{debug, info};

/// Send a desktop notification
pub async fn send_notification(title: &str, body: &str) -> Result<(), String> {
    debug!("Sending notification: {}", body);

    let output = Command::new("notify-send")
        .args(["--app-name", title, title, body])
        .output()
        .await
        .map_err(|e| format!("Failed to execute notify-send: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("notify-send failed: {}", stderr));
    }

    info!("Notification delivered: {}", body);
    Ok(())
}

/// Check if a command can be executed on this system
pub async fn check_command_available(program: &str) -> Result<(), String> {
    Command::new(program)
        .arg("--version")
        .output()
        .await
        .map_err(|_| format!("{} is not available", program))?;

    debug!("{} is available", program);
    Ok(())
}
