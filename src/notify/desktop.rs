//! Platform notification commands.

use log::{debug, warn};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use super::Notifier;
use crate::error::{PrAttentionError, Result};

#[cfg(target_os = "linux")]
const LINUX_SOUND: &str = "/usr/share/sounds/freedesktop/stereo/message-new-instant.oga";

#[cfg(target_os = "macos")]
const MACOS_SOUND: &str = "/System/Library/Sounds/Ping.aiff";

/// Sends notifications with the platform's native tooling.
///
/// - Linux: `notify-send`, sound via `paplay`
/// - macOS: `osascript`, sound via `afplay`
/// - elsewhere: printed to stdout with a terminal bell
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    fn send(&self, title: &str, body: &str) -> Result<()> {
        debug!("Sending notification: {}", title);
        platform_notify(title, body)
    }

    fn play_sound(&self) {
        platform_play_sound();
    }
}

fn run_quiet(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| PrAttentionError::Io(std::io::Error::new(e.kind(), format!("{}: {}", program, e))))?;

    if !status.success() {
        return Err(PrAttentionError::Io(std::io::Error::other(format!(
            "{} exited with {}",
            program, status
        ))));
    }
    Ok(())
}

fn terminal_bell() {
    let mut stdout = std::io::stdout();
    if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
        debug!("Terminal bell failed: {}", e);
    }
}

/// Build the AppleScript for a macOS notification, escaping quotes.
pub fn applescript(title: &str, body: &str) -> String {
    fn quote(s: &str) -> String {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
    format!("display notification {} with title {}", quote(body), quote(title))
}

#[cfg(target_os = "linux")]
fn platform_notify(title: &str, body: &str) -> Result<()> {
    run_quiet("notify-send", &[title, body])
}

#[cfg(target_os = "linux")]
fn platform_play_sound() {
    if Path::new(LINUX_SOUND).exists() {
        if let Err(e) = run_quiet("paplay", &[LINUX_SOUND]) {
            warn!("Failed to play sound: {}", e);
        }
        return;
    }
    terminal_bell();
}

#[cfg(target_os = "macos")]
fn platform_notify(title: &str, body: &str) -> Result<()> {
    let script = applescript(title, body);
    run_quiet("osascript", &["-e", script.as_str()])
}

#[cfg(target_os = "macos")]
fn platform_play_sound() {
    if !Path::new(MACOS_SOUND).exists() {
        terminal_bell();
        return;
    }
    if let Err(e) = run_quiet("afplay", &[MACOS_SOUND]) {
        warn!("Failed to play sound: {}", e);
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn platform_notify(title: &str, body: &str) -> Result<()> {
    println!("[NOTIFICATION] {}: {}", title, body);
    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn platform_play_sound() {
    terminal_bell();
}
