//! Plain-text transcript rendering.

use std::io::{self, Write};

use gemchat_ai::{InlineAsset, Message, Part, Role};
use gemchat_common::SessionEvent;
use tokio::sync::broadcast::{self, error::TryRecvError};

pub(crate) const THINKING: &str = "Gemini is thinking…";

fn label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Model => "Gemini",
    }
}

/// Human-readable byte count.
pub(crate) fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

pub(crate) fn describe_asset(asset: &InlineAsset) -> String {
    let kind = if asset.is_image() { "image" } else { "file" };
    format!(
        "[{kind}: {}, {}]",
        asset.mime_type,
        format_size(asset.decoded_len())
    )
}

/// One message as a labelled block; text keeps its line breaks.
pub(crate) fn format_message(message: &Message) -> String {
    let mut out = format!("{}:", label(message.role));
    for part in &message.parts {
        match part {
            Part::Text { text } => {
                for line in text.lines() {
                    out.push_str("\n  ");
                    out.push_str(line);
                }
            }
            Part::InlineData { inline_data } => {
                out.push_str("\n  ");
                out.push_str(&describe_asset(inline_data));
            }
        }
    }
    out
}

pub(crate) fn format_transcript(log: &[Message]) -> String {
    log.iter()
        .map(format_message)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Text to show for one session event, if any.
pub(crate) fn format_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::MessageAppended { message, .. } => Some(format_message(message)),
        SessionEvent::Error(msg) => Some(format!("⚠ {msg}")),
        SessionEvent::AttachmentChanged {
            mime_type: Some(mime),
        } => Some(format!("attached {mime}")),
        SessionEvent::ModelChanged(model) => Some(format!("model: {model}")),
        SessionEvent::CredentialChanged {
            configured,
            remembered,
        } => Some(match (configured, remembered) {
            (false, _) => "API key cleared".to_string(),
            (true, true) => "API key set (remembered on this machine)".to_string(),
            (true, false) => "API key set (this session only)".to_string(),
        }),
        SessionEvent::AttachmentChanged { mime_type: None } | SessionEvent::BusyChanged(_) => None,
    }
}

/// Write one event, if it has a visible form.
pub(crate) fn show(out: &mut impl Write, event: &SessionEvent) -> io::Result<()> {
    if let Some(text) = format_event(event) {
        writeln!(out, "{text}\n")?;
        out.flush()?;
    }
    Ok(())
}

/// Write every event received since the last drain.
pub(crate) fn drain(
    out: &mut impl Write,
    rx: &mut broadcast::Receiver<SessionEvent>,
) -> io::Result<()> {
    loop {
        match rx.try_recv() {
            Ok(event) => show(out, &event)?,
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "transcript renderer fell behind");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(()),
        }
    }
}
