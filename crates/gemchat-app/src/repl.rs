//! Interactive line loop over a `Session`.

use std::io::{self, Write};

use gemchat_ai::{ChatError, GenerationClient, Role, Session};
use gemchat_common::SessionEvent;
use gemchat_config::GemchatConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::render;

const HELP: &str = "\
Commands:
  /attach PATH      attach an image or file to the next message
  /detach           drop the pending attachment
  /model [NAME]     show or switch the model
  /key KEY          set the Gemini API key
  /forget           clear the API key and any stored copy
  /remember on|off  keep the API key on this machine or not
  /examples         list suggested prompts
  /ex N             send suggested prompt N
  /history          print the whole conversation
  /help             show this help
  /quit             leave
Anything else is sent as a message. An empty line sends the pending
attachment on its own.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Send(String),
    Attach(String),
    Detach,
    Model(Option<String>),
    Key(String),
    Forget,
    Remember(bool),
    Examples,
    /// 1-based index into the suggestions.
    Example(usize),
    History,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub(crate) fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Send(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match (name, arg) {
        ("attach", "") => Command::Invalid("usage: /attach PATH".into()),
        ("attach", path) => Command::Attach(path.to_string()),
        ("detach", _) => Command::Detach,
        ("model", "") => Command::Model(None),
        ("model", model) => Command::Model(Some(model.to_string())),
        ("key", "") => Command::Invalid("usage: /key KEY".into()),
        ("key", key) => Command::Key(key.to_string()),
        ("forget", _) => Command::Forget,
        ("remember", "on") => Command::Remember(true),
        ("remember", "off") => Command::Remember(false),
        ("remember", _) => Command::Invalid("usage: /remember on|off".into()),
        ("examples", _) => Command::Examples,
        ("ex", n) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::Example(n),
            _ => Command::Invalid("usage: /ex N".into()),
        },
        ("history", _) => Command::History,
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => Command::Invalid(format!("unknown command /{other}, try /help")),
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn is_user_turn(event: &SessionEvent) -> bool {
    matches!(event, SessionEvent::MessageAppended { message, .. } if message.role == Role::User)
}

/// Submit one turn, writing session events while the request is in flight so
/// the user turn shows before the reply arrives.
async fn send(
    out: &mut impl Write,
    session: &Session,
    client: &dyn GenerationClient,
    events: &mut broadcast::Receiver<SessionEvent>,
    text: Option<&str>,
) -> io::Result<()> {
    let submit = session.submit(client, text);
    tokio::pin!(submit);

    let result = loop {
        tokio::select! {
            biased;
            event = events.recv() => match event {
                Ok(event) => {
                    render::show(out, &event)?;
                    if is_user_turn(&event) {
                        writeln!(out, "{}\n", render::THINKING)?;
                        out.flush()?;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "transcript renderer fell behind");
                }
                Err(RecvError::Closed) => break submit.as_mut().await,
            },
            result = &mut submit => break result,
        }
    };
    render::drain(out, events)?;

    match result {
        Ok(_) => {}
        // Validation and busy failures are not published as events.
        Err(e @ (ChatError::Validation(_) | ChatError::Busy)) => writeln!(out, "{e}\n")?,
        Err(e) => debug!(error = %e, "turn failed"),
    }
    Ok(())
}

/// Run until `/quit` or end of input.
pub(crate) async fn run(
    session: &Session,
    client: &dyn GenerationClient,
    config: &GemchatConfig,
) -> std::io::Result<()> {
    let mut events = session.subscribe();
    let mut out = io::stdout();
    let suggestions = &config.session.suggestions;
    let max_bytes = config.attachments.max_file_size_bytes();

    println!("{}\n", render::format_transcript(&session.log()));
    if !session.has_credential() {
        println!("No API key configured. Set one with /key KEY.\n");
    }
    println!("Type /help for commands.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut first = true;
    prompt();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::Empty if session.pending_attachment().is_some() => {
                send(&mut out, session, client, &mut events, None).await?;
            }
            Command::Empty if first => {
                let starter = Some(config.session.starter.as_str());
                send(&mut out, session, client, &mut events, starter).await?;
            }
            Command::Empty => {}
            Command::Send(text) => {
                send(&mut out, session, client, &mut events, Some(&text)).await?;
            }
            Command::Attach(path) => {
                let path = gemchat_common::paths::expand_home(&path);
                // Failures are reported through the event stream.
                let _ = session.attach_file(&path, max_bytes).await;
            }
            Command::Detach => {
                if session.pending_attachment().is_some() {
                    session.clear_attachment();
                    println!("attachment removed\n");
                } else {
                    println!("nothing attached\n");
                }
            }
            Command::Model(None) => println!("model: {}\n", session.model()),
            Command::Model(Some(model)) => {
                if let Err(e) = session.set_model(&model) {
                    println!("{e}\n");
                }
            }
            Command::Key(key) => {
                let _ = session.set_credential(&key);
            }
            Command::Forget => {
                let _ = session.clear_credential();
            }
            Command::Remember(on) => {
                let _ = session.set_remember(on);
            }
            Command::Examples => {
                for (i, s) in suggestions.iter().enumerate() {
                    println!("  {}. {s}", i + 1);
                }
                println!();
            }
            Command::Example(n) => match suggestions.get(n - 1) {
                Some(text) => {
                    send(&mut out, session, client, &mut events, Some(text)).await?;
                }
                None => println!("no suggestion #{n}, see /examples\n"),
            },
            Command::History => println!("{}\n", render::format_transcript(&session.log())),
            Command::Help => println!("{HELP}\n"),
            Command::Invalid(msg) => println!("{msg}\n"),
        }
        first = false;
        render::drain(&mut out, &mut events)?;
        prompt();
    }
    Ok(())
}
