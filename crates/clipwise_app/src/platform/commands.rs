//! Typed stdin commands and their translation into core messages.

use clipwise_core::{AppViewModel, CloseOrigin, Msg};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  submit <url>     submit a video link
  url <text>       edit the link without submitting
  submit           submit the current link
  reset            clear the session
  like <n>         toggle like on clip n
  copy <n>         copy clip n's link
  download <n>     save clip n to the download directory
  share <n>        share clip n
  preview <n>      open clip n's preview
  close <n>        close the preview (also: esc <n>, backdrop <n>, inside <n>)
  show             redraw
  help             this text
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(String),
    Submit(Option<String>),
    Reset,
    Like(usize),
    Copy(usize),
    Download(usize),
    Share(usize),
    Preview(usize),
    Close(usize, CloseOrigin),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}; type `help`")]
    Unknown(String),
    #[error("`{0}` needs a clip number")]
    MissingIndex(&'static str),
    #[error("{0:?} is not a clip number")]
    BadIndex(String),
    #[error("there is no clip {0}")]
    NoSuchClip(usize),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "submit" | "s" if rest.is_empty() => Command::Submit(None),
        "submit" | "s" => Command::Submit(Some(rest.to_string())),
        "url" => Command::Edit(rest.to_string()),
        "reset" => Command::Reset,
        "like" => Command::Like(parse_index("like", rest)?),
        "copy" => Command::Copy(parse_index("copy", rest)?),
        "download" | "dl" => Command::Download(parse_index("download", rest)?),
        "share" => Command::Share(parse_index("share", rest)?),
        "preview" | "open" => Command::Preview(parse_index("preview", rest)?),
        "close" => Command::Close(parse_index("close", rest)?, CloseOrigin::CloseButton),
        "esc" => Command::Close(parse_index("esc", rest)?, CloseOrigin::DismissKey),
        "backdrop" => Command::Close(parse_index("backdrop", rest)?, CloseOrigin::Backdrop),
        "inside" => Command::Close(parse_index("inside", rest)?, CloseOrigin::Surface),
        "" | "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(command)
}

fn parse_index(command: &'static str, rest: &str) -> Result<usize, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingIndex(command));
    }
    match rest.parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(CommandError::BadIndex(rest.to_string())),
    }
}

/// Messages for `command`, with clip numbers resolved against the cards on
/// screen. Numbers are 1-based as rendered.
pub fn to_msgs(command: Command, view: &AppViewModel) -> Result<Vec<Msg>, CommandError> {
    let clip_id = |index: usize| {
        view.clips
            .get(index - 1)
            .map(|card| card.clip_id.clone())
            .ok_or(CommandError::NoSuchClip(index))
    };

    let msgs = match command {
        Command::Edit(text) => vec![Msg::InputChanged(text)],
        Command::Submit(Some(url)) => vec![Msg::InputChanged(url), Msg::SubmitClicked],
        Command::Submit(None) => vec![Msg::SubmitClicked],
        Command::Reset => vec![Msg::ResetClicked],
        Command::Like(index) => vec![Msg::LikeToggled {
            clip_id: clip_id(index)?,
        }],
        Command::Copy(index) => vec![Msg::CopyLinkClicked {
            clip_id: clip_id(index)?,
        }],
        Command::Download(index) => vec![Msg::DownloadClicked {
            clip_id: clip_id(index)?,
        }],
        Command::Share(index) => vec![Msg::ShareClicked {
            clip_id: clip_id(index)?,
        }],
        Command::Preview(index) => vec![Msg::PreviewOpened {
            clip_id: clip_id(index)?,
        }],
        Command::Close(index, origin) => vec![Msg::PreviewCloseRequested {
            clip_id: clip_id(index)?,
            origin,
        }],
        Command::Show | Command::Help | Command::Quit => Vec::new(),
    };
    Ok(msgs)
}
