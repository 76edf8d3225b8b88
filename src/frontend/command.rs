//! Parsing of interactive command lines.

use thiserror::Error;

/// One line of user input.
///
/// Clip references are list positions (1-based), ids or unique id prefixes;
/// `None` means the selected clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Ephemeral,
    Paste,
    List,
    Show(Option<String>),
    Select(String),
    Unselect,
    Copy(Option<String>),
    Favorite(Option<String>),
    Delete(Option<String>),
    Connect(String),
    Peers,
    Share,
    Status,
    Help,
    Quit,
    /// Blank input.
    Nothing,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

pub const HELP: &str = "\
Commands:
  add <text>        add a text clip
  ephemeral         arm or disarm self-destruct for the next clip
  paste             capture the system clipboard
  list              show the history
  show [clip]       show one clip in full
  select <clip>     select a clip
  unselect          clear the selection
  copy [clip]       copy a clip to the system clipboard
  fav [clip]        toggle favorite
  delete [clip]     delete a clip
  connect <link>    connect to another device
  peers             list connected devices
  share             print this device's share links
  status            show the sync status
  help              show this help
  quit              exit

[clip] is a list number, a clip id or an id prefix; it defaults to the selected clip.";

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Nothing);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        let command = match name.to_ascii_lowercase().as_str() {
            "add" | "a" => Command::Add(required(argument, "add", "some text")?),
            "ephemeral" | "eph" => Command::Ephemeral,
            "paste" | "p" => Command::Paste,
            "list" | "ls" | "l" => Command::List,
            "show" => Command::Show(argument),
            "select" | "sel" => Command::Select(required(argument, "select", "a clip")?),
            "unselect" => Command::Unselect,
            "copy" | "c" => Command::Copy(argument),
            "fav" | "favorite" => Command::Favorite(argument),
            "delete" | "del" | "rm" => Command::Delete(argument),
            "connect" => Command::Connect(required(argument, "connect", "a share link")?),
            "peers" => Command::Peers,
            "share" => Command::Share,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn required(
    argument: Option<String>,
    command: &'static str,
    what: &'static str,
) -> Result<String, ParseError> {
    argument.ok_or(ParseError::MissingArgument {
        command,
        argument: what,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_the_rest_of_the_line() {
        assert_eq!(
            Command::parse("add   fn main() {  }  ").unwrap(),
            Command::Add("fn main() {  }".to_string())
        );
    }

    #[test]
    fn clip_references_are_optional_where_selection_applies() {
        assert_eq!(Command::parse("copy").unwrap(), Command::Copy(None));
        assert_eq!(
            Command::parse("rm 3").unwrap(),
            Command::Delete(Some("3".to_string()))
        );
        assert_eq!(
            Command::parse("FAV 1a2b").unwrap(),
            Command::Favorite(Some("1a2b".to_string()))
        );
    }

    #[test]
    fn missing_arguments_are_reported() {
        assert_eq!(
            Command::parse("connect").unwrap_err(),
            ParseError::MissingArgument {
                command: "connect",
                argument: "a share link",
            }
        );
        assert!(Command::parse("add    ").is_err());
        assert!(Command::parse("select").is_err());
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(Command::parse("   ").unwrap(), Command::Nothing);
        assert_eq!(
            Command::parse("frobnicate now").unwrap_err(),
            ParseError::Unknown("frobnicate".to_string())
        );
    }
}
