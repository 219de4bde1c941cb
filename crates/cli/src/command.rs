//! Line commands accepted on stdin.

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the search text without submitting.
    Type(String),
    /// Replace the search text and submit it.
    Search(String),
    /// Submit the current search text.
    Submit,
    Page(u32),
    /// Open the n-th movie (1-based) of the current page.
    Open(usize),
    Close,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  search <text>   search for movies (empty text returns to the latest releases)
  type <text>     change the search text without submitting
  submit          submit the current search text
  page <n>        go to page n
  open <n>        show details of the n-th movie on this page
  close           close the details
  show            print the current page again
  quit            exit";

/// Parse one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "type" => Command::Type(rest.to_string()),
        "search" | "s" => Command::Search(rest.to_string()),
        "submit" => Command::Submit,
        "page" | "p" => Command::Page(parse_number(rest, "page")?),
        "open" | "o" => Command::Open(parse_number(rest, "open")?),
        "close" | "c" => Command::Close,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

fn parse_number<T: std::str::FromStr>(value: &str, command: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("'{}' expects a number, got '{}'", command, value))
}
