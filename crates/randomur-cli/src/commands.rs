//! Line-oriented command parsing for stdin.

use randomur_core::FeedCommand;

pub const HELP: &str = "commands: r (refresh), n (more), o <id> (open), c (close), q (quit)";

/// Parse one input line. Blank lines and unknown words yield `None`.
pub fn parse_command(line: &str) -> Option<FeedCommand> {
    let mut words = line.split_whitespace();
    let command = match words.next()? {
        "r" | "refresh" => FeedCommand::Refresh,
        "n" | "more" => FeedCommand::LoadMore,
        "o" | "open" => FeedCommand::OpenImage(words.next()?.to_string()),
        "c" | "close" => FeedCommand::CloseImage,
        "q" | "quit" => FeedCommand::Shutdown,
        _ => return None,
    };
    Some(command)
}
