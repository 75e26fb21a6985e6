//! Tells which of the given words read the same backwards.

use std::process::ExitCode;

use clap::{ArgAction, Parser};
use growable_string::{Error, GrowableString};
use tracing::{debug, error, Level};

#[derive(Parser, Debug)]
#[command(name = "palindrome", version, about = "Checks words for being palindromes")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,

    /// Words to check
    #[arg(required = true)]
    words: Vec<String>,
}

fn is_palindrome(word: &str) -> Result<bool, Error> {
    let original = GrowableString::from_bytes(word.as_bytes())?;
    let mut reversed = original.try_clone()?;
    reversed.reverse();
    debug!(%original, %reversed, "Comparing");
    Ok(original.strict_equal(&reversed))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    for word in &cli.words {
        match is_palindrome(word) {
            Ok(true) => println!("{word} is a palindrome!"),
            Ok(false) => println!("{word} is not a palindrome!"),
            Err(e) => {
                error!(%word, "Failed to check word: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
