//! Recursive command line arguments parser.
//!
//! A parser is a tree of commands. Every command declares its own options
//! and may have nested subcommands; a flag declared on a command is visible
//! to all of its descendants.
//!
//! ```
//! use argtree::ArgumentParser;
//!
//! let mut app = ArgumentParser::new("app", "Sample tool");
//! let root = app.root();
//! app.add_option(root, "mode", "testing mode").short('m').long("mode").default("test");
//! app.add_option(root, "force", "force do something").short('f').boolean(true);
//!
//! let upload = app.add_subcommand(root, "upload", "Upload file to cloud");
//! app.add_option(upload, "file", "file name").default("a.txt");
//!
//! let outcome = app.parse_args(["upload", "-m", "debug", "--file=b.txt", "-f"]);
//! assert!(outcome.error().is_none());
//! assert_eq!(outcome.title(), "upload");
//!
//! let cx = outcome.context();
//! assert_eq!(cx.get_string("mode").unwrap(), "debug");
//! assert_eq!(cx.get_string("file").unwrap(), "b.txt");
//! assert!(cx.get_bool("force").unwrap());
//! ```
//!
//! Parsing mutates the option state stored in the tree, so a tree serves a
//! single parse. Call [`ArgumentParser::reset`] before parsing again.
//!
//! Syntax accepted for flags:
//!
//! * `--name value`, `--name=value`, `--flag` (boolean flags take no value),
//! * `-n value`, `-nvalue`, `-n=value`,
//! * `-abc` as a shorthand for `-a -b -c` when `a` and `b` are boolean.
//!
//! `--help` and `-h` print usage unless an option claims those spellings.
//! The `--` terminator is rejected.

mod context;
mod flag;
mod parser;
mod tokens;
mod usage;
mod value;

pub use crate::{
    context::{Context, Handler, Outcome},
    flag::{Flag, FlagMut},
    parser::{ArgumentParser, CmdId, FlagId},
    value::Value,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while parsing or reading values back.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("bad flag syntax: {0}")]
    BadFlagSyntax(String),

    #[error("Flag needs an argument: {0}")]
    MissingArgument(String),

    #[error("Unrecognized arguments: --{0}")]
    UnrecognizedFlag(String),

    #[error("Unknown short flag: '{flag}' in -{token}")]
    UnknownFlag { flag: char, token: String },

    #[error("Missing required option: '{0}'")]
    MissingRequiredOption(String),

    #[error("Unknown command: `{0}`")]
    NotFound(String),

    #[error("Unsupported argument: `--`")]
    Unsupported,

    #[error("Unexpected argument: `{0}`")]
    UnexpectedArgument(String),

    #[error("Can't parse argument, invalid utf8: {0:?}")]
    NonUtf8Argument(std::ffi::OsString),

    /// `--help` or `-h` was given. Carries the rendered usage text.
    #[error("{0}")]
    UsageRequested(String),

    #[error("Option `{destination}` does not hold a {expected} value")]
    TypeMismatch { destination: String, expected: &'static str },

    #[error("Unknown option: `{0}`")]
    UnknownDestination(String),

    #[error("missing handler in {0}")]
    MissingHandler(String),

    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl Error {
    /// Whether the error is a request for usage rather than a failure.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::UsageRequested(_))
    }

    /// Prints the error and terminates the process.
    ///
    /// Usage requests go to stdout with exit code 0, everything else is
    /// printed as `err: <message>` with exit code 1.
    pub fn exit(self) -> ! {
        if let Error::UsageRequested(usage) = &self {
            println!("{usage}");
            std::process::exit(0)
        }
        println!("err: {self}");
        std::process::exit(1)
    }
}
