use std::collections::BTreeMap;

use crate::{ArgumentParser, CmdId, Error, Flag, FlagId, Result};

/// Callback bound to a command, run by [`Outcome::handle`].
pub type Handler = Box<dyn Fn(&Context<'_>) -> anyhow::Result<()>>;

/// Read access to the options visible from the resolved command: its own
/// and those of all of its ancestors.
pub struct Context<'p> {
    parser: &'p ArgumentParser,
    options: BTreeMap<String, FlagId>,
}

impl<'p> Context<'p> {
    pub fn get_string(&self, destination: &str) -> Result<&'p str> {
        self.lookup(destination)?.read_string()
    }

    pub fn get_bool(&self, destination: &str) -> Result<bool> {
        self.lookup(destination)?.read_bool()
    }

    pub fn contains(&self, destination: &str) -> bool {
        self.options.contains_key(destination)
    }

    /// Visible options ordered by destination.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'p Flag)> + '_ {
        let parser = self.parser;
        self.options.iter().map(move |(destination, &id)| (destination.as_str(), parser.flag_at(id)))
    }

    pub fn parser(&self) -> &'p ArgumentParser {
        self.parser
    }

    fn lookup(&self, destination: &str) -> Result<&'p Flag> {
        match self.options.get(destination) {
            Some(&id) => Ok(self.parser.flag_at(id)),
            None => Err(Error::UnknownDestination(destination.to_string())),
        }
    }
}

/// What [`ArgumentParser::parse_args`] produced.
pub struct Outcome<'p> {
    command: Option<CmdId>,
    context: Context<'p>,
    error: Option<Error>,
}

impl<'p> Outcome<'p> {
    pub(crate) fn new(
        parser: &'p ArgumentParser,
        command: Option<CmdId>,
        options: BTreeMap<String, FlagId>,
        error: Option<Error>,
    ) -> Outcome<'p> {
        Outcome { command, context: Context { parser, options }, error }
    }

    /// The resolved command, unless the command path itself was invalid.
    pub fn command(&self) -> Option<CmdId> {
        self.command
    }

    /// Title of the resolved command, `""` if resolution failed.
    pub fn title(&self) -> &'p str {
        match self.command {
            Some(cmd) => self.context.parser.title(cmd),
            None => "",
        }
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn context(&self) -> &Context<'p> {
        &self.context
    }

    /// Turns the outcome into a plain result, dropping the context.
    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Runs the handler of the resolved command.
    pub fn handle(self) -> Result<()> {
        let Outcome { command, context, error } = self;
        if let Some(err) = error {
            return Err(err);
        }
        let parser = context.parser;
        let title = command.map_or("", |cmd| parser.title(cmd));
        match command.and_then(|cmd| parser.cmd(cmd).handler.as_ref()) {
            Some(handler) => {
                log::debug!("running handler of `{title}`");
                handler(&context).map_err(Error::Handler)
            }
            None => Err(Error::MissingHandler(title.to_string())),
        }
    }

    /// [`Outcome::handle`], terminating the process on any error.
    pub fn handle_or_exit(self) {
        if let Err(err) = self.handle() {
            err.exit()
        }
    }
}
