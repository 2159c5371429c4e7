use std::{
    collections::{BTreeMap, HashMap},
    ffi::OsString,
};

use crate::{
    context::{Context, Handler, Outcome},
    flag::{Flag, FlagMut},
    tokens::Tokens,
    Error, Result, Value,
};

/// Handle of a command node inside an [`ArgumentParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CmdId(usize);

impl CmdId {
    pub(crate) const ROOT: CmdId = CmdId(0);
}

/// Handle of a declared option inside an [`ArgumentParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlagId(usize);

pub(crate) struct Command {
    pub(crate) name: String,
    pub(crate) title: String,
    pub(crate) help: String,
    pub(crate) parent: Option<CmdId>,
    pub(crate) root: CmdId,
    /// destination -> flag
    pub(crate) flags: BTreeMap<String, FlagId>,
    pub(crate) short_index: HashMap<char, FlagId>,
    pub(crate) long_index: HashMap<String, FlagId>,
    pub(crate) subcommands: BTreeMap<String, CmdId>,
    pub(crate) handler: Option<Handler>,
}

impl Command {
    fn new(name: &str, title: &str, help: &str, parent: Option<CmdId>, root: CmdId) -> Command {
        Command {
            name: name.to_string(),
            title: title.to_string(),
            help: help.to_string(),
            parent,
            root,
            flags: BTreeMap::new(),
            short_index: HashMap::new(),
            long_index: HashMap::new(),
            subcommands: BTreeMap::new(),
            handler: None,
        }
    }
}

/// A tree of commands together with the options declared on them.
///
/// Commands and options live in arenas owned by the parser and are
/// addressed through [`CmdId`] and [`FlagId`]. The tree is built first and
/// parsed afterwards; parsing records the bound values in the tree itself.
pub struct ArgumentParser {
    commands: Vec<Command>,
    flags: Vec<Flag>,
}

impl ArgumentParser {
    pub fn new(name: &str, help: &str) -> ArgumentParser {
        ArgumentParser {
            commands: vec![Command::new(name, "root", help, None, CmdId::ROOT)],
            flags: Vec::new(),
        }
    }

    pub fn root(&self) -> CmdId {
        CmdId::ROOT
    }

    pub fn add_subcommand(&mut self, parent: CmdId, name: &str, help: &str) -> CmdId {
        let id = CmdId(self.commands.len());
        let root = self.cmd(parent).root;
        self.commands.push(Command::new(name, name, help, Some(parent), root));
        self.cmd_mut(parent).subcommands.insert(name.to_string(), id);
        id
    }

    /// Declares an option on `cmd`. Re-using a destination replaces the
    /// earlier declaration.
    pub fn add_option(&mut self, cmd: CmdId, destination: &str, help: &str) -> FlagMut<'_> {
        let id = FlagId(self.flags.len());
        self.flags.push(Flag::new(cmd, destination, help));
        self.cmd_mut(cmd).flags.insert(destination.to_string(), id);
        FlagMut::new(self, id)
    }

    pub fn set_handler<F>(&mut self, cmd: CmdId, handler: F)
    where
        F: Fn(&Context<'_>) -> anyhow::Result<()> + 'static,
    {
        self.cmd_mut(cmd).handler = Some(Box::new(handler));
    }

    pub fn name(&self, cmd: CmdId) -> &str {
        &self.cmd(cmd).name
    }

    pub fn title(&self, cmd: CmdId) -> &str {
        &self.cmd(cmd).title
    }

    pub fn help(&self, cmd: CmdId) -> &str {
        &self.cmd(cmd).help
    }

    pub fn parent(&self, cmd: CmdId) -> Option<CmdId> {
        self.cmd(cmd).parent
    }

    pub fn subcommand(&self, cmd: CmdId, name: &str) -> Option<CmdId> {
        self.cmd(cmd).subcommands.get(name).copied()
    }

    /// The option declared on `cmd` itself under `destination`.
    pub fn flag(&self, cmd: CmdId, destination: &str) -> Option<&Flag> {
        self.cmd(cmd).flags.get(destination).map(|&id| self.flag_at(id))
    }

    pub fn flag_at(&self, id: FlagId) -> &Flag {
        &self.flags[id.0]
    }

    pub(crate) fn cmd(&self, cmd: CmdId) -> &Command {
        &self.commands[cmd.0]
    }

    fn cmd_mut(&mut self, cmd: CmdId) -> &mut Command {
        &mut self.commands[cmd.0]
    }

    pub(crate) fn flag_mut(&mut self, id: FlagId) -> &mut Flag {
        &mut self.flags[id.0]
    }

    pub(crate) fn register_short(&mut self, id: FlagId, short: char) {
        let flag = self.flag_mut(id);
        flag.set_short(short);
        let owner = flag.owner();
        self.cmd_mut(owner).short_index.insert(short, id);
    }

    pub(crate) fn register_long(&mut self, id: FlagId, long: &str) {
        let flag = self.flag_mut(id);
        flag.set_long(long);
        let owner = flag.owner();
        self.cmd_mut(owner).long_index.insert(long.to_string(), id);
    }

    /// Parses `args` (without the program name) against the tree.
    ///
    /// Errors are carried in the returned [`Outcome`]. Boolean flags that do
    /// not appear in `args` end up reporting the negation of their declared
    /// default; flags given bare report the declared default itself.
    ///
    /// Required options are checked over the whole tree, including
    /// subcommands that were not invoked.
    pub fn parse_args<I, S>(&mut self, args: I) -> Outcome<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect::<Vec<String>>();
        let mut options = BTreeMap::new();
        let mut resolved = None;
        let res = self.run(args, &mut options, &mut resolved);
        if let Err(err) = &res {
            log::debug!("parse failed: {err}");
        }
        Outcome::new(self, resolved, options, res.err())
    }

    /// Like [`ArgumentParser::parse_args`] for raw OS strings. An argument
    /// that is not valid utf8 fails the parse with
    /// [`Error::NonUtf8Argument`].
    pub fn parse_args_os<I>(&mut self, args: I) -> Outcome<'_>
    where
        I: IntoIterator<Item = OsString>,
    {
        let args = args.into_iter().map(OsString::into_string).collect::<Result<Vec<_>, _>>();
        match args {
            Ok(args) => self.parse_args(args),
            Err(arg) => {
                log::debug!("parse failed: invalid utf8 argument {arg:?}");
                Outcome::new(self, None, BTreeMap::new(), Some(Error::NonUtf8Argument(arg)))
            }
        }
    }

    /// Like [`ArgumentParser::parse_args`], reading the arguments of the
    /// current process.
    pub fn parse_from_env(&mut self) -> Outcome<'_> {
        self.parse_args_os(std::env::args_os().skip(1))
    }

    fn run(
        &mut self,
        args: Vec<String>,
        options: &mut BTreeMap<String, FlagId>,
        resolved: &mut Option<CmdId>,
    ) -> Result<()> {
        let root = self.root();
        self.preprocess_all(root);

        let (commands, flags) = split_commands_and_flags(args);
        log::debug!("commands: {commands:?}, flags: {flags:?}");

        let cmd = self.resolve(root, &commands, options)?;
        log::debug!("resolved command `{}`", self.title(cmd));
        *resolved = Some(cmd);

        self.bind_params(cmd, flags)?;
        self.postprocess_all(root)
    }

    /// Clears every bound value so that the tree can be parsed again.
    pub fn reset(&mut self) {
        for flag in &mut self.flags {
            flag.reset();
        }
    }

    /// Walks `path` down from `cmd`, merging the options of every command
    /// passed through (including the last one) into `options`.
    pub(crate) fn resolve(
        &self,
        cmd: CmdId,
        path: &[String],
        options: &mut BTreeMap<String, FlagId>,
    ) -> Result<CmdId> {
        let mut current = cmd;
        for segment in path {
            options.extend(self.cmd(current).flags.iter().map(|(k, &v)| (k.clone(), v)));
            current = match self.cmd(current).subcommands.get(segment) {
                Some(&it) => it,
                None => return Err(Error::NotFound(segment.clone())),
            };
        }
        options.extend(self.cmd(current).flags.iter().map(|(k, &v)| (k.clone(), v)));
        Ok(current)
    }

    fn ancestors(&self, cmd: CmdId) -> impl Iterator<Item = &Command> + '_ {
        std::iter::successors(Some(cmd), move |&it| self.cmd(it).parent).map(move |it| self.cmd(it))
    }

    pub(crate) fn find_long(&self, cmd: CmdId, long: &str) -> Option<FlagId> {
        self.ancestors(cmd).find_map(|it| it.long_index.get(long).copied())
    }

    pub(crate) fn find_short(&self, cmd: CmdId, short: char) -> Option<FlagId> {
        self.ancestors(cmd).find_map(|it| it.short_index.get(&short).copied())
    }

    /// Binds flag tokens against `cmd` and its ancestors. The first error
    /// stops binding.
    pub(crate) fn bind_params(&mut self, cmd: CmdId, args: Vec<String>) -> Result<()> {
        let mut tokens = Tokens::new(args);
        while let Some(token) = tokens.next() {
            let res = if token == "--" {
                Err(Error::Unsupported)
            } else if token.starts_with("--") {
                self.parse_long(cmd, &token, &mut tokens)
            } else if token.starts_with('-') && token.len() > 1 {
                self.parse_short(cmd, &token, &mut tokens)
            } else {
                Err(Error::UnexpectedArgument(token))
            };
            if let Err(err) = res {
                if !tokens.is_empty() {
                    log::debug!("abandoning remaining flag tokens");
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// `--name`, `--name value` or `--name=value`.
    fn parse_long(&mut self, cmd: CmdId, token: &str, tokens: &mut Tokens) -> Result<()> {
        let body = &token[2..];
        if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
            return Err(Error::BadFlagSyntax(token.to_string()));
        }
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let id = match self.find_long(cmd, name) {
            Some(it) => it,
            None if name == "help" => return Err(Error::UsageRequested(self.usage(cmd))),
            None => return Err(Error::UnrecognizedFlag(name.to_string())),
        };

        let flag = self.flag_at(id);
        let value = match inline {
            Some(value) => Value::from(value),
            None if flag.is_bool() => Value::Bool(flag.bool_default()),
            None => match tokens.next() {
                Some(value) => Value::Str(value),
                None => return Err(Error::MissingArgument(format!("--{name}"))),
            },
        };
        self.flag_mut(id).bind_value(value)
    }

    /// `-x`, `-x value`, `-xvalue`, `-x=value` and clusters such as `-abc`.
    fn parse_short(&mut self, cmd: CmdId, token: &str, tokens: &mut Tokens) -> Result<()> {
        let mut rest = &token[1..];
        while let Some(short) = rest.chars().next() {
            let after = &rest[short.len_utf8()..];

            let id = match self.find_short(cmd, short) {
                Some(it) => it,
                None if short == 'h' => return Err(Error::UsageRequested(self.usage(cmd))),
                None => return Err(Error::UnknownFlag { flag: short, token: rest.to_string() }),
            };

            let flag = self.flag_at(id);
            let (value, remainder) = if let Some(value) = after.strip_prefix('=') {
                (Value::from(value), "")
            } else if flag.is_bool() {
                (Value::Bool(flag.bool_default()), after)
            } else if !after.is_empty() {
                (Value::from(after), "")
            } else {
                match tokens.next() {
                    Some(value) => (Value::Str(value), ""),
                    None => {
                        return Err(Error::MissingArgument(format!("'{short}' in -{rest}")));
                    }
                }
            };

            self.flag_mut(id).bind_value(value)?;
            rest = remainder;
        }
        Ok(())
    }

    /// Flags of `cmd` and of every command below it, depth first.
    fn subtree_flags(&self, cmd: CmdId) -> Vec<FlagId> {
        let mut res = Vec::new();
        let mut stack = vec![cmd];
        while let Some(it) = stack.pop() {
            let cmd = self.cmd(it);
            res.extend(cmd.flags.values().copied());
            stack.extend(cmd.subcommands.values().rev().copied());
        }
        res
    }

    pub(crate) fn preprocess_all(&mut self, cmd: CmdId) {
        for id in self.subtree_flags(cmd) {
            if let Some(long) = self.flag_mut(id).preprocess() {
                self.register_long(id, &long);
            }
        }
    }

    /// Runs the post-parse checks over the whole subtree. Every flag is
    /// processed; the first error encountered is returned.
    pub(crate) fn postprocess_all(&mut self, cmd: CmdId) -> Result<()> {
        let mut first_err = None;
        for id in self.subtree_flags(cmd) {
            if let Err(err) = self.flag_mut(id).postprocess() {
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Splits raw tokens at the first one that looks like a flag: everything
/// before it is the command path.
pub(crate) fn split_commands_and_flags(mut args: Vec<String>) -> (Vec<String>, Vec<String>) {
    let is_command = |it: &String| it.is_empty() || !it.starts_with('-') || it.len() == 1;
    let split = args.iter().position(|it| !is_command(it)).unwrap_or(args.len());
    let flags = args.split_off(split);
    (args, flags)
}
