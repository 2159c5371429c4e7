use crate::{
    parser::{ArgumentParser, CmdId, FlagId},
    Error, Result, Value,
};

/// A declared option: its spellings, its default and whatever was bound to
/// it from the command line.
#[derive(Debug)]
pub struct Flag {
    owner: CmdId,
    destination: String,
    help: String,
    short: Option<char>,
    long: Option<String>,
    required: bool,
    default: Value,
    value: Value,
    bool_mode: bool,
    bool_default: bool,
    declared_bool: bool,
    consumed: bool,
}

impl Flag {
    pub(crate) fn new(owner: CmdId, destination: &str, help: &str) -> Flag {
        Flag {
            owner,
            destination: destination.to_string(),
            help: help.to_string(),
            short: None,
            long: None,
            required: false,
            default: Value::Absent,
            value: Value::Absent,
            bool_mode: false,
            bool_default: false,
            declared_bool: false,
            consumed: false,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn short_form(&self) -> Option<char> {
        self.short
    }

    pub fn long_form(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_bool(&self) -> bool {
        self.bool_mode
    }

    /// Whether a value was bound from the command line.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn owner(&self) -> CmdId {
        self.owner
    }

    /// The value a bare boolean flag binds.
    pub(crate) fn bool_default(&self) -> bool {
        self.bool_default
    }

    /// Renders `-x`, `--long` or `-x/--long`, falling back to
    /// `--destination` when no spelling is assigned.
    pub fn display_form(&self) -> String {
        match (self.short, &self.long) {
            (None, None) => format!("--{}", self.destination),
            (Some(short), None) => format!("-{short}"),
            (None, Some(long)) => format!("--{long}"),
            (Some(short), Some(long)) => format!("-{short}/--{long}"),
        }
    }

    /// The bound value if any, then the default, then `""`.
    pub fn read_string(&self) -> Result<&str> {
        let slot = if self.consumed { &self.value } else { &self.default };
        match slot {
            Value::Str(it) => Ok(it.as_str()),
            Value::Absent => Ok(""),
            Value::Bool(_) => Err(self.mismatch("string")),
        }
    }

    /// For boolean flags this is the configured bool default regardless of
    /// what was bound: presence semantics, see [`ArgumentParser::parse_args`].
    pub fn read_bool(&self) -> Result<bool> {
        if self.bool_mode {
            return Ok(self.bool_default);
        }
        match &self.value {
            Value::Bool(it) => Ok(*it),
            Value::Absent | Value::Str(_) => Err(self.mismatch("bool")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch { destination: self.destination.clone(), expected }
    }

    pub(crate) fn set_short(&mut self, short: char) {
        self.short = Some(short);
    }

    pub(crate) fn set_long(&mut self, long: &str) {
        self.long = Some(long.to_string());
    }

    pub(crate) fn set_bool(&mut self, default: bool) {
        self.bool_mode = true;
        self.bool_default = default;
        self.declared_bool = default;
    }

    pub(crate) fn set_default(&mut self, default: Value) {
        self.default = default;
    }

    pub(crate) fn set_required(&mut self) {
        self.required = true;
    }

    /// Stores `value` and re-validates right away.
    pub(crate) fn bind_value(&mut self, value: Value) -> Result<()> {
        log::trace!("bind {} = {:?}", self.destination, value);
        self.value = value;
        self.consumed = true;
        self.validate()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let missing = if self.consumed {
            self.value.is_absent() && self.default.is_absent()
        } else {
            self.default.is_absent()
        };
        if missing {
            return Err(Error::MissingRequiredOption(self.display_form()));
        }
        Ok(())
    }

    /// Assigns `--destination` when neither spelling was given. Returns the
    /// long form that needs registering, if one was assigned.
    pub(crate) fn preprocess(&mut self) -> Option<String> {
        if self.short.is_some() || self.long.is_some() {
            return None;
        }
        self.long = Some(self.destination.clone());
        self.long.clone()
    }

    /// Checks `required`, then flips the default of boolean flags that never
    /// showed up on the command line.
    pub(crate) fn postprocess(&mut self) -> Result<()> {
        if self.required && self.default.is_absent() && self.value.is_absent() {
            return Err(Error::MissingRequiredOption(self.display_form()));
        }
        if self.bool_mode && !self.consumed {
            self.bool_default = !self.bool_default;
        }
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.value = Value::Absent;
        self.consumed = false;
        self.bool_default = self.declared_bool;
    }
}

/// Fluent configuration of a freshly added option.
pub struct FlagMut<'a> {
    parser: &'a mut ArgumentParser,
    id: FlagId,
}

impl<'a> FlagMut<'a> {
    pub(crate) fn new(parser: &'a mut ArgumentParser, id: FlagId) -> FlagMut<'a> {
        FlagMut { parser, id }
    }

    pub fn id(&self) -> FlagId {
        self.id
    }

    /// Registers `-short`. An existing alias with the same spelling on the
    /// owning command is silently replaced.
    pub fn short(self, short: char) -> Self {
        self.parser.register_short(self.id, short);
        self
    }

    /// Registers `--long`, replacing any previous owner of that spelling.
    pub fn long(self, long: &str) -> Self {
        self.parser.register_long(self.id, long);
        self
    }

    /// Makes the option a boolean flag which never consumes a following
    /// token.
    pub fn boolean(self, default: bool) -> Self {
        self.parser.flag_mut(self.id).set_bool(default);
        self
    }

    pub fn default(self, value: impl Into<Value>) -> Self {
        self.parser.flag_mut(self.id).set_default(value.into());
        self
    }

    pub fn required(self) -> Self {
        self.parser.flag_mut(self.id).set_required();
        self
    }
}
