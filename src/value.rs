/// Value slot of an option: either nothing, a string or a bool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Value {
    #[default]
    Absent,
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

impl From<&str> for Value {
    fn from(it: &str) -> Self {
        Value::Str(it.to_string())
    }
}

impl From<String> for Value {
    fn from(it: String) -> Self {
        Value::Str(it)
    }
}

impl From<bool> for Value {
    fn from(it: bool) -> Self {
        Value::Bool(it)
    }
}
