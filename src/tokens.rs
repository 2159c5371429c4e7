/// Flag tokens still waiting to be bound, stored reversed so that taking the
/// next one is a `pop`.
pub(crate) struct Tokens {
    rargs: Vec<String>,
}

impl Tokens {
    pub(crate) fn new(mut args: Vec<String>) -> Self {
        args.reverse();
        Self { rargs: args }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rargs.is_empty()
    }

    pub(crate) fn next(&mut self) -> Option<String> {
        self.rargs.pop()
    }
}
