use std::fmt::Write;

use crate::{parser::Command, ArgumentParser, CmdId};

macro_rules! w {
    ($($tt:tt)*) => {
        let _ = write!($($tt)*);
    };
}

impl ArgumentParser {
    /// Usage text of `cmd`, as printed for `--help`.
    ///
    /// ```text
    /// <help>
    ///
    /// Usage:
    ///     <root name> <option summary>
    ///
    /// Options:
    /// <one line per option>
    ///
    /// SubCommands:
    /// <one line per subcommand>
    /// ```
    pub fn usage(&self, cmd: CmdId) -> String {
        let command = self.cmd(cmd);
        let root_name = &self.cmd(command.root).name;

        let mut buf = String::new();
        w!(buf, "{}\n\nUsage:\n    {} {} ", command.help, root_name, self.option_summary(command));

        let details = self.option_details(command);
        if !details.is_empty() {
            w!(buf, "\n\nOptions:\n{details}");
        }
        buf.push(' ');

        let subcommands = self.subcommand_details(command);
        if !subcommands.is_empty() {
            w!(buf, "\nSubCommands:\n{subcommands}");
        }
        buf.push('\n');
        buf
    }

    /// `[-x/--long VALUE]` entries, two per line, continuation lines
    /// indented past the root command name.
    fn option_summary(&self, command: &Command) -> String {
        let root_name = &self.cmd(command.root).name;
        let indent = 3 + root_name.chars().count();

        let mut entries = command
            .flags
            .iter()
            .map(|(destination, &id)| {
                let flag = self.flag_at(id);
                let form = flag.display_form();
                let metavar = destination.to_uppercase();
                if flag.is_bool() {
                    format!("[{form}]")
                } else if flag.is_required() {
                    format!("{form} {metavar}")
                } else {
                    format!("[{form} {metavar}]")
                }
            })
            .collect::<Vec<_>>();
        entries.sort();

        let mut out = Vec::new();
        for (i, entry) in entries.into_iter().enumerate() {
            if i > 0 && i % 2 == 0 {
                out.push("\n".to_string());
                out.push(" ".repeat(indent));
            }
            out.push(entry);
        }
        out.join(" ")
    }

    fn option_details(&self, command: &Command) -> String {
        let prefixes = command
            .flags
            .values()
            .map(|&id| {
                let flag = self.flag_at(id);
                match (flag.short_form(), flag.long_form()) {
                    (Some(short), Some(long)) => format!("{:>4}, --{long}", format!("-{short}")),
                    (Some(short), None) => format!("{:>4}", format!("-{short}")),
                    (None, Some(long)) => format!("--{long}"),
                    (None, None) => format!("--{}", flag.destination()),
                }
            })
            .collect::<Vec<_>>();
        let width = prefixes.iter().map(|it| it.chars().count()).max().unwrap_or(0);

        let mut lines = command
            .flags
            .values()
            .zip(&prefixes)
            .map(|(&id, prefix)| format!("{prefix:<width$} {}", self.flag_at(id).help()))
            .collect::<Vec<_>>();
        lines.sort();

        let mut buf = String::new();
        for line in lines {
            w!(buf, "{line}\n");
        }
        buf
    }

    fn subcommand_details(&self, command: &Command) -> String {
        let subs = command.subcommands.values().map(|&it| self.cmd(it)).collect::<Vec<_>>();
        let width = subs.iter().map(|it| it.title.chars().count()).max().unwrap_or(0);

        let mut lines = subs
            .iter()
            .map(|it| format!("{:<width$} {}", it.title, it.help))
            .collect::<Vec<_>>();
        lines.sort();

        let mut buf = String::new();
        for line in lines {
            w!(buf, "{line}\n");
        }
        buf
    }
}
