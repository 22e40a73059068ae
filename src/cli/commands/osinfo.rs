//! osinfo command - Display basic info about your os

use anyhow::Result;

use super::{Command, CommandError};
use crate::cli::arguments::Arguments;
use crate::context::Context;

/// `dotfiles osinfo`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Osinfo {
    pub codename: bool,
    pub id: bool,
    pub like: bool,
    pub pretty: bool,
    pub simplified: bool,
    pub version: bool,
    completion: bool,
}

impl Osinfo {
    const OPTIONS: [&'static str; 6] = [
        "--codename",
        "--id",
        "--like",
        "--pretty",
        "--simplified",
        "--version",
    ];

    fn chosen(&self) -> usize {
        [
            self.codename,
            self.id,
            self.like,
            self.pretty,
            self.simplified,
            self.version,
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    /// The one line this invocation prints.
    pub fn answer(&self, ctx: &Context) -> String {
        let os = &ctx.os;
        if self.version {
            os.version()
        } else if self.id {
            os.id()
        } else if self.like {
            os.id_like().join(" ")
        } else if self.simplified {
            os.os_type().to_string()
        } else if self.codename {
            os.codename()
        } else if self.pretty {
            os.pretty_name()
        } else {
            os.name()
        }
    }
}

impl Command for Osinfo {
    const NAME: &'static str = "osinfo";
    const DESCRIPTION: &'static str = "Display basic info about your os";

    fn from_arguments(arguments: &Arguments) -> Self {
        Self {
            codename: arguments.get_bool("codename"),
            id: arguments.get_bool("id"),
            like: arguments.get_bool("like"),
            pretty: arguments.get_bool("pretty"),
            simplified: arguments.get_bool("simplified"),
            version: arguments.get_bool("version"),
            completion: false,
        }
    }

    fn completion(&self) -> bool {
        self.completion
    }

    fn set_completion(&mut self, completion: bool) {
        self.completion = completion;
    }

    fn validate(&self, _ctx: &Context) -> Result<(), CommandError> {
        if self.chosen() > 1 {
            return Err(CommandError::validation(
                Self::NAME,
                "You're only allowed to choose a single option.",
            ));
        }
        Ok(())
    }

    fn completion_tokens(&self, _ctx: &Context) -> Result<Vec<String>> {
        Ok(Self::OPTIONS.iter().map(|o| o.to_string()).collect())
    }

    fn run(&mut self, ctx: &Context) -> Result<()> {
        ctx.console.line(self.answer(ctx));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::execute;
    use super::super::testing::*;
    use super::*;

    fn run(flags: &[&str]) -> Result<String> {
        let ctx = context(os("debian"), FakeShell::default(), FakePrompter::default());
        let args = Arguments::from_mapping(flags.iter().map(|f| (*f, true)));
        execute(&mut Osinfo::from_arguments(&args), &ctx)?;
        Ok(ctx.console.captured())
    }

    #[test]
    fn default_prints_name() {
        assert_eq!(run(&[]).unwrap(), "Test debian\n");
    }

    #[test]
    fn single_flags() {
        assert_eq!(run(&["id"]).unwrap(), "debian\n");
        assert_eq!(run(&["like"]).unwrap(), "debian\n");
        assert_eq!(run(&["simplified"]).unwrap(), "linux\n");
        assert_eq!(run(&["codename"]).unwrap(), "testing\n");
    }

    #[test]
    fn two_flags_are_rejected() {
        let err = run(&["id", "version"]).unwrap_err();
        let err = err.downcast_ref::<CommandError>().unwrap();
        assert_eq!(err.command(), Some("osinfo"));
        assert_eq!(err.to_string(), "You're only allowed to choose a single option.");
    }

    #[test]
    fn empty_arguments_are_fine() {
        assert_eq!(Osinfo::from_arguments(&Arguments::default()), Osinfo::default());
    }
}
