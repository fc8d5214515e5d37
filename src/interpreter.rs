use std::io::Write;

use log::{debug, warn};

use crate::builtins::{Context, Registry, Signal};
use crate::launcher::{self, Termination};

/// Routes a tokenized line to a builtin or to an external program.
pub struct Interpreter {
    registry: &'static Registry,
}

impl Interpreter {
    pub fn new (registry: &'static Registry) -> Self {
        debug!("{} builtins registered", registry.len());
        Self { registry }
    }

    pub fn builtins (&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.names()
    }

    /// Runs one command. Builtins shadow programs of the same name; a blank
    /// line does nothing. Only a builtin can return [`Signal::Stop`].
    pub fn dispatch (&self, argv: &[&str], out: &mut dyn Write, err: &mut dyn Write) -> Signal {
        let Some(&cmd) = argv.first() else {
            return Signal::Continue;
        };

        let mut ctx = Context { out, err, registry: self.registry };

        if let Some(builtin) = self.registry.lookup(cmd) {
            debug!("{cmd}: builtin");
            return builtin.execute(argv, &mut ctx);
        }

        debug!("{cmd}: external");
        if let Err(error) = ctx.out.flush() {
            warn!("failed to flush output before running {cmd}: {error}");
        }

        match launcher::launch(argv) {
            Ok(Termination::Exited(code)) => debug!("{cmd} exited with {code}"),
            Ok(Termination::Signaled(signo)) => debug!("{cmd} killed by signal {signo}"),
            Err(error) => {
                warn!("failed to run {cmd}: {error}");
                ctx.report(error);
            }
        }

        Signal::Continue
    }
}

impl Default for Interpreter {
    fn default () -> Self {
        Self::new(Registry::global())
    }
}
