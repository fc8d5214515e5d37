use std::env;
use std::fmt::Display;
use std::io::{self, Write};

use log::warn;

use crate::error::ShellError;

/// What the loop should do after a command finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Stop,
}

/// Output streams plus the registry a command was dispatched from.
pub struct Context<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
    pub registry: &'a Registry,
}

impl Context<'_> {
    /// Writes `minish: <err>` to the diagnostic stream.
    pub fn report (&mut self, err: impl Display) {
        if let Err(write_err) = writeln!(self.err, "minish: {err}") {
            warn!("lost diagnostic \"{err}\": {write_err}");
        }
    }

    /// Reports a failed write to the output stream.
    pub fn check_output (&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            self.report(ShellError::Output(err));
        }
    }
}

/// A command implemented inside the shell process.
pub trait Builtin: Sync {
    fn name (&self) -> &'static str;

    /// Runs the command. `argv[0]` is the command name itself.
    fn execute (&self, argv: &[&str], ctx: &mut Context) -> Signal;
}

/// Fixed table of builtins, searched in order by exact name.
pub struct Registry {
    entries: &'static [&'static dyn Builtin],
}

static BUILTINS: Registry = Registry::new(&[&Cd, &Help, &Plus, &Exit]);

impl Registry {
    pub const fn new (entries: &'static [&'static dyn Builtin]) -> Self {
        Self { entries }
    }

    /// The process-wide table: `cd`, `help`, `plus`, `exit`.
    pub fn global () -> &'static Registry {
        &BUILTINS
    }

    pub fn len (&self) -> usize {
        self.entries.len()
    }

    pub fn lookup (&self, name: &str) -> Option<&'static dyn Builtin> {
        self.entries.iter().copied().find(|builtin| builtin.name() == name)
    }

    pub fn names (&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|builtin| builtin.name())
    }
}

pub struct Cd;

impl Builtin for Cd {
    fn name (&self) -> &'static str { "cd" }

    fn execute (&self, argv: &[&str], ctx: &mut Context) -> Signal {
        let result = match argv.get(1) {
            None => Err(ShellError::MissingArgument("cd")),
            Some(dir) => env::set_current_dir(dir).map_err(ShellError::ChangeDir),
        };

        if let Err(err) = result {
            ctx.report(err);
        }

        Signal::Continue
    }
}

pub struct Help;

impl Help {
    fn usage (out: &mut dyn Write, registry: &Registry) -> io::Result<()> {
        writeln!(out, "MINISH")?;
        writeln!(out, "Type program names and arguments, and hit enter.")?;
        writeln!(out, "The following are built in:")?;

        for name in registry.names() {
            writeln!(out, "    {name}")?;
        }

        writeln!(out, "Use the man command for information on other programs.")
    }
}

impl Builtin for Help {
    fn name (&self) -> &'static str { "help" }

    fn execute (&self, _argv: &[&str], ctx: &mut Context) -> Signal {
        let result = Self::usage(ctx.out, ctx.registry);
        ctx.check_output(result);
        Signal::Continue
    }
}

pub struct Plus;

impl Plus {
    fn sum (argv: &[&str]) -> Result<u64, ShellError> {
        let (Some(lhs), Some(rhs)) = (argv.get(1), argv.get(2)) else {
            return Err(ShellError::MissingArguments("plus"));
        };

        if !is_number(lhs) || !is_number(rhs) {
            return Err(ShellError::InvalidArgument("plus"));
        }

        let lhs: u64 = lhs.parse().map_err(|_| ShellError::OutOfRange("plus"))?;
        let rhs: u64 = rhs.parse().map_err(|_| ShellError::OutOfRange("plus"))?;

        lhs.checked_add(rhs).ok_or(ShellError::OutOfRange("plus"))
    }
}

impl Builtin for Plus {
    fn name (&self) -> &'static str { "plus" }

    fn execute (&self, argv: &[&str], ctx: &mut Context) -> Signal {
        match Self::sum(argv) {
            Ok(sum) => {
                let result = writeln!(ctx.out, "{sum}");
                ctx.check_output(result);
            }
            Err(err) => ctx.report(err),
        }

        Signal::Continue
    }
}

pub struct Exit;

impl Builtin for Exit {
    fn name (&self) -> &'static str { "exit" }

    fn execute (&self, _argv: &[&str], _ctx: &mut Context) -> Signal {
        Signal::Stop
    }
}

/// True when `arg` is one or more ASCII decimal digits and nothing else.
pub fn is_number (arg: &str) -> bool {
    !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit())
}

/// Serializes tests that touch the process working directory.
#[cfg(test)]
pub static CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod builtin_tests {
    use super::*;

    fn run (argv: &[&str]) -> (Signal, String, String) {
        let registry = Registry::global();
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        let mut ctx = Context { out: &mut out, err: &mut err, registry };

        let builtin = registry.lookup(argv[0]).expect("builtin");
        let signal = builtin.execute(argv, &mut ctx);

        (signal, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn number_validation () {
        for bad in ["", "-5", "+5", "3.0", "12a", " 1", "1 ", "٣"] {
            assert!(!is_number(bad), "{bad:?} should be rejected");
        }

        for good in ["0", "007", "42"] {
            assert!(is_number(good), "{good:?} should be accepted");
        }
    }

    #[test]
    fn registry_is_exact_and_ordered () {
        let registry = Registry::global();

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["cd", "help", "plus", "exit"]);
        assert!(registry.lookup("cd").is_some());
        assert!(registry.lookup("CD").is_none());
        assert!(registry.lookup("c").is_none());
    }

    #[test]
    fn plus_prints_sum () {
        let (signal, out, err) = run(&["plus", "2", "3"]);

        assert_eq!(signal, Signal::Continue);
        assert_eq!(out, "5\n");
        assert!(err.is_empty());
    }

    #[test]
    fn plus_leading_zeros () {
        assert_eq!(run(&["plus", "007", "0"]).1, "7\n");
    }

    #[test]
    fn plus_rejects_non_numbers () {
        let (signal, out, err) = run(&["plus", "2", "x"]);

        assert_eq!(signal, Signal::Continue);
        assert!(out.is_empty());
        assert_eq!(err, "minish: unacceptable arguments for \"plus\"\n");
    }

    #[test]
    fn plus_missing_arguments () {
        let (signal, out, err) = run(&["plus", "2"]);

        assert_eq!(signal, Signal::Continue);
        assert!(out.is_empty());
        assert_eq!(err, "minish: expected arguments to \"plus\"\n");
    }

    #[test]
    fn plus_overflow_is_reported () {
        let (_, out, err) = run(&["plus", "18446744073709551615", "1"]);
        assert!(out.is_empty());
        assert_eq!(err, "minish: \"plus\" result out of range\n");

        let (_, out, err) = run(&["plus", "99999999999999999999999", "1"]);
        assert!(out.is_empty());
        assert_eq!(err, "minish: \"plus\" result out of range\n");
    }

    #[test]
    fn exit_stops_regardless_of_arguments () {
        assert_eq!(run(&["exit"]).0, Signal::Stop);
        assert_eq!(run(&["exit", "1", "now"]).0, Signal::Stop);
    }

    #[test]
    fn help_lists_every_builtin () {
        let (signal, out, _) = run(&["help"]);

        assert_eq!(signal, Signal::Continue);
        assert_eq!(out, "\
MINISH
Type program names and arguments, and hit enter.
The following are built in:
    cd
    help
    plus
    exit
Use the man command for information on other programs.
");
    }

    struct Closed;

    impl Write for Closed {
        fn write (&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush (&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_failures_are_reported () {
        let broken = io::Error::from(io::ErrorKind::BrokenPipe).to_string();

        for argv in [&["help"][..], &["plus", "1", "2"][..]] {
            let mut err = Vec::<u8>::new();
            let mut ctx = Context { out: &mut Closed, err: &mut err, registry: Registry::global() };

            let signal = Registry::global().lookup(argv[0]).unwrap().execute(argv, &mut ctx);

            assert_eq!(signal, Signal::Continue);
            assert_eq!(String::from_utf8(err).unwrap(), format!("minish: failed to write output: {broken}\n"));
        }
    }

    #[test]
    fn cd_without_argument_keeps_directory () {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = env::current_dir().unwrap();

        let (signal, _, err) = run(&["cd"]);

        assert_eq!(signal, Signal::Continue);
        assert_eq!(err, "minish: expected argument to \"cd\"\n");
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn cd_bad_path_keeps_directory () {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = env::current_dir().unwrap();

        let (signal, _, err) = run(&["cd", "/definitely/not/a/real/dir"]);

        assert_eq!(signal, Signal::Continue);
        assert!(err.starts_with("minish: "));
        assert!(err.contains("No such file or directory"));
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn cd_changes_directory () {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().canonicalize().unwrap();

        let (signal, _, err) = run(&["cd", target.to_str().unwrap(), "ignored"]);
        let after = env::current_dir().unwrap();
        env::set_current_dir(&before).unwrap();

        assert_eq!(signal, Signal::Continue);
        assert!(err.is_empty());
        assert_eq!(after, target);
    }
}
