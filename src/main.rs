mod builtins;
mod config;
mod error;
mod interpreter;
mod launcher;
mod prompt;
mod readline;
mod shell;
mod tokenizer;
mod trie;
mod utils;

use std::io;

use anyhow::Result;
use clap::Parser;
use log::info;

use config::Cli;
use interpreter::Interpreter;
use prompt::Prompt;
use readline::{Reader, Stdin};
use shell::Shell;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let interactive = utils::is_terminal(libc::STDIN_FILENO);
    let interpreter = Interpreter::default();

    let mut reader = Reader::new(Stdin, io::stdout(), interactive);
    if interactive {
        reader.update_trie(interpreter.builtins());
        reader.update_trie(utils::get_system_binaries());
    }

    let mut shell = Shell::new(reader, io::stderr(), interpreter, Prompt::new(!cli.plain_prompt));

    if let Some(line) = cli.command {
        shell.run_line(&line);
        return Ok(());
    }

    if interactive {
        info!("interactive session");
        shell = shell.with_raw_terminal(libc::STDIN_FILENO);

        if !cli.no_clear && utils::is_terminal(libc::STDOUT_FILENO) {
            shell.clear_screen()?;
        }
    }

    shell.run()
}
