use clap::Parser;

/// minish - a minimal interactive command interpreter
#[derive(Parser, Debug)]
#[command(name = "minish", version, about)]
pub struct Cli {
    /// Run a single command line and exit
    #[arg(short = 'c', value_name = "LINE")]
    pub command: Option<String>,

    /// Do not clear the screen on startup
    #[arg(long, env = "MINISH_NO_CLEAR")]
    pub no_clear: bool,

    /// Render the prompt without ANSI colours
    #[arg(long, env = "MINISH_PLAIN_PROMPT")]
    pub plain_prompt: bool,
}
