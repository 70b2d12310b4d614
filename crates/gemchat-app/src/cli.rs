use clap::Parser;

/// Chat with Google Gemini from the terminal.
#[derive(Parser, Debug)]
#[command(name = "gemchat", version, about)]
pub struct Args {
    /// Model identifier (overrides the config file).
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Gemini API key. Remembered unless --no-remember is given.
    #[arg(short = 'k', long, env = "GEMCHAT_API_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Keep the API key in memory only and drop any stored copy.
    #[arg(long)]
    pub no_remember: bool,

    /// File to attach to the first message.
    #[arg(short = 'a', long)]
    pub attach: Option<String>,

    /// Send a single prompt, print the reply and exit.
    #[arg(short = 'p', long)]
    pub prompt: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
