use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ilab-server",
    about = "InstructLab UI gateway - browser-facing API proxy",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, env = "ILAB_UI_PORT", default_value = "3000")]
    pub port: u16,

    #[arg(long, env = "ILAB_UI_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the gateway (default if no command specified)")]
    Serve,

    #[command(about = "Poll a running gateway for free GPUs")]
    GpuWatch {
        #[arg(long, default_value = "http://127.0.0.1:3000", help = "Gateway base URL")]
        url: String,

        #[arg(short, long, default_value = "20", help = "Polling interval in seconds")]
        interval: u64,
    },

    #[command(subcommand, about = "Inspect the resolved configuration")]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show current configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },
}
