use clap::Parser;

/// Download a video in the format and location of your choice
#[derive(Parser, Debug)]
#[command(name = "dwn", version, about)]
struct Cli {
    /// Video URL; asked for interactively when omitted
    url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    dwn_lib::run(cli.url).await
}
