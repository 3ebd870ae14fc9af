//! mdp - command line front end for the marine data portal.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "mdp",
    version,
    about = "Marine data portal toolkit: fishing zones, eDNA and SST"
)]
struct Cli {
    #[command(subcommand)]
    command: mdp_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Starting mdp");
    mdp_cmd::run(cli.command).await
}
