//! PTL CLI - Command line tool for inspecting plant telemetry exports.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ptl-cli",
    version,
    about = "Plant field telemetry toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: ptl_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    ptl_cmd::run(cli.command)
}
