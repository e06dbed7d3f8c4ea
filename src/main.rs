use clap::Parser;
use std::process;

use taskplan::cli;
use taskplan::cli::commands::{Cli, Commands};

fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output),
        Commands::Project(cmd) => cli::project::run(cmd, json_output),
        Commands::Task(cmd) => cli::task::run(cmd, json_output),
        Commands::Validate { project } => cli::validate::run(project, json_output),
        Commands::Timeline { project, critical } => {
            cli::timeline::run(project, &critical, json_output)
        }
        Commands::Status { project } => cli::status::run(project, json_output),
    };

    process::exit(exit_code);
}
