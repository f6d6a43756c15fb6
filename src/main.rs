use clap::Parser;

use orgtree::cli::commands::execute_command;
use orgtree::cli::{output, Cli};
use orgtree::util::logging;

fn main() {
    let cli = Cli::parse();
    logging::install(logging::verbosity_filter(cli.debug));

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}
