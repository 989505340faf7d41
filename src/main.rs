use std::process;

use orphans::cli::{Args, Command};
use orphans::logger::init_logger;

fn main() {
    let args = Args::parse_args();
    init_logger(args.verbose, args.quiet, args.no_colors);

    let exit_code = Command::from_args(args).run();
    process::exit(exit_code);
}
