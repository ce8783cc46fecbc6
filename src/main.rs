// Headless entry point. The editing core is GUI-agnostic; this binary exposes
// the batch exporter (open .pix projects, composite, write PNGs). A graphical
// shell drives the same library through `app::EditorContext`.

use std::process::ExitCode;

use clap::Parser;

use pixo::{cli, logger};

fn main() -> ExitCode {
    // Initialize session log (overwrites previous session log)
    logger::init();

    let args = cli::CliArgs::parse();
    cli::run(args)
}
