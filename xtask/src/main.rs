#[cfg(not(test))]
use anyhow::Result;
use clap::{Parser, Subcommand};
#[cfg(not(test))]
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for fswt")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    Test,
    /// Test with every optional feature enabled
    #[command(name = "test-all")]
    TestAll,
    Clippy,
    Fmt,
    /// fmt followed by clippy
    Analyze,
    Bench,
    /// Run one of the demos in `demos/`
    Demo { name: String },
}

#[cfg(not(test))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();

    match cli.command {
        Commands::Build => run(build_command(&cfg)),
        Commands::Test => run(test_command(&cfg)),
        Commands::TestAll => run(test_all_command()),
        Commands::Clippy => run(clippy_command()),
        Commands::Fmt => run(fmt_command()),
        Commands::Analyze => {
            run(fmt_command())?;
            run(clippy_command())
        }
        Commands::Bench => run(bench_command(&cfg)),
        Commands::Demo { name } => run(demo_command(&name, &cfg)?),
    }
}
