//! CLI entry point for batch gram synthesis

use clap::Parser;
use texgram::io::cli::{BatchProcessor, Cli};

fn main() -> texgram::Result<()> {
    let cli = Cli::parse();
    let processor = BatchProcessor::new(cli);
    processor.process()
}
