use anyhow::Result;
use babi_memn2n::cli::Cli;
use clap::Parser;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("babi_memn2n=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
