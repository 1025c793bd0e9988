use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Embed quotes from a JSON file and store them in PostgreSQL"
)]
struct Args {
    /// JSON file with the quotes; reads stdin when omitted
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    quotes_api::seed::run(args.input.as_deref()).await?;
    Ok(())
}
