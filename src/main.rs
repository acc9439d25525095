use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = postrelay::cli::Cli::parse();
    if let Err(e) = postrelay::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
