use portalkeeper_cli::args::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    let code = portalkeeper_cli::run(cli).await;
    std::process::exit(code);
}
