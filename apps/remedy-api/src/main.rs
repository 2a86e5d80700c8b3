use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = remedy_api::Args::parse();

	remedy_api::run(args).await
}
