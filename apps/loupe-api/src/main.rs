use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = loupe_api::Args::parse();

	loupe_api::run(args).await
}
