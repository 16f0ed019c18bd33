#[tokio::main]
async fn main() -> anyhow::Result<()> {
    configurator_cli::run().await
}
