#[tokio::main]
async fn main() -> eyre::Result<()> {
    quotes_api::run().await
}
