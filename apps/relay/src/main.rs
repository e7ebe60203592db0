#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashcards_relay::run().await
}
