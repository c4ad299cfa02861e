#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vibe_cards_backend::run().await
}
