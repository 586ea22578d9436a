use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    debate_coach::cli::run().await
}
