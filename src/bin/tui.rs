use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    lostfound::tui::run().await
}
