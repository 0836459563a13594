use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    toki::cli::run().await
}
