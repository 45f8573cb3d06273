use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    estate::cli::run().await
}
