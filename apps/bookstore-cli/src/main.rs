//! Bookstore ledger entry point.

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = bookstore_cli::run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
