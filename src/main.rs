/// Entry point for the cgwatch resource reporter.
///
/// Initializes logging, then hands off to the detection and sampling loop,
/// which runs until the process is killed. Diagnostics honor `RUST_LOG`;
/// missing stat files and parse misses are reported at debug level only.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug cargo run
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    cgwatch::run().await
}
