//! Branchline - play a scenario in the terminal.
//!
//! ```bash
//! branchline scenarios/manor.json [texts.json]
//! ```

mod runner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    runner::run().await
}
