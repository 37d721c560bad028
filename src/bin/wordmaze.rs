use anyhow::Result;

fn main() -> Result<()> {
    wordmaze::cli::run()
}
