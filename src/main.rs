fn main() -> anyhow::Result<()> {
    noteboard::cli::run()
}
