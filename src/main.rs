fn main() -> anyhow::Result<()> {
    history_clusters::cli::run()
}
