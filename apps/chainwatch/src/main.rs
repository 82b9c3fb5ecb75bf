fn main() -> anyhow::Result<()> {
    chainwatch::init_tracing();
    chainwatch::cli::run()
}
