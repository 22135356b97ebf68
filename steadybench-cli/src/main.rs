fn main() -> anyhow::Result<()> {
    steadybench_cli::run()
}
