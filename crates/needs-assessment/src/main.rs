fn main() -> anyhow::Result<()> {
    needs_assessment::cli::main()
}
