fn main() -> anyhow::Result<()> {
    twinmatch_cui::run()
}
