fn main() {
    #[cfg(feature = "cli")]
    mmkv_reader::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("mmkv-reader: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
