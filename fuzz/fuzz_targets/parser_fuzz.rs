#![no_main]
use libfuzzer_sys::fuzz_target;

const SUBCOMMANDS: [&str; 4] = ["dump", "header", "get", "kinds"];

fuzz_target!(|data: &[u8]| {
    // First byte picks a subcommand so the fuzzer reaches per-command flags.
    let Some((&pick, rest)) = data.split_first() else {
        return;
    };
    let mut args = vec![SUBCOMMANDS[usize::from(pick) % SUBCOMMANDS.len()].to_string()];
    let text = String::from_utf8_lossy(rest);
    args.extend(text.split_whitespace().take(32).map(str::to_string));
    mmkv_reader::cli::fuzz_try_parse_args(&args);
});
