#![no_main]
use libfuzzer_sys::fuzz_target;
use mmkv_reader::container::{HeaderLayout, Records, read_header_with};
use mmkv_reader::engine::{ScanOptions, inspect_container};

fuzz_target!(|data: &[u8]| {
    // Scanning arbitrary bytes must never panic, under every layout.
    for layout in [
        HeaderLayout::SizeThenVarint,
        HeaderLayout::Fixed(4),
        HeaderLayout::Fixed(8),
    ] {
        let opts = ScanOptions {
            layout,
            ..Default::default()
        };
        let Ok((header, report)) = inspect_container(data, &opts) else {
            continue;
        };
        assert!(report.end_offset <= data.len());

        // The lazy iterator must agree with the collected report.
        let records = Records::new(data, &header, opts.fallback_bound).count();
        assert_eq!(records, report.entries + report.tombstones);
        assert_eq!(read_header_with(data, layout), Ok(header));
    }
});
