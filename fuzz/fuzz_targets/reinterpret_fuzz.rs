#![no_main]
use libfuzzer_sys::fuzz_target;
use mmkv_reader::value::{Interpretation, ValueView};

fuzz_target!(|data: &[u8]| {
    // Every interpretation of every span either decodes or reports an error.
    let mut view = ValueView::new(data, Interpretation::default());
    for _ in 0..Interpretation::ALL.len() {
        let _ = view.decode();
        let _ = view.to_string();
        view = view.rotate();
    }
});
