// Decoding a container captured from a real MMKV instance.
//
// The file stores one key per scalar type. Its declared size (0xd7 = 215)
// is four less than the buffer length, as MMKV counts it from the end of the
// size field; the last record still starts inside the bound.

use mmkv_reader::container::{ScanOutcome, read_header};
use mmkv_reader::engine::{ScanOptions, decode_container, inspect_container};
use mmkv_reader::hex;
use mmkv_reader::value::{
    self, Decoded, Interpretation, ValueView, as_bool, as_bytes, as_float64, as_int32, as_int64,
    as_uint32, as_utf8_string,
};

const SAMPLE_HEX: &str = concat!(
    "d7000000ffffff07",
    "12696e7433325f706f7369746976655f6b657905ffffffff07",
    "12696e7433325f6e656761746976655f6b65790a80808080f8ffffffff01",
    "12696e7436345f706f7369746976655f6b657909ffffffffffffffff7f",
    "12696e7436345f6e656761746976655f6b65790a80808080808080808001",
    "0d626f6f6c5f747275655f6b65790101",
    "0e626f6f6c5f66616c73655f6b65790100",
    "0a737472696e675f6b65790b0a73746576656e2070616b",
    "0962797465735f6b65790b0a736f6d65206279746573",
    "09666c6f61745f6b6579081f85eb51b81e0940",
);

fn sample() -> Vec<u8> {
    hex::decode(SAMPLE_HEX).unwrap()
}

fn only_value(store: &mmkv_reader::DecodedStore, key: &str) -> Vec<u8> {
    let history = store.get(key).unwrap_or_else(|| panic!("missing key {key}"));
    assert_eq!(history.len(), 1, "{key} should have one value");
    history[0].clone()
}

#[test]
fn header_fields() {
    let buf = sample();
    assert_eq!(buf.len(), 219);
    let header = read_header(&buf).unwrap();
    assert_eq!(header.declared_size, 215);
    assert_eq!(header.header_length, 8);
    assert_eq!(header.reserved, Some(0x00FF_FFFF));
}

#[test]
fn keys_in_file_order() {
    let store = decode_container(&sample()).unwrap();
    let keys: Vec<_> = store.keys().collect();
    assert_eq!(
        keys,
        [
            "int32_positive_key",
            "int32_negative_key",
            "int64_positive_key",
            "int64_negative_key",
            "bool_true_key",
            "bool_false_key",
            "string_key",
            "bytes_key",
            "float_key",
        ]
    );
    assert_eq!(store.value_count(), 9);
}

#[test]
fn scan_report_summary() {
    let (_, report) = inspect_container(&sample(), &ScanOptions::default()).unwrap();
    assert_eq!(report.outcome, ScanOutcome::ReachedBound);
    assert_eq!(report.bound, 215);
    assert_eq!(report.end_offset, 219);
    assert_eq!(report.entries, 9);
    assert_eq!(report.tombstones, 0);
}

#[test]
fn scalars_under_their_own_type() {
    let store = decode_container(&sample()).unwrap();

    assert_eq!(as_int32(&only_value(&store, "int32_positive_key")), Ok(i32::MAX));
    assert_eq!(as_int32(&only_value(&store, "int32_negative_key")), Ok(i32::MIN));
    assert_eq!(as_int64(&only_value(&store, "int64_positive_key")), Ok(i64::MAX));
    assert_eq!(as_int64(&only_value(&store, "int64_negative_key")), Ok(i64::MIN));
    assert_eq!(as_bool(&only_value(&store, "bool_true_key")), Some(true));
    assert_eq!(as_bool(&only_value(&store, "bool_false_key")), Some(false));
    assert_eq!(
        as_utf8_string(&only_value(&store, "string_key")),
        Some("steven pak")
    );
    assert_eq!(as_bytes(&only_value(&store, "bytes_key")), b"some bytes");
    assert_eq!(
        as_float64(&only_value(&store, "float_key")).unwrap().to_string(),
        "3.14"
    );
}

#[test]
fn cross_type_reinterpretation() {
    let store = decode_container(&sample()).unwrap();

    let negative = only_value(&store, "int32_negative_key");
    assert_eq!(as_uint32(&negative), Ok(0x8000_0000));
    assert!(as_float64(&negative).is_err());

    let string = only_value(&store, "string_key");
    assert_eq!(as_int32(&string), Ok(10));
    assert_eq!(as_bool(&string), None);
    assert_eq!(value::as_hex_string(&string), "0a73746576656e2070616b");
}

#[test]
fn rotating_a_view_visits_every_kind() {
    let store = decode_container(&sample()).unwrap();
    let span = only_value(&store, "bool_true_key");

    let mut view = ValueView::new(&span, Interpretation::default());
    let mut seen = Vec::new();
    for _ in 0..Interpretation::ALL.len() {
        seen.push((view.kind(), view.to_string()));
        view = view.rotate();
    }
    assert_eq!(view.kind(), Interpretation::HexString);
    assert_eq!(seen[0], (Interpretation::HexString, "01".to_string()));
    assert_eq!(seen[8], (Interpretation::Bool, "true".to_string()));
    assert_eq!(
        ValueView::new(&span, Interpretation::Int64).decode(),
        Ok(Decoded::Int64(1))
    );
}
