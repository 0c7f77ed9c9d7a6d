use mmkv_reader::container::varint::{self, MAX_VARINT_LEN, Width};
use mmkv_reader::container::{ContainerBuilder, DecodedStore, ScanOutcome, read_header, scan};
use mmkv_reader::engine::{ScanOptions, decode_container, inspect_container};
use mmkv_reader::value::{Interpretation, ValueView, as_int32, as_int64, as_uint64};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Put(String, Vec<u8>),
    Remove(String),
}

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("\u{1F511}".to_string()),
        "[a-z_]{1,24}",
    ]
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        3 => (key(), proptest::collection::vec(any::<u8>(), 1..200)).prop_map(|(k, v)| Op::Put(k, v)),
        1 => key().prop_map(Op::Remove),
    ];
    proptest::collection::vec(op, 0..40)
}

fn build(ops: &[Op]) -> Vec<u8> {
    let mut builder = ContainerBuilder::new().declared_size(0);
    for op in ops {
        match op {
            Op::Put(k, v) => builder.put_raw(k, v),
            Op::Remove(k) => builder.remove(k),
        };
    }
    builder.finish()
}

/// Every key of `part` appears in `full` in the same order, and each
/// history in `part` is a prefix of the one in `full`.
fn is_prefix_of(part: &DecodedStore, full: &DecodedStore) -> bool {
    let full_keys: Vec<_> = full.keys().collect();
    let keys: Vec<_> = part.keys().collect();
    full_keys.starts_with(&keys)
        && part
            .iter()
            .all(|(k, history)| full.get(k).is_some_and(|h| h.starts_with(history)))
}

proptest! {
    #[test]
    fn prop_unsigned_varint_roundtrip(n in any::<u64>()) {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let len = varint::encode_u64(n, &mut buf);
        prop_assert_eq!(len, varint::encoded_len(n));
        let (decoded, consumed) = varint::decode_unsigned(&buf[..len], 0, Width::W64).unwrap();
        prop_assert_eq!(decoded, n);
        prop_assert_eq!(consumed, len);
    }

    #[test]
    fn prop_signed_varint_roundtrip(n in any::<i64>()) {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let len = varint::encode_i64(n, &mut buf);
        if n < 0 {
            prop_assert_eq!(len, MAX_VARINT_LEN);
        }
        prop_assert_eq!(as_int64(&buf[..len]), Ok(n));
        prop_assert_eq!(as_uint64(&buf[..len]), Ok(n as u64));
    }

    #[test]
    fn prop_int32_values_survive_storage(values in proptest::collection::vec(any::<i32>(), 1..20)) {
        let mut builder = ContainerBuilder::new();
        for v in &values {
            builder.put_i32("n", *v);
        }
        let store = decode_container(&builder.finish()).unwrap();
        let decoded: Vec<i32> = store.get("n").unwrap().iter().map(|v| as_int32(v).unwrap()).collect();
        prop_assert_eq!(decoded, values);
    }

    #[test]
    fn prop_store_matches_op_log(ops in ops()) {
        let store = decode_container(&build(&ops)).unwrap();

        let mut expected_keys: Vec<&str> = Vec::new();
        for op in &ops {
            if let Op::Put(k, _) = op
                && !expected_keys.contains(&k.as_str())
            {
                expected_keys.push(k);
            }
        }
        prop_assert_eq!(store.keys().collect::<Vec<_>>(), expected_keys.clone());

        for k in expected_keys {
            let history: Vec<&[u8]> = ops
                .iter()
                .filter_map(|op| match op {
                    Op::Put(pk, v) if pk == k => Some(v.as_slice()),
                    _ => None,
                })
                .collect();
            let stored: Vec<&[u8]> = store.get(k).unwrap().iter().map(Vec::as_slice).collect();
            prop_assert_eq!(stored, history);
        }
    }

    #[test]
    fn prop_truncated_scan_is_a_prefix(ops in ops(), cut in any::<prop::sample::Index>()) {
        let full = build(&ops);
        let full_store = decode_container(&full).unwrap();
        let len = 8 + cut.index(full.len() - 7);
        let store = decode_container(&full[..len]).unwrap();
        prop_assert!(is_prefix_of(&store, &full_store));
    }

    #[test]
    fn prop_bounded_scan_is_a_prefix(
        ops in ops(),
        bound in any::<prop::sample::Index>(),
        cut in any::<prop::sample::Index>(),
    ) {
        let unbounded = build(&ops);
        let reference = decode_container(&unbounded).unwrap();

        let declared = 8 + bound.index(unbounded.len() - 7);
        let mut bounded = unbounded;
        bounded[..4].copy_from_slice(&(declared as u32).to_le_bytes());

        // Every record ends inside the buffer, so the full bounded buffer
        // always stops on the declared size.
        let (_, report) = inspect_container(&bounded, &ScanOptions::default()).unwrap();
        prop_assert_eq!(report.outcome, ScanOutcome::ReachedBound);
        prop_assert!(report.end_offset >= declared);
        prop_assert!(is_prefix_of(&report.store, &reference));

        let len = 8 + cut.index(bounded.len() - 7);
        let store = decode_container(&bounded[..len]).unwrap();
        prop_assert!(is_prefix_of(&store, &report.store));
    }

    #[test]
    fn prop_scan_never_panics_and_is_idempotent(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        if let Ok(header) = read_header(&data) {
            prop_assert_eq!(scan(&data, &header), scan(&data, &header));
        }
    }

    #[test]
    fn prop_reinterpretation_is_pure(span in proptest::collection::vec(any::<u8>(), 0..24)) {
        let copy = span.clone();
        for kind in Interpretation::ALL {
            let view = ValueView::new(&span, kind);
            // NaN floats compare unequal, so compare renderings.
            prop_assert_eq!(view.to_string(), view.to_string());
        }
        prop_assert_eq!(span, copy);
    }
}
