//! `Decoder` is generic over any `std::io::Read`, not just in-memory
//! slices; exercise it against a `bytes::Bytes` buffer via `Buf::reader`.

use bytes::{Buf, Bytes};
use ubex::{from_reader, to_vec, SizePolicy, Value};

#[test]
fn decodes_from_a_bytes_buffer_through_its_io_read_adapter() {
    let mut v = Value::new_map();
    v["a"] = Value::SignedInt(-7);
    v["b"] = Value::String("hello".to_string());

    let wire = to_vec(&v).unwrap();
    let buf = Bytes::from(wire);
    let decoded = from_reader(buf.reader(), SizePolicy::default()).unwrap();
    assert_eq!(decoded, v);
}
