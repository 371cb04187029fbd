#![allow(clippy::all)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::distributions::{Alphanumeric, DistString};
use rand::RngCore;
use ubex::{from_slice, to_vec, SizePolicy, Value};

fn root(entries: Vec<(&str, Value)>) -> Value {
    let mut v = Value::new_map();
    for (k, val) in entries {
        v[k] = val;
    }
    v
}

fn random_binary(len: usize) -> Value {
    let mut buf = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut buf);
    Value::Binary(buf)
}

fn random_string(len: usize) -> Value {
    Value::String(Alphanumeric.sample_string(&mut rand::thread_rng(), len))
}

fn random_int_array(len: usize) -> Value {
    let elements = (0..len).map(|_| Value::SignedInt(rand::random())).collect();
    Value::from_values(elements)
}

fn criterion_benchmark(c: &mut Criterion) {
    let value = root(vec![("v", Value::Null)]);
    c.bench_function("encode null", |b| {
        b.iter(|| to_vec(black_box(&value)).unwrap())
    });

    let value = root(vec![("v", Value::Bool(rand::random()))]);
    c.bench_function("encode bool", |b| {
        b.iter(|| to_vec(black_box(&value)).unwrap())
    });

    let value = root(vec![("v", Value::SignedInt(rand::random::<i64>()))]);
    c.bench_function("encode signed int", |b| {
        b.iter(|| to_vec(black_box(&value)).unwrap())
    });

    let value = root(vec![("v", Value::UnsignedInt(rand::random::<u64>()))]);
    c.bench_function("encode unsigned int", |b| {
        b.iter(|| to_vec(black_box(&value)).unwrap())
    });

    let value = root(vec![("v", Value::Float(rand::random::<f64>()))]);
    c.bench_function("encode float", |b| {
        b.iter(|| to_vec(black_box(&value)).unwrap())
    });

    for len in [16usize, 64, 256, 1024, 1024 * 1024] {
        let value = root(vec![("v", random_string(len))]);
        c.bench_function(&format!("encode String {len}B"), |b| {
            b.iter(|| to_vec(black_box(&value)).unwrap())
        });

        let bytes = to_vec(&value).unwrap();
        c.bench_function(&format!("decode String {len}B"), |b| {
            b.iter(|| from_slice(black_box(&bytes), SizePolicy::default()).unwrap())
        });
    }

    for len in [16usize, 64, 256, 1024, 1024 * 1024] {
        let value = root(vec![("v", random_binary(len))]);
        c.bench_function(&format!("encode Binary {len}B"), |b| {
            b.iter(|| to_vec(black_box(&value)).unwrap())
        });
    }

    for count in [10usize, 100, 1000] {
        let value = root(vec![("v", random_int_array(count))]);
        c.bench_function(&format!("encode homogeneous Array<SignedInt> {count}"), |b| {
            b.iter(|| to_vec(black_box(&value)).unwrap())
        });

        let bytes = to_vec(&value).unwrap();
        c.bench_function(&format!("decode homogeneous Array<SignedInt> {count}"), |b| {
            b.iter(|| from_slice(black_box(&bytes), SizePolicy::default()).unwrap())
        });
    }

    for count in [10usize, 100, 1000] {
        let mut m = Value::new_map();
        for i in 0..count {
            m[format!("key-{i}").as_str()] = Value::UnsignedInt(rand::random());
        }
        let value = root(vec![("v", m)]);
        c.bench_function(&format!("encode Map<String, UnsignedInt> {count}"), |b| {
            b.iter(|| to_vec(black_box(&value)).unwrap())
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
