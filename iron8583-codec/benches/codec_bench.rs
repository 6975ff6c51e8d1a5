//! Codec throughput benchmarks: encode and decode of each bundled codec
//! on representative field payloads.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use iron8583_codec::{Ascii, Bcd, BerTlv, Codec, Ebcdic037, Hex};

fn pan_digits() -> Vec<u8> {
    b"4532015112830366453201511283".to_vec()
}

fn tlv_sequence() -> Vec<u8> {
    let mut out = Vec::new();
    for _ in 0..8 {
        out.extend_from_slice(&[0x9F, 0x02, 0x06, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00]);
        out.extend_from_slice(&[0x95, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00]);
    }
    out
}

fn bench_encode(c: &mut Criterion) {
    let digits = pan_digits();
    let tlv = tlv_sequence();

    let mut group = c.benchmark_group("encode");
    group.bench_function("ascii", |b| {
        b.iter(|| Ascii.encode(black_box(&digits)).unwrap())
    });
    group.bench_function("bcd", |b| {
        b.iter(|| Bcd.encode(black_box(&digits)).unwrap())
    });
    group.bench_function("ebcdic", |b| {
        b.iter(|| Ebcdic037.encode(black_box(&digits)).unwrap())
    });
    group.bench_function("hex", |b| {
        b.iter(|| Hex.encode(black_box(&tlv)).unwrap())
    });
    group.bench_function("tlv", |b| {
        b.iter(|| BerTlv.encode(black_box(&tlv)).unwrap())
    });
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let bcd = Bcd.encode(&pan_digits()).unwrap();
    let ebcdic = Ebcdic037.encode(&pan_digits()).unwrap();
    let hex = Hex.encode(&tlv_sequence()).unwrap();
    let tlv = tlv_sequence();

    let mut group = c.benchmark_group("decode");
    group.bench_function("bcd", |b| {
        b.iter(|| Bcd.decode(black_box(&bcd)).unwrap())
    });
    group.bench_function("ebcdic", |b| {
        b.iter(|| Ebcdic037.decode(black_box(&ebcdic)).unwrap())
    });
    group.bench_function("hex", |b| {
        b.iter(|| Hex.decode(black_box(&hex)).unwrap())
    });
    group.bench_function("tlv", |b| {
        b.iter(|| BerTlv.decode(black_box(&tlv)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
