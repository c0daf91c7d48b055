//! Benchmarks for Parlor codec operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parlor::protocol::{decode_response, encode_packet, Packet};

fn codec_benchmarks(c: &mut Criterion) {
    let connect = Packet::Connect {
        username: "alice".to_string(),
        password: "secret".to_string(),
    };
    c.bench_function("encode_connect", |b| {
        b.iter(|| encode_packet(black_box(&connect)))
    });

    let join = Packet::JoinGame { game_id: 7 };
    c.bench_function("encode_join_game", |b| {
        b.iter(|| encode_packet(black_box(&join)))
    });

    let message = b"1 game available";
    let mut response = vec![0u8, message.len() as u8];
    response.extend_from_slice(message);
    c.bench_function("decode_response", |b| {
        b.iter(|| decode_response(black_box(&response)).unwrap())
    });
}

criterion_group!(benches, codec_benchmarks);
criterion_main!(benches);
