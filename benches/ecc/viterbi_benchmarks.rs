use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use viterbi_fec::code::SUPPORTED_CONSTRAINT_LENGTHS;
use viterbi_fec::prbs::prbs7;
use viterbi_fec::{decode, encode, CodeParams, TracebackStart, ViterbiDecoder, MAX_FRAME};

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for &k in SUPPORTED_CONSTRAINT_LENGTHS.iter() {
        let params = CodeParams::preset(k).unwrap();
        let bits = prbs7(params.max_data_bits(MAX_FRAME));
        group.throughput(Throughput::Elements(bits.len() as u64));

        group.bench_with_input(BenchmarkId::new("frame", k), &bits, |b, bits| {
            b.iter(|| encode(&params, black_box(bits)))
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for &k in SUPPORTED_CONSTRAINT_LENGTHS.iter() {
        let params = CodeParams::preset(k).unwrap();
        let bits = prbs7(params.max_data_bits(MAX_FRAME));
        let mut symbols = encode(&params, &bits);
        symbols[3] = symbols[3].flipped(0);
        group.throughput(Throughput::Elements(symbols.len() as u64));

        group.bench_with_input(BenchmarkId::new("pure", k), &symbols, |b, symbols| {
            b.iter(|| decode(&params, black_box(symbols), TracebackStart::BestMetric))
        });

        let mut decoder = ViterbiDecoder::with_params(params).unwrap();
        group.bench_with_input(BenchmarkId::new("handshake", k), &symbols, |b, symbols| {
            b.iter(|| decoder.decode_frame(black_box(symbols)))
        });
    }

    group.finish();
}

fn bench_long_frame(c: &mut Criterion) {
    let params = CodeParams::k7();
    let bits = prbs7(4096);
    let symbols = encode(&params, &bits);

    c.bench_function("decode_k7_4096_bits", |b| {
        b.iter(|| decode(&params, black_box(&symbols), TracebackStart::BestMetric))
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_long_frame);
criterion_main!(benches);
