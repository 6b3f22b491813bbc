use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dinsp_decoder::{IntegralFileParser, SessionConfig};
use dinsp_encoder::{SynthOptions, synthetic_file};
use dinsp_types::{IntegerWidth, ValueKind};
use dinsp_wire::{Layout, RecordReader};

fn options(width: IntegerWidth, kind: ValueKind) -> SynthOptions {
    SynthOptions {
        width,
        kind,
        kramers_pairs: 32,
        blocks: 2_000,
        ..SynthOptions::default()
    }
}

fn bench_block_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_stream");

    for width in [IntegerWidth::Narrow, IntegerWidth::Wide] {
        for kind in [ValueKind::Real, ValueKind::Complex] {
            let bytes = synthetic_file(&options(width, kind)).unwrap();
            group.throughput(Throughput::Bytes(bytes.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{width}"), kind),
                &bytes,
                |b, bytes| {
                    b.iter(|| {
                        IntegralFileParser::new(
                            RecordReader::new(Cursor::new(bytes.as_slice())),
                            SessionConfig::new(width, kind),
                        )
                        .unwrap()
                        .parse()
                        .unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_materialized_blocks(c: &mut Criterion) {
    let bytes = synthetic_file(&options(IntegerWidth::Narrow, ValueKind::Complex)).unwrap();

    c.bench_function("block_stream_to_owned", |b| {
        b.iter(|| {
            let mut blocks = Vec::new();
            IntegralFileParser::new(
                RecordReader::new(Cursor::new(bytes.as_slice())),
                SessionConfig::new(IntegerWidth::Narrow, ValueKind::Complex),
            )
            .unwrap()
            .parse_with(|block| blocks.push(block.to_block()))
            .unwrap();
            blocks
        });
    });
}

fn bench_layout_parse(c: &mut Criterion) {
    c.bench_function("layout_parse", |b| {
        b.iter(|| Layout::parse("3i8,c16[#2],z8[#2]").unwrap());
    });
}

criterion_group!(
    benches,
    bench_block_stream,
    bench_materialized_blocks,
    bench_layout_parse
);
criterion_main!(benches);
