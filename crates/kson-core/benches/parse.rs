//! Parse/format throughput benchmarks.

use criterion::{criterion_group, criterion_main, Criterion};
use kson_core::{format, parse, FormatOptions, IndentStyle, Style};
use std::hint::black_box;

fn sample_document() -> String {
    let mut out = String::from("config:\n  retries: 3\n  timeout: 2.5\n");
    out.push_str("servers:\n");
    for i in 0..50 {
        out.push_str(&format!(
            "  - name: server{i}\n    port: {}\n    tags:\n      - primary\n      - 'zone {}'\n",
            8000 + i,
            i % 4
        ));
    }
    out.push_str("query: %sql: main\n  select * from servers\n  %%\n");
    out
}

fn bench_parse(c: &mut Criterion) {
    let doc = sample_document();
    c.bench_function("parse_medium_document", |b| {
        b.iter(|| parse(black_box(&doc)))
    });
}

fn bench_format(c: &mut Criterion) {
    let doc = sample_document();
    let styles = [
        ("plain", Style::Plain),
        ("delimited", Style::Delimited),
        ("compact", Style::Compact),
    ];
    for (name, style) in styles {
        let options = FormatOptions {
            indent: IndentStyle::Spaces(2),
            style,
        };
        c.bench_function(&format!("format_{name}"), |b| {
            b.iter(|| format(black_box(&doc), &options))
        });
    }
}

criterion_group!(benches, bench_parse, bench_format);
criterion_main!(benches);
