//! 扫描性能基准测试
//!
//! 使用 criterion 测试 diff 解析和多语言扫描的性能

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::fmt::Write;
use std::hint::black_box;
use std::time::Duration;
use variable_diff_core::{ParseOptions, Scanner, parse_diff};

const EXTENSIONS: &[&str] = &["ts", "py", "go", "java", "rb", "php"];

/// 生成包含多个文件的 diff，每个文件一个差异块
fn generate_diff(file_count: usize) -> String {
    let mut diff = String::new();

    for i in 0..file_count {
        let extension = EXTENSIONS[i % EXTENSIONS.len()];
        let path = format!("src/module_{i}/file_{i}.{extension}");
        let _ = writeln!(diff, "diff --git a/{path} b/{path}");
        let _ = writeln!(diff, "--- a/{path}");
        let _ = writeln!(diff, "+++ b/{path}");
        let _ = writeln!(diff, "@@ -1,7 +1,12 @@");
        let _ = writeln!(diff, " // unchanged header {i}");
        let _ = writeln!(diff, "-dvcClient.variable(user, \"old-flag-{i}\", false)");
        let _ = writeln!(diff, "+dvcClient.variable(user, \"new-flag-{i}\", false)");
        let _ = writeln!(diff, "+const value = client.variableValue(user, VARIABLES.FLAG_{i}, 0)");
        let _ = writeln!(diff, "+// dvcClient.variable(user, \"commented-{i}\", false)");
        let _ = writeln!(diff, "+const multi = dvcClient.variable(");
        let _ = writeln!(diff, "+  user,");
        let _ = writeln!(diff, "+  \"multi-{i}\",");
        let _ = writeln!(diff, "+  true)");
        for line in 0..4 {
            let _ = writeln!(diff, " unrelated_{line}(\"text\", {i})");
        }
        let _ = writeln!(diff, "-removed_{i}()");
    }

    diff
}

fn bench_parse_diff(c: &mut Criterion) {
    let diff = generate_diff(200);

    c.bench_function("parse_diff_200_files", |b| {
        b.iter(|| {
            let files = parse_diff(black_box(&diff)).expect("diff should parse");
            black_box(files);
        })
    });
}

fn bench_scan(c: &mut Criterion) {
    let scanner = Scanner::new(&ParseOptions::default()).expect("scanner should compile");

    let mut group = c.benchmark_group("scan");

    // 测试不同文件数量的扫描性能
    for file_count in [10usize, 100, 1000] {
        let files = parse_diff(&generate_diff(file_count)).expect("diff should parse");
        group.throughput(Throughput::Elements(file_count as u64));
        group.bench_with_input(BenchmarkId::new("files", file_count), &files, |b, files| {
            b.iter(|| {
                let results = scanner.scan(black_box(files));
                black_box(results);
            })
        });
    }

    group.finish();
}

fn bench_scanner_construction(c: &mut Criterion) {
    let options = ParseOptions::new()
        .with_client_names(["featureFlags", "flags"])
        .with_match_pattern("yaml", r"flag:\s*([\w-]+)")
        .with_match_pattern("js", r#"checkVariable\(\w+,\s*"([^"]+)""#);

    c.bench_function("scanner_new", |b| {
        b.iter(|| {
            let scanner = Scanner::new(black_box(&options)).expect("scanner should compile");
            black_box(scanner);
        })
    });
}

fn bench_with_custom_patterns(c: &mut Criterion) {
    let options = ParseOptions::new()
        .with_match_pattern("ts", r"useFlag\((\w+)\)")
        .with_match_pattern("py", r"flags\[(\w+)\]")
        .with_variable_alias("VARIABLES.FLAG_1", "flag-one");
    let scanner = Scanner::new(&options).expect("scanner should compile");
    let files = parse_diff(&generate_diff(500)).expect("diff should parse");

    let mut group = c.benchmark_group("custom_patterns");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("files_500", |b| {
        b.iter(|| black_box(scanner.scan(black_box(&files))))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_parse_diff,
    bench_scan,
    bench_scanner_construction,
    bench_with_custom_patterns
);
criterion_main!(benches);
