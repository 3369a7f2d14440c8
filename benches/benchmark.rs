//! パフォーマンスベンチマーク
//!
//! このモジュールは、xlsxformクレートのパフォーマンスを測定するためのベンチマークを提供します。
//!
//! 実装するベンチマーク:
//! - 描画パートの出力（図形1000個）
//! - 描画パートの読み込み（図形1000個）
//! - 複数パートの並列読み込み
//! - テキストボディの正規化

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use xlsxform::shape::{PropsDescriptor, ShapeDescriptor, TextBodyInput};
use xlsxform::types::{Color, Fill, Outline};
use xlsxform::{DrawingOptions, ShapeSheet};

/// ベンチマーク用の図形シートを生成
fn generate_sheet(count: usize) -> ShapeSheet {
    let mut sheet = ShapeSheet::new();
    for i in 0..count {
        let row = (i / 8) * 4 + 1;
        let col = (i % 8) * 3;
        let range = format!(
            "{}{}:{}{}",
            col_letter(col),
            row,
            col_letter(col + 2),
            row + 2
        );
        let props = if i % 3 == 0 {
            PropsDescriptor::new("straightConnector1").with_outline(Outline {
                weight: Some(12700),
                color: Some(Color::theme("accent1")),
                ..Outline::default()
            })
        } else {
            PropsDescriptor::new("roundRect")
                .with_fill(Fill::solid(Color::rgb("DDEBF7")))
                .with_rotation((i % 360) as f64)
                .with_text_body(vec![format!("Shape {}", i), "detail".to_string()])
        };
        let descriptor = ShapeDescriptor::new(props, range.as_str())
            .with_name(&format!("Generated {}", i))
            .with_id(&format!("shape-{}", i));
        if let Err(e) = sheet.add_shape(descriptor) {
            eprintln!("Warning: Failed to add shape {}: {}", i, e);
        }
    }
    sheet
}

/// 列番号（0始まり、A-X）を列文字に変換
fn col_letter(col: usize) -> char {
    (b'A' + col as u8) as char
}

fn benchmark_render(c: &mut Criterion) {
    let sheet = generate_sheet(1000);

    let mut group = c.benchmark_group("render");
    group.sample_size(20);
    group.bench_function("render_1000_shapes", |b| {
        b.iter(|| {
            let xml = sheet.to_drawing_xml().expect("render failed");
            black_box(xml);
        });
    });
    group.finish();
}

fn benchmark_parse(c: &mut Criterion) {
    let xml = match generate_sheet(1000).to_drawing_xml() {
        Ok(xml) => xml,
        Err(e) => {
            eprintln!("Warning: Failed to render drawing: {}. Skipping benchmark.", e);
            return;
        }
    };

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(xml.len() as u64));
    group.sample_size(20);
    group.bench_function("parse_1000_shapes", |b| {
        b.iter(|| {
            let sheet = ShapeSheet::from_drawing_xml(black_box(&xml), DrawingOptions::default())
                .expect("parse failed");
            black_box(sheet);
        });
    });
    group.finish();
}

/// 複数の描画パートを並列に読み込む
fn benchmark_parse_parts(c: &mut Criterion) {
    let parts: Vec<String> = (0..50)
        .filter_map(|_| generate_sheet(100).to_drawing_xml().ok())
        .collect();
    let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
    let total: usize = parts.iter().map(String::len).sum();

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Bytes(total as u64));
    group.sample_size(10);
    group.bench_function("parse_50_parts", |b| {
        b.iter(|| {
            let sheets = ShapeSheet::parse_parts(black_box(&refs), &DrawingOptions::default())
                .expect("parse failed");
            black_box(sheets);
        });
    });
    group.finish();
}

fn benchmark_normalize(c: &mut Criterion) {
    let paragraphs: Vec<Vec<String>> = (0..100)
        .map(|p| (0..10).map(|r| format!("run {} of paragraph {}", r, p)).collect())
        .collect();

    c.bench_function("normalize_text_body", |b| {
        b.iter(|| {
            let body = TextBodyInput::from(black_box(paragraphs.clone())).normalize();
            black_box(body);
        });
    });
}

criterion_group!(
    benches,
    benchmark_render,
    benchmark_parse,
    benchmark_parse_parts,
    benchmark_normalize
);
criterion_main!(benches);
