use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glint_text::{layout, FontAtlas, GlyphMetrics, UvRect};

/// Printable-ASCII metrics table with mildly varied widths.
fn bench_font() -> FontAtlas {
    let glyphs = (0..95u32)
        .map(|i| {
            let width = 6.0 + (i % 7) as f32;
            GlyphMetrics {
                width,
                height: 14.0,
                advance: width + 1.0,
                uv: UvRect {
                    u_min: (i % 16) as f32 / 16.0,
                    v_min: (i / 16) as f32 / 16.0,
                    u_max: (i % 16 + 1) as f32 / 16.0,
                    v_max: (i / 16 + 1) as f32 / 16.0,
                },
            }
        })
        .collect();
    FontAtlas::new(' ', glyphs).with_window(1280.0, 720.0)
}

fn bench_layout_short(c: &mut Criterion) {
    let font = bench_font();
    c.bench_function("layout_short", |b| {
        b.iter(|| layout(black_box("Hello, world!"), &font, 0));
    });
}

fn bench_layout_paragraph(c: &mut Criterion) {
    let font = bench_font();
    let paragraph = "The quick brown fox jumps over the lazy dog. \
        Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
        Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";
    c.bench_function("layout_paragraph", |b| {
        b.iter(|| layout(black_box(paragraph), &font, 0));
    });
}

fn bench_layout_with_skips(c: &mut Criterion) {
    let font = bench_font();
    // Half the codepoints fall outside the table.
    let text: String = "Héllo wörld — ünïcode münch ".repeat(8);
    c.bench_function("layout_with_skips", |b| {
        b.iter(|| layout(black_box(&text), &font, 0));
    });
}

fn bench_layout_truncated(c: &mut Criterion) {
    let font = bench_font();
    let long: String = "abcdefgh ".repeat(64);
    c.bench_function("layout_truncated_32", |b| {
        b.iter(|| layout(black_box(&long), &font, 32));
    });
}

criterion_group!(
    benches,
    bench_layout_short,
    bench_layout_paragraph,
    bench_layout_with_skips,
    bench_layout_truncated
);
criterion_main!(benches);
