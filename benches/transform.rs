//! Benchmarks for the transform pipeline.
//!
//! Run with: cargo bench

use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use semtree::executor::{DispatchKey, Visit};
use semtree::plugin::FnPlugin;
use semtree::{StyleMode, TransformOptions, Transformer};

/// Article-like page with the usual mix of blocks, lists, tables and images.
fn sample_page(sections: usize) -> String {
    let mut html = String::from("<html><head><title>Sample</title></head><body>");
    for i in 0..sections {
        html.push_str(&format!(
            r##"<section style="padding: 8px; color: #333">
                <h2>Section {i}</h2>
                <p>Some <b>bold</b>, <i>italic</i> and <code>code</code> text.<br>Second line.</p>
                <ul><li>alpha</li><li>beta</li><li><a href="#x">gamma</a></li></ul>
                <table><thead><tr><th>k</th><th>v</th></tr></thead>
                <tbody><tr><td>a</td><td>1</td></tr><tr><td>b</td><td>2</td></tr></tbody></table>
                <img src="figure-{i}.png" width="320" alt="figure">
                <script>track({i});</script>
            </section>"##
        ));
    }
    html.push_str("</body></html>");
    html
}

// ============================================================================
// Pipeline Benchmarks
// ============================================================================

fn bench_transform_default(c: &mut Criterion) {
    let html = sample_page(50);
    let engine = Transformer::new();
    let options = TransformOptions::default();

    c.bench_function("transform_default", |b| {
        b.iter(|| engine.transform(&html, &options).unwrap());
    });
}

fn bench_transform_css_class(c: &mut Criterion) {
    let html = sample_page(50);
    let engine = Transformer::new();
    let options = TransformOptions::default().with_style_mode(StyleMode::CssClass);

    c.bench_function("transform_css_class", |b| {
        b.iter(|| engine.transform(&html, &options).unwrap());
    });
}

fn bench_transform_validated(c: &mut Criterion) {
    let html = sample_page(50);
    let engine = Transformer::new();
    let options = TransformOptions::default().with_validation();

    c.bench_function("transform_validated", |b| {
        b.iter(|| engine.transform(&html, &options).unwrap());
    });
}

// ============================================================================
// Batching Benchmarks
// ============================================================================

fn bench_transform_extra_handlers(c: &mut Criterion) {
    let html = sample_page(50);
    let engine = Transformer::new();
    let mut options = TransformOptions::default();
    for i in 0..8 {
        let plugin = FnPlugin::handlers(&format!("noop-{i}"), "capability", |_, registry| {
            registry.on(DispatchKey::AnyElement, |_| Ok(Visit::Unchanged));
            Ok(())
        })
        .unwrap();
        options = options.with_extra(Arc::new(plugin));
    }

    c.bench_function("transform_extra_handlers", |b| {
        b.iter(|| engine.transform(&html, &options).unwrap());
    });
}

criterion_group!(
    benches,
    // Pipeline
    bench_transform_default,
    bench_transform_css_class,
    bench_transform_validated,
    // Batching
    bench_transform_extra_handlers,
);
criterion_main!(benches);
