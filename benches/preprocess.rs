use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rust_barcode::tools::checkerboard_frame;
use rust_barcode::{BarcodeScanner, FrameSession, PreprocessingPipeline, ScannerConfiguration};

fn bench_enhance(c: &mut Criterion) {
    let pipeline = PreprocessingPipeline::new();
    let mut group = c.benchmark_group("enhance");

    for side in [160u32, 320, 640] {
        let frame = checkerboard_frame(side, side, 8);
        for (name, config) in [
            ("shipping_label", ScannerConfiguration::shipping_label()),
            ("low_resolution", ScannerConfiguration::low_resolution()),
        ] {
            group.bench_with_input(BenchmarkId::new(name, side), &frame, |b, frame| {
                b.iter(|| pipeline.enhance(black_box(frame), &config));
            });
        }
    }
    group.finish();
}

fn bench_process_frame(c: &mut Criterion) {
    let frame = checkerboard_frame(320, 320, 8);
    let mut scanner = BarcodeScanner::new(ScannerConfiguration::shipping_label());
    let mut session = FrameSession::new();
    session.start();

    c.bench_function("process_frame_shipping_label_320", |b| {
        b.iter(|| scanner.process_frame(&session, black_box(&frame)))
    });
}

criterion_group!(benches, bench_enhance, bench_process_frame);
criterion_main!(benches);
