use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("landscape-report"));

// --- Report Metrics ---

pub static REPORT_RENDER_COUNT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("report.render.count")
        .with_description("Number of reports rendered")
        .with_unit("{report}")
        .build()
});

pub static REPORT_RENDER_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("report.render.duration")
        .with_description("Report composition duration in seconds")
        .with_unit("s")
        .build()
});

pub static REPORT_COMPARATORS: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("report.comparators")
        .with_description("Number of comparator organizations per report")
        .with_unit("{organization}")
        .build()
});

// --- Export Metrics ---

pub static EXPORT_ATTEMPTS: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("export.attempts")
        .with_description("Number of document exports started")
        .with_unit("{export}")
        .build()
});

pub static EXPORT_FAILURES: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("export.failures")
        .with_description("Number of document exports that failed")
        .with_unit("{export}")
        .build()
});

pub static EXPORT_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("export.duration")
        .with_description("Document export duration in seconds")
        .with_unit("s")
        .build()
});

pub static EXPORT_PAGES: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("export.pages")
        .with_description("Number of pages per exported document")
        .with_unit("{page}")
        .with_boundaries(vec![1.0, 2.0, 3.0, 4.0, 5.0, 10.0])
        .build()
});
