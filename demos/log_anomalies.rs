//! Cluster a handful of log lines and print what stands out.

use logclump::{parse_lines, Detector, DetectorConfig, HashingEmbedder};

const LOGS: &str = r#"
2025-08-01T12:00:01Z ERROR database timeout on users table
2025-08-01T12:00:02Z ERROR database timeout on users table
2025-08-01T12:00:04Z ERROR database timeout on users table
{"level":"INFO","message":"request ok /health","service":"api"}
{"level":"INFO","message":"request ok /health","service":"api"}
2025-08-01T12:00:03Z INFO request ok /health
2025-08-01T12:00:05Z INFO request ok /health
{"level":"ERROR","msg":"DB pool exhausted","service":"api"}
2025-08-01T12:00:09Z WARN certificate for api.internal expires in 2 days
"#;

fn main() {
    let config = DetectorConfig {
        min_samples: 2,
        ..Default::default()
    };
    let embedder = HashingEmbedder::new(config.embedding_dim).unwrap();
    let detector = Detector::new(config).unwrap();

    let report = detector.detect(parse_lines(LOGS), &embedder).unwrap();
    println!("{}", report.headline());

    println!("\n=== Anomalies ===");
    for msg in report.anomaly_messages() {
        println!("  {msg}");
    }

    println!("\n=== Clusters (largest first) ===");
    for summary in report.cluster_summaries(3) {
        println!("  cluster {} ({} lines)", summary.id, summary.size);
        for s in summary.samples {
            println!("    {s}");
        }
    }
}
