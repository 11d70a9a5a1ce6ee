//! Prometheus text exposition format.
//!
//! Renders the observations of one cycle for scraping by a Prometheus
//! server or compatible agent.

use std::fmt::Write;

use crate::metrics;
use crate::types::Observation;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render observations into Prometheus text format.
///
/// Families appear in declaration order with their HELP and TYPE lines;
/// families without samples are left out. Samples inside a family are
/// sorted by label values so output is stable between scrapes.
pub fn render(observations: &[Observation]) -> String {
    let mut out = String::new();

    for desc in metrics::ALL {
        let mut samples: Vec<&Observation> = observations
            .iter()
            .filter(|o| std::ptr::eq(o.desc, desc))
            .collect();
        if samples.is_empty() {
            continue;
        }
        samples.sort_by(|a, b| a.labels.cmp(&b.labels));

        let _ = writeln!(out, "# HELP {} {}", desc.name, desc.help);
        let _ = writeln!(out, "# TYPE {} {}", desc.name, desc.kind);
        for s in samples {
            out.push_str(desc.name);
            if !s.labels.is_empty() {
                out.push('{');
                for (i, label) in s.labels.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, "{}=\"{}\"", label.key, escape(&label.value));
                }
                out.push('}');
            }
            let _ = writeln!(out, " {}", format_value(s.value));
        }
    }

    out
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{AUDIT_SCORE, DISK_SPACE, PAYOUT};

    fn obs(desc: &'static metrics::MetricDesc, labels: &[&str], value: f64) -> Observation {
        Observation::new(desc, labels, value).unwrap()
    }

    #[test]
    fn render_empty() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn render_family_with_help_and_type() {
        let output = render(&[
            obs(&DISK_SPACE, &["alpha", "used"], 5.0),
            obs(&DISK_SPACE, &["alpha", "available"], 10.0),
        ]);

        let expected = "\
# HELP storj_disk_space Total space by type in bytes.
# TYPE storj_disk_space counter
storj_disk_space{node=\"alpha\",type=\"available\"} 10
storj_disk_space{node=\"alpha\",type=\"used\"} 5
";
        assert_eq!(output, expected);
    }

    #[test]
    fn render_gauge_and_fractions() {
        let output = render(&[
            obs(&AUDIT_SCORE, &["alpha", "sat.example", "audit"], 0.99),
            obs(&PAYOUT, &["alpha", "total"], 256.33),
        ]);

        assert!(output.contains("# TYPE storj_audit_score gauge"));
        assert!(output.contains("storj_audit_score{node=\"alpha\",satellite=\"sat.example\",type=\"audit\"} 0.99\n"));
        assert!(output.contains("storj_node_payout_dollars{node=\"alpha\",type=\"total\"} 256.33\n"));
        // payout is declared before audit score
        assert!(output.find("storj_node_payout_dollars").unwrap() < output.find("storj_audit_score").unwrap());
    }

    #[test]
    fn label_values_are_escaped() {
        let output = render(&[obs(&DISK_SPACE, &["a\"b\\c\nd", "used"], 1.0)]);
        assert!(output.contains(r#"node="a\"b\\c\nd""#), "{output}");
    }

    #[test]
    fn special_values() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_value(-60.0), "-60");
    }

    #[test]
    fn every_sample_line_has_labels() {
        let output = render(&[
            obs(&DISK_SPACE, &["alpha", "trash"], 1.0),
            obs(&metrics::UPTIME, &["alpha"], 42.5),
        ]);

        for line in output.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            assert!(line.contains('{') && line.contains('}'), "line should have labels: {line}");
        }
    }
}
