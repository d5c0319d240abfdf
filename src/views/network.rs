use super::Chart;
use crate::{
    components::figure::{FigureSpec, PanelSpec},
    datasets::network,
    functions::{
        derived::DerivedMetric,
        extract::{MetricSelector, Sweep},
    },
    models::{measurement::Metric, AxisValue},
};

const MILLIONS: f64 = 1e6;
const MSG_SIZE_LABEL: &str = "Message Size";

/// Axis values held fixed while the other one is swept.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Slice {
    pub threads: AxisValue,
    pub msg_size: AxisValue,
}

/// The four network figures for one run, in write order.
pub fn charts(label: &str, slice: Slice) -> Vec<Chart> {
    let by_size = Sweep::Primary {
        fixed: Some(slice.threads),
    };

    vec![
        single(
            label,
            "Throughput_vs_MsgSize",
            size_panel(
                format!("Throughput vs Message Size ({} threads)", slice.threads),
                "Throughput (Gbps)",
                MetricSelector::field(Metric::ThroughputGbps),
                by_size,
            ),
        ),
        single(
            label,
            "Latency_vs_Threads",
            implementations(
                PanelSpec::new(
                    format!("Latency vs Thread Count (msg_size={} bytes)", slice.msg_size),
                    "Thread Count",
                    "Average Latency (µs)",
                )
                .exact_ticks(),
                MetricSelector::field(Metric::LatencyUs),
                Sweep::Secondary {
                    fixed: slice.msg_size,
                },
            ),
        ),
        Chart::new(
            label,
            "CacheMisses_vs_MsgSize",
            FigureSpec {
                title: "Cache Misses vs Message Size".into(),
                size: (14.0, 6.0),
                grid: (1, 2),
                panels: vec![
                    size_panel(
                        format!("L1 Cache Misses ({} threads)", slice.threads),
                        "L1 Data Cache Misses (millions)",
                        MetricSelector::scaled(Metric::L1Misses, MILLIONS),
                        by_size,
                    ),
                    size_panel(
                        format!("LLC (Last-Level Cache) Misses ({} threads)", slice.threads),
                        "LLC Misses (millions)",
                        MetricSelector::scaled(Metric::LlcMisses, MILLIONS),
                        by_size,
                    ),
                ],
            },
            network::styles(),
        ),
        single(
            label,
            "CyclesPerByte_vs_MsgSize",
            size_panel(
                format!("CPU Cycles per Byte vs Message Size ({} threads)", slice.threads),
                "CPU Cycles per Byte",
                MetricSelector::Derived(DerivedMetric::CyclesPerByte),
                by_size,
            ),
        ),
    ]
}

fn single(label: &str, suffix: &str, panel: PanelSpec) -> Chart {
    let spec = FigureSpec {
        title: String::new(),
        size: (10.0, 6.0),
        grid: (1, 1),
        panels: vec![panel],
    };
    Chart::new(label, suffix, spec, network::styles())
}

fn size_panel(
    title: String,
    y_label: &str,
    selector: MetricSelector,
    sweep: Sweep,
) -> PanelSpec {
    implementations(
        PanelSpec::new(title, MSG_SIZE_LABEL, y_label)
            .log2()
            .exact_ticks()
            .byte_ticks(),
        selector,
        sweep,
    )
}

fn implementations(panel: PanelSpec, selector: MetricSelector, sweep: Sweep) -> PanelSpec {
    let styles = network::styles();
    network::variants()
        .into_iter()
        .fold(panel, |panel, variant| {
            let label = styles.variant_label(&variant);
            panel.line(variant, selector, sweep, label)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::figure::{AxisScale, TickFormat, TickMode};

    const SLICE: Slice = Slice {
        threads: AxisValue(4),
        msg_size: AxisValue(16384),
    };

    #[test]
    fn filenames_follow_the_label() {
        let names: Vec<String> = charts("pa02", SLICE)
            .into_iter()
            .map(|c| c.filename)
            .collect();
        assert_eq!(
            names,
            [
                "pa02_Throughput_vs_MsgSize.png",
                "pa02_Latency_vs_Threads.png",
                "pa02_CacheMisses_vs_MsgSize.png",
                "pa02_CyclesPerByte_vs_MsgSize.png",
            ]
        );
    }

    #[test]
    fn message_size_panels_use_log2_byte_ticks() {
        let charts = charts("pa02", SLICE);
        let throughput = &charts[0].spec.panels[0];
        assert_eq!(throughput.scale, AxisScale::Log2);
        assert_eq!(throughput.ticks, TickMode::Exact);
        assert_eq!(throughput.tick_format, TickFormat::Bytes);
        assert_eq!(throughput.x_label, "Message Size");
        assert_eq!(throughput.title, "Throughput vs Message Size (4 threads)");
        assert_eq!(throughput.lines.len(), 3);
        assert_eq!(throughput.lines[2].label, "Zero-Copy (MSG_ZEROCOPY)");
    }

    #[test]
    fn latency_sweeps_threads_at_the_configured_size() {
        let latency = &charts("pa02", SLICE)[1].spec.panels[0];
        assert_eq!(latency.scale, AxisScale::Linear);
        assert_eq!(latency.title, "Latency vs Thread Count (msg_size=16384 bytes)");
        assert!(latency.lines.iter().all(|line| line.sweep
            == Sweep::Secondary {
                fixed: AxisValue(16384)
            }));
    }

    #[test]
    fn cache_misses_are_scaled_to_millions() {
        let cache = &charts("pa02", SLICE)[2].spec;
        assert_eq!(cache.grid, (1, 2));
        assert_eq!(
            cache.panels[1].lines[0].selector,
            MetricSelector::scaled(Metric::LlcMisses, 1e6)
        );
    }

    #[test]
    fn threads_slice_is_honoured() {
        let slice = Slice {
            threads: AxisValue(8),
            ..SLICE
        };
        let cpb = &charts("pa02", slice)[3].spec.panels[0];
        assert_eq!(
            cpb.lines[0].sweep,
            Sweep::Primary {
                fixed: Some(AxisValue(8))
            }
        );
        assert_eq!(
            cpb.lines[0].selector,
            MetricSelector::Derived(DerivedMetric::CyclesPerByte)
        );
    }
}
