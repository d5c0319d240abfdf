use super::Chart;
use crate::{
    components::figure::{FigureSpec, PanelSpec},
    datasets::processes::{self, PROCESSES, THREADS},
    functions::extract::{MetricSelector, Sweep},
    models::{measurement::Metric, variant::Variant},
};

const KB_PER_MB: f64 = 1024.0;

const ALL_COUNTS: Sweep = Sweep::Primary { fixed: None };

struct Measure {
    suffix: &'static str,
    analysis: &'static str,
    y_label: &'static str,
    selector: MetricSelector,
}

const MEASURES: [Measure; 3] = [
    Measure {
        suffix: "CPU_Plot",
        analysis: "CPU Usage Analysis",
        y_label: "CPU Usage (%)",
        selector: MetricSelector::Field {
            metric: Metric::CpuPercent,
            scale: 1.0,
        },
    },
    Measure {
        suffix: "Time_Plot",
        analysis: "Execution Time Analysis",
        y_label: "Execution Time (seconds)",
        selector: MetricSelector::Field {
            metric: Metric::TimeReal,
            scale: 1.0,
        },
    },
    Measure {
        suffix: "Memory_Plot",
        analysis: "Memory Usage Analysis",
        y_label: "Memory Usage (MB)",
        selector: MetricSelector::Field {
            metric: Metric::MemoryKb,
            scale: KB_PER_MB,
        },
    },
];

/// The four process/thread figures for one run, in write order.
pub fn charts(label: &str) -> Vec<Chart> {
    let mut charts: Vec<Chart> = MEASURES
        .iter()
        .map(|measure| per_family(label, measure))
        .collect();
    charts.push(comparison(label));
    charts
}

fn per_family(label: &str, measure: &Measure) -> Chart {
    let styles = processes::styles();
    let panel = |family: &str, title: &str, x_label: &str| {
        processes::variants_of(family).into_iter().fold(
            PanelSpec::new(title, x_label, measure.y_label).exact_ticks(),
            |panel, variant| {
                let line_label = styles.variant_label(&variant);
                panel.line(variant, measure.selector, ALL_COUNTS, line_label)
            },
        )
    };

    let spec = FigureSpec {
        title: format!("{label}: {}", measure.analysis),
        size: (14.0, 5.0),
        grid: (1, 2),
        panels: vec![
            panel(PROCESSES, "Program A (fork)", "Number of Processes"),
            panel(THREADS, "Program B (pthread)", "Number of Threads"),
        ],
    };
    Chart::new(label, measure.suffix, spec, styles)
}

fn comparison(label: &str) -> Chart {
    let styles = processes::comparison_styles();
    let panel = |title: &str, y_label: &str, selector: MetricSelector| {
        processes::WORKERS
            .into_iter()
            .flat_map(|worker| {
                processes::FAMILIES
                    .into_iter()
                    .map(move |family| Variant::in_family(family, worker))
            })
            .fold(PanelSpec::new(title, "Count", y_label), |panel, variant| {
                let line_label = format!(
                    "{} - {}",
                    styles.family_label(&variant).unwrap_or_default(),
                    variant.name
                );
                panel.line(variant, selector, ALL_COUNTS, line_label)
            })
    };

    let spec = FigureSpec {
        title: format!("{label}: Process vs Thread Comparison"),
        size: (14.0, 10.0),
        grid: (2, 2),
        panels: vec![
            panel(
                "CPU Usage Comparison",
                "CPU Usage (%)",
                MetricSelector::field(Metric::CpuPercent),
            ),
            panel(
                "Execution Time Comparison",
                "Time (seconds)",
                MetricSelector::field(Metric::TimeReal),
            ),
            panel(
                "Memory Usage Comparison",
                "Memory (MB)",
                MetricSelector::scaled(Metric::MemoryKb, KB_PER_MB),
            ),
            panel(
                "I/O Write Comparison",
                "I/O Write (KB/s)",
                MetricSelector::field(Metric::IoWrite),
            ),
        ],
    };
    Chart::new(label, "Combined_Plot", spec, styles)
}
