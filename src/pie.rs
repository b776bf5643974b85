use crate::catalog::StateCatalog;
use crate::format::format_duration;
use std::fmt::Write;

pub const START_OFFSET: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpec {
    pub color_index: usize,
    pub dash_percent: f64,
    pub gap_percent: f64,
    pub dash_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub color: String,
    pub name: String,
    pub duration_label: String,
}

pub fn compute_arcs(durations: &[i64]) -> Vec<ArcSpec> {
    // Summed as f64 so that i64 totals cannot overflow.
    let total = match durations.iter().map(|&ms| ms.max(0) as f64).sum::<f64>() {
        sum if sum > 0.0 => sum,
        _ => 1.0,
    };

    let mut offset = START_OFFSET;
    durations
        .iter()
        .enumerate()
        .map(|(color_index, &ms)| {
            let percent = ms.max(0) as f64 / total * 100.0;
            let arc = ArcSpec {
                color_index,
                dash_percent: percent,
                gap_percent: 100.0 - percent,
                dash_offset: offset,
            };
            offset -= percent;
            arc
        })
        .collect()
}

pub fn legend(durations: &[i64], catalog: &StateCatalog) -> Vec<LegendEntry> {
    durations
        .iter()
        .enumerate()
        .map(|(index, &ms)| LegendEntry {
            color: catalog.color_of(index).to_string(),
            name: catalog.name_of(index).to_string(),
            duration_label: format_duration(ms),
        })
        .collect()
}

pub fn range_label(days: u32) -> String {
    if days == 1 {
        "Last 24 hours".to_string()
    } else {
        format!("Last {days} days")
    }
}

pub fn render_svg(arcs: &[ArcSpec], catalog: &StateCatalog) -> String {
    let mut svg = String::from(r#"<svg id="pie" viewBox="0 0 32 32" role="img">"#);
    for arc in arcs {
        let _ = write!(
            svg,
            r#"<circle r="16" cx="16" cy="16" fill="transparent" stroke-width="32" stroke="{}" stroke-dasharray="{} {}" stroke-dashoffset="{}" />"#,
            crate::ui::escape_html(catalog.color_of(arc.color_index)),
            arc.dash_percent,
            arc.gap_percent,
            arc.dash_offset,
        );
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashes_cover_the_circle() {
        let arcs = compute_arcs(&[3_600_000, 0, 7_200_000, 1]);
        assert_eq!(arcs.len(), 4);
        let covered: f64 = arcs.iter().map(|arc| arc.dash_percent).sum();
        assert!((covered - 100.0).abs() < 1e-9);
        for arc in &arcs {
            assert!((arc.dash_percent + arc.gap_percent - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn offsets_accumulate_from_quarter_turn() {
        let arcs = compute_arcs(&[1, 1, 2]);
        assert_eq!(arcs[0].dash_offset, 25.0);
        assert_eq!(arcs[1].dash_offset, 0.0);
        assert_eq!(arcs[2].dash_offset, -25.0);
        assert_eq!(arcs[2].dash_percent, 50.0);
        assert_eq!(arcs[2].color_index, 2);
    }

    #[test]
    fn all_zero_durations_give_empty_chart() {
        let arcs = compute_arcs(&[0, 0, 0]);
        assert!(arcs.iter().all(|arc| arc.dash_percent == 0.0));
        assert!(arcs.iter().all(|arc| arc.gap_percent == 100.0));
        assert!(arcs.iter().all(|arc| arc.dash_offset == START_OFFSET));
    }

    #[test]
    fn negative_durations_draw_nothing() {
        let arcs = compute_arcs(&[-1, 1]);
        assert_eq!(arcs[0].dash_percent, 0.0);
        assert_eq!(arcs[1].dash_percent, 100.0);
        assert_eq!(arcs[1].dash_offset, START_OFFSET);
    }

    #[test]
    fn huge_durations_do_not_overflow() {
        let arcs = compute_arcs(&[i64::MAX, i64::MAX]);
        assert_eq!(arcs.len(), 2);
        assert_eq!(arcs[0].dash_percent, 50.0);
        assert_eq!(arcs[1].dash_percent, 50.0);
    }

    #[test]
    fn legend_lists_every_state() {
        let catalog = StateCatalog::default();
        let entries = legend(&[0, 90 * 60_000], &catalog);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].duration_label, "0s");
        assert_eq!(entries[1].name, "Work");
        assert_eq!(entries[1].duration_label, "1h 30m");
    }

    #[test]
    fn labels_name_the_window() {
        assert_eq!(range_label(1), "Last 24 hours");
        assert_eq!(range_label(7), "Last 7 days");
    }

    #[test]
    fn svg_draws_one_circle_per_arc() {
        let catalog = StateCatalog::default();
        let svg = render_svg(&compute_arcs(&[1, 3]), &catalog);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(r#"stroke-dasharray="75 25""#));
        assert!(svg.contains(r#"stroke-dashoffset="0""#));
    }
}
