//! Minimal SVG rendering for scatter artifacts.
//!
//! Coordinates in points; the data range is padded so jittered clouds around
//! 0 and 1 stay inside the frame. No external rendering stack, just SVG
//! markup assembled into a string.

use crate::scatter::ScatterArtifact;

const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 28.0;
const MARGIN_BOTTOM: f64 = 44.0;

// Data range for binary axes with jitter headroom.
const AXIS_MIN: f64 = -0.6;
const AXIS_MAX: f64 = 1.6;

const COLOR_GROUP0: &str = "#3471b8"; // no malaria
const COLOR_GROUP1: &str = "#c23b22"; // malaria

fn esc(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Render a scatter artifact as a standalone SVG document.
pub fn render_scatter_svg(artifact: &ScatterArtifact, width: f64, height: f64) -> String {
    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
    let span = AXIS_MAX - AXIS_MIN;

    let to_px_x = |v: f64| MARGIN_LEFT + (v - AXIS_MIN) / span * plot_w;
    let to_px_y = |v: f64| MARGIN_TOP + (AXIS_MAX - v) / span * plot_h;

    let mut out = String::with_capacity(4096 + artifact.x.len() * 80);
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\">\n",
        w = width,
        h = height
    ));
    out.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#ffffff\"/>\n",
        width, height
    ));

    // Frame
    out.push_str(&format!(
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" \
         stroke=\"#333333\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT, MARGIN_TOP, plot_w, plot_h
    ));

    // Category ticks and labels on both axes
    for v in [0.0_f64, 1.0] {
        let px = to_px_x(v);
        let py = to_px_y(v);
        out.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#333333\"/>\n",
            px,
            MARGIN_TOP + plot_h,
            px,
            MARGIN_TOP + plot_h + 5.0
        ));
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\" \
             font-family=\"sans-serif\">{}</text>\n",
            px,
            MARGIN_TOP + plot_h + 18.0,
            v as i64
        ));
        out.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#333333\"/>\n",
            MARGIN_LEFT - 5.0,
            py,
            MARGIN_LEFT,
            py
        ));
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\" \
             font-family=\"sans-serif\">{}</text>\n",
            MARGIN_LEFT - 9.0,
            py + 4.0,
            v as i64
        ));
    }

    // Axis labels
    out.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\" \
         font-family=\"sans-serif\">{}</text>\n",
        MARGIN_LEFT + plot_w / 2.0,
        height - 8.0,
        esc(&artifact.x_label)
    ));
    out.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\" \
         font-family=\"sans-serif\" transform=\"rotate(-90 {x:.1} {y:.1})\">{}</text>\n",
        14.0,
        MARGIN_TOP + plot_h / 2.0,
        esc(&artifact.y_label),
        x = 14.0,
        y = MARGIN_TOP + plot_h / 2.0
    ));

    // Points
    for ((&xj, &yj), &g) in artifact.x.iter().zip(&artifact.y).zip(&artifact.group) {
        let color = if g == 1.0 { COLOR_GROUP1 } else { COLOR_GROUP0 };
        out.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"2.2\" fill=\"{}\" fill-opacity=\"0.55\"/>\n",
            to_px_x(xj),
            to_px_y(yj),
            color
        ));
    }

    // Legend, top-right inside the frame
    let lx = MARGIN_LEFT + plot_w - 120.0;
    let ly = MARGIN_TOP + 12.0;
    for (i, (color, label)) in
        [(COLOR_GROUP0, "no malaria"), (COLOR_GROUP1, "malaria")].iter().enumerate()
    {
        let row_y = ly + i as f64 * 16.0;
        out.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"{}\"/>\n",
            lx,
            row_y,
            color
        ));
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" font-family=\"sans-serif\">{}</text>\n",
            lx + 10.0,
            row_y + 4.0,
            label
        ));
    }

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scatter::compliance_scatter;
    use cw_core::TrialData;

    #[test]
    fn test_svg_structure() {
        let data = TrialData::new(
            vec![0.0, 1.0, 1.0],
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0],
        )
        .unwrap();
        let art = compliance_scatter(&data, 1, 0.1).unwrap();
        let svg = render_scatter_svg(&art, 480.0, 360.0);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 3 + 2); // points + legend
        assert!(svg.contains("sms (assigned encouragement)"));
        assert!(svg.contains("net_use (treatment received)"));
    }
}
