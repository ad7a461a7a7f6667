use serde_json::{json, Value};

pub const CHART_TITLE: &str = "Daily Stock & Sector Blocks";

const GRID_COLOR: &str = "rgba(59,68,85,0.35)";

/// Plotly layout for the stacked sector chart. Static; only the series vary per request.
pub fn stacked_layout() -> Value {
    json!({
        "barmode": "stack",
        "title": {
            "text": CHART_TITLE,
            "font": {"size": 20, "color": "#e2e8f0"},
            "x": 0.5,
            "y": 0.98,
        },
        "paper_bgcolor": "#0a0f17",
        "plot_bgcolor": "#111827",
        "font": {"color": "#cbd5e1"},
        "height": 740,
        "margin": {"t": 100, "b": 120, "l": 60, "r": 40},
        "xaxis": {
            "title": "Date",
            "tickangle": -45,
            "tickfont": {"size": 13},
            "gridcolor": GRID_COLOR,
            "zeroline": false,
            "showline": true,
            "linecolor": "rgba(59,68,85,0.6)",
            "linewidth": 1.5,
            "type": "category",
        },
        "yaxis": {
            "title": "",
            "showticklabels": false,
            "gridcolor": GRID_COLOR,
            "zeroline": false,
        },
        "legend": {
            "bgcolor": "rgba(30,41,59,0.6)",
            "bordercolor": "rgba(59,68,85,0.4)",
            "font": {"size": 12},
            "orientation": "h",
            "y": 1.12,
        },
        "bargap": 0.08,
        "bargroupgap": 0.05,
        "uniformtext": {"minsize": 9, "mode": "hide"},
    })
}
