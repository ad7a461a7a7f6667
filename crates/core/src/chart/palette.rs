pub const DEFAULT_SECTOR_COLOR: &str = "#6b7280";

const BLACK: &str = "#000000";
const WHITE: &str = "#ffffff";

// Above this luminance the bar is light enough for black text.
const LUMINANCE_THRESHOLD: f64 = 0.58;

// Keyed by lower-cased sector name.
const SECTOR_COLORS: &[(&str, &str)] = &[
    ("fmcg", "#60c5f1"),
    ("industrials", "#ff7aa2"),
    ("services", "#7ce38b"),
    ("auto", "#f5b74a"),
    ("realty", "#8a8df0"),
    ("textiles", "#ff6f91"),
    ("chemicals", "#f2df4a"),
    ("consumer discretionary", "#3db7a9"),
    ("financials", "#ff5c5c"),
    ("aerospace & defence", "#9ff1e5"),
    ("energy", "#e6007a"),
    ("miscellaneous", "#4aa3f0"),
    ("metals & mining", "#f3a6c8"),
    ("power & utilities", "#d4f26a"),
    ("healthcare", "#2dd4bf"),
    ("telecom", "#ff8c1a"),
    ("bank", "#ccff00"),
    ("building materials", "#00ff66"),
    ("it", "#7dd3fc"),
    ("plastic products", "#ff85b3"),
    ("transportation", "#98e690"),
    ("telecom-service", "#f6c177"),
    ("media", "#a5b4fc"),
    ("indices", "#ff6b81"),
    ("n/a", "#f5e663"),
    ("tech", "#6b7280"),
    ("e-commerce", "#94a3b8"),
];

pub fn sector_color(sector: &str) -> &'static str {
    let key = sector.trim().to_lowercase();
    SECTOR_COLORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_SECTOR_COLOR)
}

/// Readable text color for a `#rrggbb` background. Anything unparseable gets white.
pub fn text_color(background: &str) -> &'static str {
    match luminance(background) {
        Some(lum) if lum > LUMINANCE_THRESHOLD => BLACK,
        _ => WHITE,
    }
}

fn luminance(hex: &str) -> Option<f64> {
    let hex = hex.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| -> Option<f64> {
        let part = hex.get(range)?;
        u8::from_str_radix(part, 16).ok().map(f64::from)
    };
    let (r, g, b) = (channel(0..2)?, channel(2..4)?, channel(4..6)?);
    Some((0.299 * r + 0.587 * g + 0.114 * b) / 255.0)
}
