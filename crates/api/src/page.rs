use sectorboard_core::chart::layout::CHART_TITLE;
use sectorboard_core::domain::observation::{Rating, RatingSection};
use sectorboard_core::editor::StockView;

const BASE_STYLE: &str = r#"
    body { background: #0a0f17; color: #e2e8f0; font-family: 'Inter', sans-serif; padding: 40px 20px; max-width: 1100px; margin: auto; font-size: 1.05rem; }
    h1 { color: #60a5fa; margin-bottom: 0.4em; }
    h2 { color: #cbd5e1; margin: 2.5rem 0 1rem; border-bottom: 1px solid #334155; padding-bottom: 0.5rem; }
    h3 { color: #94a3b8; margin: 2rem 0 1rem; font-size: 1.35rem; }
    a { color: #60a5fa; text-decoration: none; }
    a:hover { text-decoration: underline; }
    .meta { color: #94a3b8; margin-bottom: 2rem; font-size: 1.1rem; }
    .error { color: #f87171; }
    .back-link { display: inline-block; margin-top: 3rem; font-size: 1.1rem; }
    table { width: 100%; border-collapse: collapse; margin-top: 1.2rem; font-size: 0.98rem; }
    th, td { padding: 12px 14px; border: 1px solid #334155; text-align: left; }
    th { background: #1e293b; color: #cbd5e1; }
"#;

const STOCK_STYLE: &str = r#"
    .analysis-box { background: #1e293b; padding: 1.6rem; border-radius: 10px; border: 1px solid #334155; white-space: pre-wrap; line-height: 1.6; margin-bottom: 2.5rem; }
    .rating-section { margin-bottom: 3.5rem; }
    .rating-buttons { display: flex; gap: 1.5rem; margin-top: 1.2rem; flex-wrap: wrap; }
    .rating-btn { padding: 0.9rem 2.2rem; border-radius: 12px; border: 2px solid transparent; color: white; cursor: pointer; font-weight: 600; transition: all 0.22s; min-width: 130px; font-size: 1.1rem; }
    .rating-btn.buy { background: #16a34a; }
    .rating-btn.sell { background: #dc2626; }
    .rating-btn.not { background: #6b7280; }
    .rating-btn.selected { border: 5px solid #eab308; box-shadow: 0 0 20px #eab308a0; transform: scale(1.1); }
    .note-area { margin: 2.5rem 0 3.5rem; }
    textarea { width: 100%; min-height: 160px; background: #1e293b; color: #e2e8f0; border: 1px solid #334155; border-radius: 10px; padding: 1.2rem; font-family: inherit; font-size: 1rem; resize: vertical; }
    .save-msg { color: #6ee7b7; font-weight: 600; margin: 1rem 0; text-align: center; display: none; }
    .history td.analysis { white-space: pre-wrap; }
"#;

const STOCK_SCRIPT: &str = r#"
    const msg = document.getElementById('save-msg');
    function flash(text) {
        msg.innerText = text;
        msg.style.display = 'block';
        setTimeout(() => msg.style.display = 'none', 3000);
    }
    function post(body) {
        return fetch(window.location.href, {
            method: 'POST',
            headers: {'Content-Type': 'application/x-www-form-urlencoded'},
            body: new URLSearchParams(body).toString()
        }).then(r => r.json());
    }
    document.querySelectorAll('.rating-buttons').forEach(group => {
        const buttons = group.querySelectorAll('.rating-btn');
        buttons.forEach(btn => {
            if (btn.dataset.value === group.dataset.saved) btn.classList.add('selected');
            btn.addEventListener('click', () => {
                buttons.forEach(b => b.classList.remove('selected'));
                btn.classList.add('selected');
                post({action: 'save_rating', section: btn.dataset.section, rating: btn.dataset.value})
                    .then(d => d.success ? flash('Rating updated ✓') : alert(d.message || 'Failed to save'));
            });
        });
    });
    const note = document.getElementById('note');
    let savedNote = note.value.trim();
    note.addEventListener('blur', () => {
        const text = note.value.trim();
        if (text === savedNote) return;
        savedNote = text;
        post({action: 'save_note', note: text})
            .then(d => d.success ? flash('Note saved ✓') : alert(d.message || 'Failed to save note'));
    });
"#;

const INDEX_SCRIPT: &str = r#"
    fetch('/data').then(r => r.json()).then(doc => {
        if (doc.error) {
            document.getElementById('chart').innerHTML = '<p class="error"></p>';
            document.querySelector('#chart .error').innerText = doc.error;
            return;
        }
        doc.layout.showlegend = false;
        Plotly.newPlot('chart', doc.data, doc.layout, {responsive: true});
        document.getElementById('chart').on('plotly_click', ev => {
            const stock = ev.points[0] && ev.points[0].customdata;
            if (stock) window.location.href = '/stock/' + encodeURIComponent(stock);
        });
        const legend = document.getElementById('legend');
        doc.legend.forEach(entry => {
            const chip = document.createElement('span');
            chip.className = 'chip';
            chip.style.background = entry.color;
            chip.innerText = entry.name;
            legend.appendChild(chip);
        });
    });
    fetch('/strike-summary').then(r => r.json()).then(s => {
        const box = document.getElementById('summary');
        if (s.error) { box.innerText = s.error; return; }
        if (!s.has_data) { box.innerText = s.message; return; }
        const head = document.createElement('p');
        head.className = 'meta';
        head.innerText = `Overall: ${s.overall.pct}% (${s.overall.correct}/${s.overall.total})`;
        box.appendChild(head);
        const table = document.createElement('table');
        table.innerHTML = '<thead><tr><th>Stock</th><th>Rated</th><th>Correct</th><th>%</th></tr></thead>';
        const body = document.createElement('tbody');
        s.stocks.forEach(row => {
            const tr = document.createElement('tr');
            [row.Stock, row.rated, row.correct, row.pct].forEach(v => {
                const td = document.createElement('td');
                td.innerText = v;
                tr.appendChild(td);
            });
            body.appendChild(tr);
        });
        table.appendChild(body);
        box.appendChild(table);
    });
"#;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn document(title: &str, style: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{BASE_STYLE}{style}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape(title)
    )
}

pub fn index() -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<div id="legend" class="legend"></div>
<div id="chart"></div>
<h2>Strike Rate</h2>
<div id="summary"></div>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
<script>{INDEX_SCRIPT}</script>"#,
        title = escape(CHART_TITLE),
    );
    let style = ".legend { display: flex; flex-wrap: wrap; gap: 0.5rem; margin-bottom: 1rem; }\n    .chip { padding: 0.3rem 0.8rem; border-radius: 999px; color: #0a0f17; font-weight: 600; font-size: 0.9rem; }";
    document(CHART_TITLE, style, &body)
}

fn rating_buttons(section: RatingSection, saved: Option<Rating>) -> String {
    let name = match section {
        RatingSection::Before => "before",
        RatingSection::After => "after",
    };
    let buttons: String = Rating::ALL
        .iter()
        .map(|r| {
            format!(
                r#"<button class="rating-btn {class}" data-value="{value}" data-section="{name}">{value}</button>"#,
                class = r.as_str().to_lowercase(),
                value = r.as_str(),
            )
        })
        .collect();
    format!(
        r#"<div class="rating-buttons {name}" data-saved="{saved}">{buttons}</div>"#,
        saved = saved.map(Rating::as_str).unwrap_or_default(),
    )
}

pub fn stock(view: &StockView) -> String {
    let history: String = view
        .history
        .iter()
        .map(|h| {
            format!(
                "<tr><td>{}</td><td>{}</td><td class=\"analysis\">{}</td></tr>\n",
                escape(&h.date),
                escape(&h.sector),
                escape(&h.analysis)
            )
        })
        .collect();

    let body = format!(
        r#"<h1>{stock}</h1>
<div class="meta">Sector: {sector} • Latest: {latest}</div>
<div class="save-msg" id="save-msg"></div>

<div class="rating-section">
<h3>Before Entry Result</h3>
{before}
</div>

<div class="rating-section">
<h3>After Entry Result</h3>
{after}
</div>

<div class="note-area">
<h2>Personal Note</h2>
<textarea id="note">{note}</textarea>
</div>

<h2>Latest Analysis</h2>
<div class="analysis-box">{analysis}</div>

<h2>History</h2>
<table class="history">
<thead><tr><th>Date</th><th>Sector</th><th>Analysis</th></tr></thead>
<tbody>
{history}</tbody>
</table>

<a href="/" class="back-link">← Back to chart</a>
<script>{STOCK_SCRIPT}</script>"#,
        stock = escape(&view.stock),
        sector = escape(&view.sector),
        latest = escape(&view.latest_date),
        before = rating_buttons(RatingSection::Before, view.rating_before),
        after = rating_buttons(RatingSection::After, view.rating_after),
        note = escape(&view.note),
        analysis = escape(&view.analysis),
    );
    document(&view.stock, STOCK_STYLE, &body)
}

pub fn stock_missing(stock: &str) -> String {
    message(
        &format!("No data for {}", stock.trim()),
        "This stock does not appear in the data file.",
    )
}

pub fn message(title: &str, detail: &str) -> String {
    let body = format!(
        "<h1 class=\"error\">{}</h1>\n<p>{}</p>\n<a href=\"/\" class=\"back-link\">← Back to chart</a>",
        escape(title),
        escape(detail)
    );
    document(title, "", &body)
}
