use crate::catalog::{StateCatalog, StateDetail};
use crate::format::format_elapsed;
use crate::pie::{ArcSpec, LegendEntry, render_svg};
use crate::table::RenderedRow;
use std::fmt::Write;

pub struct PageContext<'a> {
    pub key: &'a str,
    pub catalog: &'a StateCatalog,
    pub is_emergency: bool,
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn render_index(
    ctx: &PageContext<'_>,
    current: Option<(&StateDetail, i64)>,
    elapsed_ms: i64,
) -> String {
    let (emoji, name, start_ms) = match current {
        Some((state, start_ms)) => (state.emoji.as_str(), state.name.as_str(), start_ms),
        None => ("⏱️", "IDLE: not recorded", 0),
    };

    let mut buttons = String::new();
    for (index, state) in ctx.catalog.states.iter().enumerate() {
        let _ = write!(
            buttons,
            r#"<button class="change-state-btn" type="button" value="{index}" style="border-color: {color}">{emoji} {name}</button>"#,
            color = escape_html(&state.color),
            emoji = escape_html(&state.emoji),
            name = escape_html(&state.name),
        );
    }

    let names = ctx
        .catalog
        .states
        .iter()
        .map(|state| state.name.as_str())
        .collect::<Vec<_>>();

    let body = INDEX_BODY
        .replace("{{EMOJI}}", &escape_html(emoji))
        .replace("{{NAME}}", &escape_html(name))
        .replace("{{ELAPSED}}", &format_elapsed(elapsed_ms))
        .replace("{{START}}", &start_ms.to_string())
        .replace("{{RUNNING}}", if current.is_some() { "true" } else { "false" })
        .replace("{{BUTTONS}}", &buttons)
        .replace("{{NAMES}}", &script_json(&names));
    layout(ctx, "index", "State Timer", &body)
}

pub fn render_recents(
    ctx: &PageContext<'_>,
    rows: &[RenderedRow],
    count: usize,
    days: u32,
) -> String {
    let mut tbody = String::new();
    for row in rows {
        let _ = write!(
            tbody,
            r#"<tr><td><span class="dot" style="background: {color}"></span> {name}</td><td>{start}</td><td>{end}</td><td>{duration}</td></tr>"#,
            color = escape_html(&row.state_color),
            name = escape_html(&row.state_name),
            start = escape_html(&row.start_label),
            end = escape_html(&row.end_label),
            duration = escape_html(&row.duration_label),
        );
    }
    if rows.is_empty() {
        tbody.push_str(r#"<tr><td colspan="4">No events in this window.</td></tr>"#);
    }

    let body = RECENTS_BODY
        .replace("{{KEY}}", &escape_html(ctx.key))
        .replace("{{COUNT}}", &count.to_string())
        .replace("{{DAYS}}", &days.to_string())
        .replace("{{ROWS}}", &tbody);
    layout(ctx, "recents", "Recent events", &body)
}

pub fn render_summary(
    ctx: &PageContext<'_>,
    arcs: &[ArcSpec],
    legend: &[LegendEntry],
    label: &str,
) -> String {
    let mut items = String::new();
    for entry in legend {
        let _ = write!(
            items,
            r#"<li><span class="dot" style="background: {color}"></span> {name}<span class="value">{duration}</span></li>"#,
            color = escape_html(&entry.color),
            name = escape_html(&entry.name),
            duration = escape_html(&entry.duration_label),
        );
    }

    let mut ranges = String::new();
    for days in [1, 7, 30, 365] {
        let _ = write!(
            ranges,
            r#"<a class="range-btn" href="/summary?key={key}&amp;range={days}">{days}d</a>"#,
            key = escape_html(ctx.key),
        );
    }

    let body = SUMMARY_BODY
        .replace("{{RANGES}}", &ranges)
        .replace("{{LABEL}}", &escape_html(label))
        .replace("{{PIE}}", &render_svg(arcs, ctx.catalog))
        .replace("{{LEGEND}}", &items);
    layout(ctx, "summary", "Summary", &body)
}

pub fn render_explanations(ctx: &PageContext<'_>) -> String {
    let mut items = String::new();
    for state in &ctx.catalog.states {
        let _ = write!(
            items,
            r#"<li><span class="dot" style="background: {color}"></span> <strong>{emoji} {name}</strong><p>{description}</p></li>"#,
            color = escape_html(&state.color),
            emoji = escape_html(&state.emoji),
            name = escape_html(&state.name),
            description = escape_html(&state.description),
        );
    }
    let body = format!(r#"<h1>States</h1><ul class="explanations">{items}</ul>"#);
    layout(ctx, "explanations", "Explanations", &body)
}

fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

fn layout(ctx: &PageContext<'_>, current_page: &str, title: &str, body: &str) -> String {
    let mut nav = String::new();
    for (page, path, label) in [
        ("index", "/", "Now"),
        ("recents", "/recents", "Recents"),
        ("summary", "/summary", "Summary"),
        ("explanations", "/explanations", "Explanations"),
    ] {
        let class = if page == current_page { "active" } else { "" };
        let _ = write!(
            nav,
            r#"<a class="{class}" href="{path}?key={key}">{label}</a>"#,
            key = escape_html(ctx.key),
        );
    }

    let banner = if ctx.is_emergency {
        r#"<div class="emergency">Emergency in progress</div>"#
    } else {
        ""
    };

    LAYOUT_HTML
        .replace("{{TITLE}}", title)
        .replace("{{NAV}}", &nav)
        .replace("{{BANNER}}", banner)
        .replace("{{KEY_JSON}}", &script_json(ctx.key))
        .replace("{{BODY}}", body)
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    body {
      margin: 0;
      font-family: "Trebuchet MS", sans-serif;
      color: #2b2a28;
      background: #f8f3e6;
    }
    nav { display: flex; gap: 12px; padding: 16px 24px; background: white; }
    nav a.active { font-weight: 600; }
    main { padding: 24px; display: grid; gap: 20px; }
    .emergency { background: #c63b2b; color: white; padding: 12px 24px; font-weight: 600; }
    .dot { display: inline-block; width: 12px; height: 12px; border-radius: 50%; }
    .value { float: right; color: #6b645d; }
    #pie { width: 240px; height: 240px; transform: rotate(0deg); border-radius: 50%; }
    table { border-collapse: collapse; width: 100%; background: white; }
    td, th { padding: 10px 14px; text-align: left; }
  </style>
</head>
<body>
  <nav>{{NAV}}</nav>
  {{BANNER}}
  <main>{{BODY}}</main>
  <script>window.ENTRY_KEY = {{KEY_JSON}};</script>
</body>
</html>
"#;

const INDEX_BODY: &str = r#"<section class="current">
  <h1>{{EMOJI}} {{NAME}}</h1>
  <p>Elapsed <span id="elapsed">{{ELAPSED}}</span></p>
</section>
<section class="actions">{{BUTTONS}}</section>
<div id="status"></div>
<script>
  const STATES_NAMES = {{NAMES}};
  const start = {{START}};
  const pad = (n) => n.toString().padStart(2, '0');
  const statusEl = document.getElementById('status');

  if ({{RUNNING}}) {
    setInterval(() => {
      const d = Math.max(0, Date.now() - start);
      const h = Math.floor(d / 3600000);
      const m = Math.floor((d % 3600000) / 60000);
      const s = Math.floor((d % 60000) / 1000);
      document.getElementById('elapsed').textContent = `${pad(h)}:${pad(m)}:${pad(s)}`;
    }, 1000);
  }

  const buttons = Array.from(document.querySelectorAll('.change-state-btn'));
  buttons.forEach((btn) => {
    btn.addEventListener('click', async (ev) => {
      const newState = parseInt(ev.currentTarget.value, 10);
      if (!window.confirm(`Change state to ${STATES_NAMES[newState]}?`)) return;
      buttons.forEach((b) => (b.disabled = true));
      try {
        const res = await fetch(`/api/entry?key=${encodeURIComponent(window.ENTRY_KEY)}`, {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ new_state: newState, start_timestamp: Date.now() })
        });
        if (!res.ok) {
          throw new Error((await res.text()) || 'Request failed');
        }
        location.reload();
      } catch (err) {
        buttons.forEach((b) => (b.disabled = false));
        statusEl.textContent = err.message;
      }
    });
  });
</script>"#;

const RECENTS_BODY: &str = r#"<h1>Recent events</h1>
<form method="get" action="/recents">
  <input type="hidden" name="key" value="{{KEY}}" />
  <label>Items <input type="number" name="count" min="0" value="{{COUNT}}" /></label>
  <label>Days <input type="number" name="days" min="0" value="{{DAYS}}" /></label>
  <button id="apply-filters" type="submit">Apply</button>
</form>
<table>
  <thead><tr><th>State</th><th>Start</th><th>End</th><th>Duration</th></tr></thead>
  <tbody id="events-tbody">{{ROWS}}</tbody>
</table>"#;

const SUMMARY_BODY: &str = r#"<h1>Summary</h1>
<div class="ranges">{{RANGES}}</div>
<h2 id="range-label">{{LABEL}}</h2>
{{PIE}}
<ul id="legend">{{LEGEND}}</ul>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pie::{compute_arcs, legend};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn idle_index_shows_placeholder() {
        let catalog = StateCatalog::default();
        let ctx = PageContext { key: "k", catalog: &catalog, is_emergency: false };
        let html = render_index(&ctx, None, 0);
        assert!(html.contains("IDLE: not recorded"));
        assert!(html.contains("00:00:00"));
        assert_eq!(html.matches("change-state-btn\"").count(), catalog.len());
        assert!(!html.contains("Emergency in progress"));
    }

    #[test]
    fn summary_page_lists_every_state() {
        let catalog = StateCatalog::default();
        let ctx = PageContext { key: "k", catalog: &catalog, is_emergency: true };
        let durations = vec![0; catalog.len()];
        let arcs = compute_arcs(&durations);
        let entries = legend(&durations, &catalog);
        let html = render_summary(&ctx, &arcs, &entries, "Last 7 days");
        assert_eq!(html.matches("<li>").count(), catalog.len());
        assert!(html.contains("Last 7 days"));
        assert!(html.contains("Emergency in progress"));
    }
}
