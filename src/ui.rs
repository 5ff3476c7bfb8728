use crate::models::{ApplicationState, DashboardView, INDUSTRIES, SALARY_RANGES};
use std::fmt::Write;

pub fn render_form(state: &ApplicationState, notice: Option<&str>) -> String {
    let draft = &state.draft;
    let body = FORM_HTML
        .replace("{{NOTICE}}", &render_notice(notice))
        .replace("{{OFFER_COUNT}}", &draft.offer_count.to_string())
        .replace("{{SALARY_OPTIONS}}", &render_options(&SALARY_RANGES, &draft.salary_range))
        .replace("{{INDUSTRY_OPTIONS}}", &render_options(&INDUSTRIES, &draft.industry))
        .replace("{{DISABLED}}", if state.is_submitting { "disabled" } else { "" });
    render_page("Share your offers", &body)
}

pub fn render_empty_dashboard() -> String {
    render_page("Dashboard", EMPTY_DASHBOARD_HTML)
}

pub fn render_dashboard(view: &DashboardView, notice: Option<&str>) -> String {
    let (offer_count, salary_range, industry) = match &view.submission {
        Some(s) => (
            s.offer_count.to_string(),
            escape_html(&s.salary_range),
            escape_html(&s.industry),
        ),
        None => ("-".to_string(), "-".to_string(), "-".to_string()),
    };

    let max_count = view
        .salary_buckets
        .iter()
        .map(|bucket| bucket.count)
        .max()
        .unwrap_or(0);
    let mut bars = String::new();
    for bucket in &view.salary_buckets {
        let width = if max_count == 0 {
            0
        } else {
            (u128::from(bucket.count) * 100 / u128::from(max_count)) as u64
        };
        let _ = write!(
            bars,
            r#"<div class="bar-row"><span class="bar-label">{}</span><span class="bar"><span style="width:{}%"></span></span><span class="bar-value">{} ({}%)</span></div>"#,
            escape_html(bucket.label),
            width,
            bucket.count,
            bucket.percent
        );
    }

    let body = DASHBOARD_HTML
        .replace("{{NOTICE}}", &render_notice(notice))
        .replace("{{MY_OFFERS}}", &offer_count)
        .replace("{{MY_SALARY}}", &salary_range)
        .replace("{{MY_INDUSTRY}}", &industry)
        .replace("{{TOTAL}}", &view.total_submissions.to_string())
        .replace("{{OFFER_RATE}}", &view.offer_rate.to_string())
        .replace("{{AVG_OFFERS}}", &format!("{:.1}", view.avg_offers))
        .replace("{{TODAY_NEW}}", &view.today_new.to_string())
        .replace("{{ABOVE_AVERAGE}}", &view.personal.above_average_percent.to_string())
        .replace("{{INDUSTRY_PERCENTILE}}", &view.personal.industry_percentile.to_string())
        .replace("{{BARS}}", &bars)
        .replace("{{FETCHED_AT}}", &escape_html(&view.fetched_at));
    render_page("Dashboard", &body)
}

fn render_page(title: &str, body: &str) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{BODY}}", body)
}

fn render_notice(notice: Option<&str>) -> String {
    match notice {
        Some(text) => format!(r#"<p class="notice" role="alert">{}</p>"#, escape_html(text)),
        None => String::new(),
    }
}

fn render_options(options: &[&str], selected: &str) -> String {
    let mut html = String::from(r#"<option value="">Select...</option>"#);
    for option in options {
        let marker = if *option == selected { " selected" } else { "" };
        let escaped = escape_html(option);
        let _ = write!(html, r#"<option value="{escaped}"{marker}>{escaped}</option>"#);
    }
    html
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · Offer Board</title>
  <style>
    :root {
      --bg: #f4f5fb;
      --ink: #23263b;
      --accent: #667eea;
      --accent-2: #764ba2;
      --card: #ffffff;
      --shadow: 0 8px 32px rgba(35, 38, 59, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      color: var(--accent);
    }

    form.offer {
      display: grid;
      gap: 16px;
    }

    label {
      display: grid;
      gap: 6px;
      font-weight: 600;
    }

    input, select {
      font: inherit;
      padding: 10px 12px;
      border-radius: 8px;
      border: 1px solid #cfd3e6;
    }

    button {
      font: inherit;
      font-weight: 600;
      border: none;
      border-radius: 8px;
      padding: 12px 24px;
      color: white;
      background: linear-gradient(135deg, var(--accent), var(--accent-2));
      cursor: pointer;
    }

    button:disabled {
      opacity: 0.6;
      cursor: wait;
    }

    .notice {
      margin: 0;
      padding: 12px 16px;
      border-radius: 8px;
      background: #fdecee;
      color: #a4262c;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .card {
      border-radius: 12px;
      padding: 16px;
      background: #f7f8fd;
      text-align: center;
    }

    .card .value {
      font-size: 1.8rem;
      font-weight: 700;
    }

    .bar-row {
      display: grid;
      grid-template-columns: 80px 1fr 90px;
      gap: 12px;
      align-items: center;
      margin-bottom: 8px;
    }

    .bar {
      background: #eceefa;
      border-radius: 6px;
      height: 14px;
      overflow: hidden;
    }

    .bar span {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .actions {
      display: flex;
      gap: 12px;
      flex-wrap: wrap;
    }

    .muted {
      color: #6b6f86;
      font-size: 0.85rem;
    }
  </style>
</head>
<body>
  <main class="app">
{{BODY}}
  </main>
</body>
</html>
"#;

const FORM_HTML: &str = r#"    <h1>Share your offers</h1>
    {{NOTICE}}
    <form class="offer" method="post" action="/form">
      <label>Offer count
        <input type="number" name="offerCount" min="0" step="1" value="{{OFFER_COUNT}}" required />
      </label>
      <label>Salary range
        <select name="salaryRange" required>{{SALARY_OPTIONS}}</select>
      </label>
      <label>Industry
        <select name="industry" required>{{INDUSTRY_OPTIONS}}</select>
      </label>
      <button type="submit" {{DISABLED}}>Submit</button>
    </form>
"#;

const EMPTY_DASHBOARD_HTML: &str = r#"    <h1>Dashboard</h1>
    <p>No data yet.</p>
    <form method="post" action="/view/form">
      <button type="submit">Back to the form</button>
    </form>
"#;

const DASHBOARD_HTML: &str = r#"    <h1>Dashboard</h1>
    {{NOTICE}}
    <section class="cards">
      <div class="card"><div>My offers</div><div class="value">{{MY_OFFERS}}</div></div>
      <div class="card"><div>Salary range</div><div class="value">{{MY_SALARY}}</div></div>
      <div class="card"><div>Industry</div><div class="value">{{MY_INDUSTRY}}</div></div>
    </section>
    <section class="cards">
      <div class="card"><div>Submissions</div><div class="value">{{TOTAL}}</div></div>
      <div class="card"><div>Offer rate</div><div class="value">{{OFFER_RATE}}%</div></div>
      <div class="card"><div>Avg offers</div><div class="value">{{AVG_OFFERS}}</div></div>
      <div class="card"><div>New today</div><div class="value">{{TODAY_NEW}}</div></div>
    </section>
    <section class="cards">
      <div class="card"><div>Ahead of peers</div><div class="value">{{ABOVE_AVERAGE}}%</div></div>
      <div class="card"><div>Industry top</div><div class="value">{{INDUSTRY_PERCENTILE}}%</div></div>
    </section>
    <section>
      <h2>Salary distribution</h2>
      {{BARS}}
    </section>
    <p class="muted">Updated {{FETCHED_AT}}</p>
    <div class="actions">
      <form method="post" action="/view/form">
        <button type="submit">Back</button>
      </form>
      <form method="post" action="/reset">
        <button type="submit">Fill in again</button>
      </form>
    </div>
"#;
