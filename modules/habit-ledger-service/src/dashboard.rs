//! Dashboard HTML page handler.
//!
//! Serves a self-contained HTML page with inline CSS showing service
//! status and the recent completion trend for the configured owner.

use crate::routes::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use std::sync::Arc;

pub async fn dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let trend = state.ledger.trends(&state.auth.username).unwrap_or_default();
    let total = state.ledger.record_count().unwrap_or(0);
    let uptime = state.start_time.elapsed().as_secs();

    let mut trend_rows = String::new();
    for point in &trend {
        trend_rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            point.date, point.count
        ));
    }
    if trend_rows.is_empty() {
        trend_rows = "<tr><td colspan=\"2\">No completions recorded.</td></tr>".to_string();
    }

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Habit Ledger</title>
<style>
  body {{ font-family: -apple-system, sans-serif; background: #0f1115; color: #d7dae0; margin: 2rem; }}
  h1 {{ font-size: 1.4rem; }}
  .stats {{ display: flex; gap: 1.5rem; margin: 1rem 0; }}
  .stat {{ background: #1a1d24; border-radius: 8px; padding: 0.8rem 1.2rem; }}
  .stat .val {{ display: block; font-size: 1.3rem; font-weight: 600; }}
  .stat .lbl {{ font-size: 0.75rem; color: #8b919c; text-transform: uppercase; }}
  table {{ border-collapse: collapse; min-width: 320px; }}
  th, td {{ text-align: left; padding: 0.4rem 0.9rem; border-bottom: 1px solid #2a2e38; }}
  th {{ color: #8b919c; font-size: 0.8rem; text-transform: uppercase; }}
</style>
</head>
<body>
<h1>Habit Ledger Service</h1>
<div class="stats">
  <div class="stat"><span class="val">{total}</span><span class="lbl">Records</span></div>
  <div class="stat"><span class="val">{uptime}s</span><span class="lbl">Uptime</span></div>
</div>
<h2>Recent completions</h2>
<table>
<tr><th>Date</th><th>Completed</th></tr>
{trend_rows}
</table>
</body>
</html>"#
    );

    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html)
}
