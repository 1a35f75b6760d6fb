//! Server-rendered HTML view of a [`DashboardSnapshot`].
//!
//! Plain tables; the browser reloads the page every refresh interval.

use core::fmt::Write as _;

use crate::snapshot::{AlertLevel, DashboardSnapshot};

pub fn render(snapshot: &DashboardSnapshot, refresh_secs: u64, forecast_days: u32) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta http-equiv=\"refresh\" content=\"{refresh_secs}\">\n\
         <title>SmartStock IoT - Dashboard</title>\n</head>\n<body>\n\
         <h1>SmartStock IoT</h1>\n<p>Updated {}</p>\n",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let c = &snapshot.counts;
    section(&mut html, "Overview");
    table(
        &mut html,
        &["Total", "Critical", "In use", "In storage"],
        [vec![
            c.total.to_string(),
            c.critical.to_string(),
            c.in_use.to_string(),
            c.in_storage.to_string(),
        ]],
    );

    section(&mut html, "Equipment state");
    table(
        &mut html,
        &["State", "Equipment"],
        snapshot
            .state_distribution
            .iter()
            .map(|s| vec![s.state.to_string(), s.count.to_string()]),
    );

    section(&mut html, "Stock by category");
    table(
        &mut html,
        &["Category", "Units in storage"],
        snapshot
            .stock_by_category
            .iter()
            .map(|s| vec![s.category.to_string(), s.units.to_string()]),
    );

    section(&mut html, "Predictive maintenance: equipment at risk");
    if snapshot.at_risk.is_empty() {
        html.push_str("<p>No equipment at critical risk right now.</p>\n");
    } else {
        table(
            &mut html,
            &["ID", "Category", "State", "Age (months)", "Failure prob.", "Risk", "Action"],
            snapshot.at_risk.iter().map(|r| {
                vec![
                    r.id.to_string(),
                    r.category.to_string(),
                    r.state.to_string(),
                    r.age_months.to_string(),
                    format!("{:.1}%", r.failure_probability * 100.0),
                    r.risk.to_string(),
                    r.action.clone(),
                ]
            }),
        );
    }

    section(&mut html, &format!("Demand forecast (next {forecast_days} days)"));
    table(
        &mut html,
        &["Category", "Forecast", "Min", "Max"],
        snapshot.forecasts.iter().map(|f| {
            vec![
                f.category.to_string(),
                f.predicted_demand.to_string(),
                f.confidence_interval.0.to_string(),
                f.confidence_interval.1.to_string(),
            ]
        }),
    );

    section(&mut html, "Stock recommendations");
    table(
        &mut html,
        &["Category", "Units", "Reorder point", "EOQ", "Status", "Action"],
        snapshot.recommendations.iter().map(|r| {
            vec![
                r.category.to_string(),
                r.stock_level.to_string(),
                r.reorder_point.to_string(),
                r.economic_order_quantity.to_string(),
                r.analysis.status.to_string(),
                r.analysis.recommended_action.clone(),
            ]
        }),
    );

    section(&mut html, "Alerts");
    for alert in &snapshot.alerts {
        let class = match alert.level {
            AlertLevel::Critical => "alert critical",
            AlertLevel::Info => "alert info",
        };
        let _ = writeln!(
            html,
            "<div class=\"{class}\"><h4>{}</h4><p>{}</p></div>",
            escape(&alert.title),
            escape(&alert.message)
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn section(html: &mut String, title: &str) {
    let _ = writeln!(html, "<h2>{}</h2>", escape(title));
}

fn table<I>(html: &mut String, headers: &[&str], rows: I)
where
    I: IntoIterator<Item = Vec<String>>,
{
    html.push_str("<table>\n<tr>");
    for h in headers {
        let _ = write!(html, "<th>{}</th>", escape(h));
    }
    html.push_str("</tr>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape(&cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
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
