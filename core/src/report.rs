//! Alert report rendering: console text and HTML email body.

use crate::change_evaluator::AlertDecision;

/// `$1,234,567.89` — dollar sign, thousands separators, 2 dp.
pub fn format_money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// `+12.3%` / `-4.0%`.
pub fn format_signed_pct(pct: f64) -> String {
    format!("{pct:+.1}%")
}

pub struct AlertReport<'a> {
    decision: &'a AlertDecision,
    narrative: &'a str,
    company_name: &'a str,
}

impl<'a> AlertReport<'a> {
    pub fn new(decision: &'a AlertDecision, narrative: &'a str, company_name: &'a str) -> Self {
        Self {
            decision,
            narrative,
            company_name,
        }
    }

    pub fn subject(&self) -> String {
        format!("Insurance Revenue Alert - {}", self.decision.today)
    }

    pub fn console(&self) -> String {
        let d = self.decision;
        let mut out = String::new();
        out.push_str(&format!("\nREVENUE ALERT - {}\n", d.today));
        out.push_str(&"=".repeat(50));
        out.push('\n');
        for reason in &d.reasons {
            out.push_str(&format!("• {reason}\n"));
        }
        out.push_str("\nToday's Performance:\n");
        out.push_str(&format!(
            "Premium Revenue: {} ({})\n",
            format_money(d.premium_today.total),
            format_signed_pct(d.premium_change_pct)
        ));
        out.push_str(&format!(
            "Commission Paid: {} ({})\n",
            format_money(d.commission_today.total),
            format_signed_pct(d.commission_change_pct)
        ));
        out.push_str(&format!("\nYesterday Comparison ({}):\n", d.yesterday));
        out.push_str(&format!("Premium Revenue: {}\n", format_money(d.premium_yesterday.total)));
        out.push_str(&format!("Commission Paid: {}\n", format_money(d.commission_yesterday.total)));
        out.push_str("\nAI Insights:\n");
        out.push_str(if self.narrative.is_empty() { "N/A" } else { self.narrative });
        out.push('\n');
        out
    }

    pub fn html(&self) -> String {
        let d = self.decision;
        let reasons: String = d
            .reasons
            .iter()
            .map(|r| format!("<li>{}</li>", escape_html(r)))
            .collect();
        format!(
            "<html>\n<body>\n\
             <h2>Revenue Alert - {today}</h2>\n\
             <h3>Alert Reasons:</h3>\n<ul>\n{reasons}\n</ul>\n\
             <h3>Today's Performance:</h3>\n\
             <table border=\"1\" style=\"border-collapse: collapse;\">\n\
             <tr><th>Metric</th><th>Today</th><th>Yesterday</th><th>Change</th></tr>\n\
             {premium_row}\n{commission_row}\n\
             </table>\n\
             <h3>AI Insights:</h3>\n<p><em>{narrative}</em></p>\n\
             <hr>\n<small>Automated alert from {company} Revenue Monitoring System</small>\n\
             </body>\n</html>\n",
            today = d.today,
            reasons = reasons,
            premium_row = metric_row(
                "Premium Revenue",
                d.premium_today.total,
                d.premium_yesterday.total,
                d.premium_change_pct
            ),
            commission_row = metric_row(
                "Commission Paid",
                d.commission_today.total,
                d.commission_yesterday.total,
                d.commission_change_pct
            ),
            narrative = escape_html(self.narrative),
            company = escape_html(self.company_name),
        )
    }
}

fn metric_row(label: &str, today: f64, yesterday: f64, pct: f64) -> String {
    let colour = if pct > 0.0 { "green" } else { "red" };
    format!(
        "<tr><td>{label}</td><td>{}</td><td>{}</td><td style=\"color: {colour}\">{}</td></tr>",
        format_money(today),
        format_money(yesterday),
        format_signed_pct(pct)
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
