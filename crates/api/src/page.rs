use navpick_core::domain::recommendation::{RecommendationResult, HORIZON_YEARS_RANGE};
use navpick_core::ingest::error::FetchFailure;
use std::fmt::Write;

const TITLE: &str = "Mutual Fund Recommendation Tool (AMFI Data)";

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin:.75rem 0 .25rem}\
input[type=number]{width:14rem}\
.error{color:#b00020}\
li{margin:.25rem 0}";

/// Raw form values echoed back into the inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub monthly_investment: String,
    pub target_amount: String,
    pub horizon_years: String,
}

#[derive(Debug)]
pub enum Outcome<'a> {
    NotRequested,
    Invalid(String),
    Results(&'a [RecommendationResult]),
}

pub fn render_page(loaded: usize, form: &FormValues, outcome: Outcome<'_>) -> String {
    let mut body = format!("<p>Loaded {loaded} mutual funds from AMFI.</p>\n");
    body.push_str(&render_form(form));

    match outcome {
        Outcome::NotRequested => {}
        Outcome::Invalid(msg) => {
            let _ = writeln!(body, "<p class=\"error\">{}</p>", escape_html(&msg));
        }
        Outcome::Results([]) => {
            body.push_str("<p>No suitable mutual funds found for the given criteria.</p>\n");
        }
        Outcome::Results(results) => {
            body.push_str("<h2>Recommended Mutual Funds:</h2>\n<ul>\n");
            for rec in results {
                let _ = writeln!(body, "<li>{}</li>", escape_html(&format_result(rec)));
            }
            body.push_str("</ul>\n");
        }
    }

    layout(&body)
}

pub fn render_fetch_failure(err: &FetchFailure) -> String {
    let body = format!(
        "<p class=\"error\">Error fetching AMFI NAV data.</p>\n<p class=\"error\">Error: {}</p>\n",
        escape_html(&err.detail)
    );
    layout(&body)
}

pub fn format_result(rec: &RecommendationResult) -> String {
    format!(
        "Scheme Name: {}, NAV: {:.2}, Time to Target: {:.2} years",
        rec.name, rec.price, rec.years_to_target
    )
}

fn render_form(form: &FormValues) -> String {
    format!(
        "<form method=\"get\" action=\"/\">\n\
         <label for=\"monthly_investment\">Enter Monthly Investment Amount (INR)</label>\n\
         <input type=\"number\" id=\"monthly_investment\" name=\"monthly_investment\" min=\"100\" step=\"any\" value=\"{monthly}\">\n\
         <label for=\"target_amount\">Enter Target Amount (INR)</label>\n\
         <input type=\"number\" id=\"target_amount\" name=\"target_amount\" min=\"1000\" step=\"any\" value=\"{target}\">\n\
         <label for=\"horizon_years\">Investment Horizon (years): <output id=\"horizon_value\">{horizon}</output></label>\n\
         <input type=\"range\" id=\"horizon_years\" name=\"horizon_years\" min=\"{min}\" max=\"{max}\" step=\"1\" value=\"{horizon}\" \
         oninput=\"document.getElementById('horizon_value').value=this.value\">\n\
         <p><button type=\"submit\">Get Recommendations</button></p>\n\
         </form>\n",
        monthly = escape_html(&form.monthly_investment),
        target = escape_html(&form.target_amount),
        horizon = escape_html(&form.horizon_years),
        min = HORIZON_YEARS_RANGE.start(),
        max = HORIZON_YEARS_RANGE.end(),
    )
}

fn layout(body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{TITLE}</h1>\n{body}</body>\n</html>\n"
    )
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
