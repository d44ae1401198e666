use crate::domain::fund::FundRecord;
use chrono::NaiveDate;

const FIELD_SEPARATOR: char = ';';
const MIN_FIELDS: usize = 6;

const CODE_FIELD: usize = 0;
const NAME_FIELD: usize = 3;
const PRICE_FIELD: usize = 4;
const DATE_FIELD: usize = 5;

// Observed format: "17-Oct-2026".
const NAV_DATE_FORMAT: &str = "%d-%b-%Y";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeed {
    pub records: Vec<FundRecord>,
    /// Data lines (after the header) that did not yield a record.
    pub skipped_lines: usize,
}

/// Parses the `;`-delimited NAV feed. The first line is a header.
///
/// Lines with fewer than six fields (blank lines, fund-house headings) and lines whose
/// price is not a finite, non-negative number are dropped without error.
pub fn parse_nav_feed(raw: &str) -> ParsedFeed {
    let mut out = ParsedFeed::default();

    for (idx, line) in raw.lines().enumerate().skip(1) {
        match parse_line(line) {
            Some(record) => out.records.push(record),
            None => {
                out.skipped_lines += 1;
                if !line.trim().is_empty() {
                    tracing::debug!(line_no = idx + 1, line, "skipping unparseable NAV line");
                }
            }
        }
    }

    out
}

fn parse_line(line: &str) -> Option<FundRecord> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    // Code and name are kept verbatim; only the numeric and date fields tolerate padding.
    let price = parse_price(fields[PRICE_FIELD].trim())?;

    Some(FundRecord {
        code: fields[CODE_FIELD].to_string(),
        name: fields[NAME_FIELD].to_string(),
        price,
        nav_date: NaiveDate::parse_from_str(fields[DATE_FIELD].trim(), NAV_DATE_FORMAT).ok(),
    })
}

fn parse_price(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_numeric_lines_and_drops_the_rest() {
        let feed = "HDR\nA;x;x;FundA;12.34;x\nB;x;x;FundB;abc;x";
        let parsed = parse_nav_feed(feed);
        assert_eq!(
            parsed.records,
            vec![FundRecord {
                code: "A".to_string(),
                name: "FundA".to_string(),
                price: 12.34,
                nav_date: None,
            }]
        );
        assert_eq!(parsed.skipped_lines, 1);
    }

    #[test]
    fn drops_lines_with_too_few_fields() {
        let feed = "HDR\nA;x;x;FundA;12.34\nOpen Ended Schemes(Debt Scheme - Banking and PSU Fund)\n\n";
        let parsed = parse_nav_feed(feed);
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped_lines, 3);
    }

    #[test]
    fn header_only_and_empty_feeds_yield_nothing() {
        assert!(parse_nav_feed("").records.is_empty());
        let header_only = parse_nav_feed(
            "Scheme Code;ISIN Div Payout/ ISIN Growth;ISIN Div Reinvestment;Scheme Name;Net Asset Value;Date",
        );
        assert!(header_only.records.is_empty());
        assert_eq!(header_only.skipped_lines, 0);
    }

    #[test]
    fn first_line_is_always_treated_as_header() {
        let parsed = parse_nav_feed("A;x;x;FundA;1.00;x\nB;x;x;FundB;2.00;x");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].code, "B");
    }

    #[test]
    fn parses_amfi_shaped_crlf_feed() {
        let feed = "Scheme Code;ISIN Div Payout/ ISIN Growth;ISIN Div Reinvestment;Scheme Name;Net Asset Value;Date\r\n\
                    \r\n\
                    Open Ended Schemes(Debt Scheme - Banking and PSU Fund)\r\n\
                    \r\n\
                    119551;INF209KA12Z1;INF209KA13Z9;Aditya Birla Sun Life Banking & PSU Debt Fund - DIRECT - IDCW;104.5329;17-Oct-2026\r\n\
                    119552;INF209K01YM0;-;Aditya Birla Sun Life Banking & PSU Debt Fund - Regular - Growth;N.A.;17-Oct-2026\r\n\
                    120437;-;-;Axis Banking & PSU Debt Fund - Direct Plan - Growth Option;2511.0672;17-Oct-2026\r\n";
        let parsed = parse_nav_feed(feed);

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].code, "119551");
        assert_eq!(
            parsed.records[0].name,
            "Aditya Birla Sun Life Banking & PSU Debt Fund - DIRECT - IDCW"
        );
        assert_eq!(parsed.records[0].price, 104.5329);
        assert_eq!(
            parsed.records[0].nav_date,
            NaiveDate::from_ymd_opt(2026, 10, 17)
        );
        assert_eq!(parsed.records[1].code, "120437");
        assert_eq!(parsed.skipped_lines, 4);
    }

    #[test]
    fn rejects_non_finite_and_negative_prices() {
        let feed = "HDR\nA;x;x;FundA;NaN;x\nB;x;x;FundB;inf;x\nC;x;x;FundC;-1.5;x\nD;x;x;FundD;0;x";
        let parsed = parse_nav_feed(feed);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].code, "D");
        assert_eq!(parsed.records[0].price, 0.0);
    }

    #[test]
    fn keeps_duplicate_codes_in_source_order() {
        let feed = "HDR\nA;x;x;First;1;x\nA;x;x;Second;2;x";
        let parsed = parse_nav_feed(feed);
        let names: Vec<_> = parsed.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn keeps_code_and_name_verbatim_but_tolerates_padded_price() {
        let parsed = parse_nav_feed("HDR\n 101 ;x;x; Padded Fund ; 12.5 ; 02-Jan-2026 ");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].code, " 101 ");
        assert_eq!(parsed.records[0].name, " Padded Fund ");
        assert_eq!(parsed.records[0].price, 12.5);
        assert_eq!(parsed.records[0].nav_date, NaiveDate::from_ymd_opt(2026, 1, 2));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let parsed = parse_nav_feed("HDR\nA;x;x;FundA;10.5;01-Jan-2026;extra;more");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].nav_date, NaiveDate::from_ymd_opt(2026, 1, 1));
    }
}
