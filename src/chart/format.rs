//! Tooltip and axis label formatting (en-US)

use chrono::{DateTime, Utc};

/// US-dollar currency, e.g. `$29,000.00`, `-$1.50`
pub fn usd(value: f64) -> String {
    if value.is_nan() {
        return "$NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-$∞" } else { "$∞" }.to_string();
    }

    // Half-cent ties round away from zero, as en-US currency formatting does
    let cents = (value.abs() * 100.0).round() / 100.0;
    let fixed = format!("{:.2}", cents);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };

    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

/// Tooltip title date, `MM/DD/YYYY`
pub fn tooltip_date(ts: DateTime<Utc>) -> String {
    ts.format("%m/%d/%Y").to_string()
}

/// X-axis tick label for a year bucket
pub fn year_label(ts: DateTime<Utc>) -> String {
    ts.format("%Y").to_string()
}

/// X-axis tick label for a month bucket
pub fn month_label(ts: DateTime<Utc>) -> String {
    ts.format("%b %Y").to_string()
}

/// Y-axis tick label: grouped integers, plain decimals below one
pub fn axis_number(value: f64) -> String {
    if value >= 1.0 {
        group_thousands(&format!("{:.0}", value))
    } else {
        // Trim float noise such as 0.30000000000000004
        let s = format!("{:.10}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_usd() {
        assert_eq!(usd(29000.0), "$29,000.00");
        assert_eq!(usd(14500.0), "$14,500.00");
        assert_eq!(usd(0.5), "$0.50");
        assert_eq!(usd(1234567.891), "$1,234,567.89");
        assert_eq!(usd(999.999), "$1,000.00");
        assert_eq!(usd(-1.5), "-$1.50");
        assert_eq!(usd(0.0), "$0.00");
        assert_eq!(usd(14500.125), "$14,500.13");
        assert_eq!(usd(0.125), "$0.13");
        assert_eq!(usd(0.375), "$0.38");
        assert_eq!(usd(-0.125), "-$0.13");
    }

    #[test]
    fn test_dates() {
        let ts = Utc.with_ymd_and_hms(2021, 3, 7, 15, 0, 0).unwrap();
        assert_eq!(tooltip_date(ts), "03/07/2021");
        assert_eq!(year_label(ts), "2021");
        assert_eq!(month_label(ts), "Mar 2021");
    }

    #[test]
    fn test_axis_number() {
        assert_eq!(axis_number(10000.0), "10,000");
        assert_eq!(axis_number(2.0), "2");
        assert_eq!(axis_number(0.1 * 3.0), "0.3");
        assert_eq!(axis_number(0.005), "0.005");
    }
}
