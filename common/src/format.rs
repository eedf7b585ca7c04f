use chrono::{DateTime, Utc};

/// Country code prefixed to local WhatsApp numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "91";

/// Whole rupees with Indian digit grouping, e.g. `₹1,23,456`.
/// Missing or non-finite prices render as a dash.
pub fn format_price_inr(price: Option<f64>) -> String {
    let Some(value) = price.filter(|p| p.is_finite()) else {
        return "—".into();
    };
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}₹{}", group_indian(&format!("{:.0}", rounded.abs())))
}

/// Insert separators: the last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

/// Coarse age of a listing: seconds, minutes, hours, then days.
/// Missing timestamps render as an empty string.
pub fn time_ago(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created) = created else {
        return String::new();
    };
    let secs = (now - created).num_seconds().max(0);
    match secs {
        s if s < 60 => format!("{s}s ago"),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s => format!("{}d ago", s / 86_400),
    }
}

/// `wa.me` chat link for a seller's number, or `None` when the number has
/// no digits. Numbers of eleven or more digits that already start with the
/// country code are used as-is.
pub fn whatsapp_link(raw_number: &str, message: &str) -> Option<String> {
    let digits = crate::draft::only_digits(raw_number);
    if digits.is_empty() {
        return None;
    }
    let number = if digits.len() >= 11 && digits.starts_with(DEFAULT_COUNTRY_CODE) {
        digits
    } else {
        format!("{DEFAULT_COUNTRY_CODE}{digits}")
    };
    if message.is_empty() {
        Some(format!("https://wa.me/{number}"))
    } else {
        Some(format!(
            "https://wa.me/{number}?text={}",
            urlencoding::encode(message)
        ))
    }
}

/// Opening line sent to a seller about `title`.
pub fn interest_message(title: &str) -> String {
    format!("Hi, I'm interested in your \"{title}\".")
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn test_inr_grouping() {
        assert_eq!(format_price_inr(Some(0.0)), "₹0");
        assert_eq!(format_price_inr(Some(999.0)), "₹999");
        assert_eq!(format_price_inr(Some(1000.0)), "₹1,000");
        assert_eq!(format_price_inr(Some(123456.0)), "₹1,23,456");
        assert_eq!(format_price_inr(Some(12345678.4)), "₹1,23,45,678");
        assert_eq!(format_price_inr(Some(-1500.0)), "-₹1,500");
        assert_eq!(format_price_inr(None), "—");
        assert_eq!(format_price_inr(Some(f64::NAN)), "—");
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let ago = |d: Duration| time_ago(Some(now - d), now);
        assert_eq!(ago(Duration::seconds(42)), "42s ago");
        assert_eq!(ago(Duration::minutes(5)), "5m ago");
        assert_eq!(ago(Duration::hours(3)), "3h ago");
        assert_eq!(ago(Duration::days(9)), "9d ago");
        assert_eq!(ago(Duration::seconds(-30)), "0s ago");
        assert_eq!(time_ago(None, now), "");
    }

    #[test]
    fn test_whatsapp_country_code() {
        assert_eq!(
            whatsapp_link("98765 43210", "").as_deref(),
            Some("https://wa.me/919876543210")
        );
        assert_eq!(
            whatsapp_link("+91 98765-43210", "").as_deref(),
            Some("https://wa.me/919876543210")
        );
        assert_eq!(whatsapp_link("n/a", "hi"), None);
    }

    #[test]
    fn test_whatsapp_message_is_encoded() {
        let link = whatsapp_link("9876543210", &interest_message("Sofa & chairs")).unwrap();
        assert_eq!(
            link,
            "https://wa.me/919876543210?text=Hi%2C%20I%27m%20interested%20in%20your%20%22Sofa%20%26%20chairs%22."
        );
    }
}
