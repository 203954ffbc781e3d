//! Query string helpers

/// Extract `limit` from a query string, falling back to `default` when absent.
///
/// The value goes through [`coerce_int`], so `limit=abc` means 0, not the default.
pub fn parse_limit(query: Option<&str>, default: i64) -> i64 {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .filter(|(key, _)| key == "limit")
                .last()
        })
        .map_or(default, |(_, value)| coerce_int(&value))
}

/// Loose integer cast: leading whitespace, then the longest numeric prefix.
/// A prefix with a fraction or exponent (`2.5`, `1e3`) is read as a float and
/// truncated toward zero. No digits yields 0; overflow saturates.
#[allow(clippy::cast_possible_truncation)]
pub fn coerce_int(raw: &str) -> i64 {
    let s = raw.trim_start();
    let prefix = &s[..numeric_prefix_len(s.as_bytes())];

    if prefix.contains(['.', 'e', 'E']) {
        return match prefix.parse::<f64>() {
            // `as` truncates and saturates
            Ok(f) if f.is_finite() => f as i64,
            _ => 0,
        };
    }

    let (negative, digits) = match prefix.as_bytes().first() {
        Some(b'-') => (true, &prefix[1..]),
        Some(b'+') => (false, &prefix[1..]),
        _ => (false, prefix),
    };

    let mut value: i64 = 0;
    for b in digits.bytes() {
        let digit = i64::from(b - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(digit)
        } else {
            value.saturating_add(digit)
        };
    }
    value
}

/// Length of `[sign] digits [. digits] [(e|E) [sign] digits]` at the start of
/// `s`, or 0 when no mantissa digit is present.
fn numeric_prefix_len(s: &[u8]) -> usize {
    let count_digits = |from: usize| s[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(s.first(), Some(b'-' | b'+')));
    let int_digits = count_digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if s.get(end) == Some(&b'.') {
        frac_digits = count_digits(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0;
    }

    if matches!(s.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(s.get(exp), Some(b'-' | b'+')) {
            exp += 1;
        }
        let exp_digits = count_digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    end
}
