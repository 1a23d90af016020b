use kifu_tree::TimeLimit;

const UNITS: [(char, f64); 3] = [('h', 3600.0), ('m', 60.0), ('s', 1.0)];

/// Reads a `TM` value. Besides plain seconds, records use forms such as
/// `1h 30m`, `90m`, `5m 30s` and `2h each`; text left after the last unit is
/// kept as the remainder.
pub(crate) fn parse_time(text: &str) -> Result<TimeLimit, String> {
    let text = text.trim();
    if let Ok(seconds) = text.parse::<f64>() {
        return Ok(limit(seconds, ""));
    }

    let mut total = 0.0;
    let mut rest = text;
    let mut matched = false;
    for (unit, scale) in UNITS {
        let Some(at) = rest.find(unit) else { continue };
        let Ok(amount) = rest[..at].trim().parse::<f64>() else { continue };
        total += amount * scale;
        rest = rest[at + unit.len_utf8()..].trim_start();
        matched = true;
    }
    if matched { Ok(limit(total, rest)) } else { Err(format!("bad time limit {text}")) }
}

fn limit(seconds: f64, rest: &str) -> TimeLimit {
    TimeLimit { seconds: seconds.round() as u32, rest: rest.to_owned() }
}
