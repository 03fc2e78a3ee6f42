//! IATA code helpers shared by storage conversion and the HTTP layer

/// 规范化机场代码：去空白、转大写，必须是 3 个 ASCII 字母
pub fn normalize_airport_code(raw: &str) -> Option<String> {
    let code = raw.trim();
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

/// 规范化航司代码：2–3 个 ASCII 字母或数字，且至少包含一个字母
pub fn normalize_airline_code(raw: &str) -> Option<String> {
    let code = raw.trim();
    if (2..=3).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
        && code.bytes().any(|b| b.is_ascii_alphabetic())
    {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

/// 可选字段的规范化版本，空值和非法值都返回 None
pub fn normalize_optional_airport_code(raw: Option<&str>) -> Option<String> {
    raw.and_then(normalize_airport_code)
}
