/// Rewrites `?` placeholders into the numbered `$1..$n` form Postgres
/// expects, and collapses whitespace so queries can be written in columns.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");

    let mut result = String::with_capacity(cleaned.len());
    let mut param_index = 1;
    for ch in cleaned.chars() {
        if ch == '?' {
            result.push('$');
            result.push_str(&param_index.to_string());
            param_index += 1;
        } else {
            result.push(ch);
        }
    }
    result
}
