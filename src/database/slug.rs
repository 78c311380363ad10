use regex::Regex;

/// Lowercase hyphen-separated identifier derived from a display name.
pub fn slugify(input: &str) -> String {
    let re = Regex::new(r"[^a-z0-9]+").unwrap();
    re.replace_all(&input.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// First free variant of `base` given the slugs already in use: `base`,
/// then `base-2`, `base-3`, and so on.
pub fn unique_slug(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }

    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken.iter().any(|s| *s == candidate) {
            return candidate;
        }
        n += 1;
    }
}
