/// Convert a human-readable phrase to camelCase.
///
/// Three passes run in order - space, underscore, hyphen - and each one
/// re-splits the raw input on its separator: the first component keeps its
/// original casing and the remaining components are title-cased. A later
/// pass therefore overrides the earlier ones, and separator characters that
/// only the earlier passes knew about survive in the output. Used to derive
/// schema names from exception detail strings, so this exact shape is what
/// published documents contain.
///
/// # Examples
/// ```
/// use raisemap_core::utils::to_camel_case;
/// assert_eq!(to_camel_case("pay up"), "payUp");
/// assert_eq!(to_camel_case("Internal Server Error"), "InternalServerError");
/// assert_eq!(to_camel_case("not_found"), "notFound");
/// assert_eq!(to_camel_case("not-found_at all"), "notFound_At All");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let mut result = s.to_owned();
    for separator in [' ', '_', '-'] {
        if !result.contains(separator) {
            continue;
        }
        let mut components = s.split(separator);
        let mut rebuilt = components.next().unwrap_or("").to_owned();
        for component in components {
            rebuilt.push_str(&title_case(component));
        }
        result = rebuilt;
    }
    result
}

/// Title-case every alphabetic run: first letter uppercased, the rest
/// lowercased, non-letters untouched.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}
