//! Text helpers shared by extractors.

use std::collections::HashMap;

const HONORIFICS: &[&str] = &["mr", "mr.", "mrs", "ms", "miss"];

/// Pair up the lines of two side-by-side boxes forming a "fake table".
///
/// Statements often lay out labels in one box and values in the next, one
/// per line. Lines beyond the shorter of the two boxes are ignored; repeated
/// labels keep the last value.
pub fn build_dict_from_fake_table<'a>(
    fields_box: &'a str,
    values_box: &'a str,
) -> HashMap<&'a str, &'a str> {
    fields_box.split('\n').zip(values_box.split('\n')).collect()
}

/// Account holder name from the first line of an address box, title-cased.
pub fn extract_account_holder_from_address(address: &str) -> String {
    title_case(address.split('\n').next().unwrap_or_default().trim())
}

/// Remove a leading honorific ("Mr", "Mrs", "Ms", "Miss").
///
/// A name made only of the honorific is returned unchanged.
pub fn drop_honorific(name: &str) -> &str {
    match name.split_once(' ') {
        Some((first, rest)) if HONORIFICS.contains(&first.to_lowercase().as_str()) => rest,
        _ => name,
    }
}

/// Trim, optionally drop the honorific, and title-case all-caps names.
pub fn normalize_account_holder_name(name: &str, do_drop_honorific: bool) -> String {
    let mut name = name.trim();
    if do_drop_honorific {
        name = drop_honorific(name);
    }

    if is_upper(name) {
        title_case(name)
    } else {
        name.to_string()
    }
}

/// At least one cased character, and no lowercase ones.
fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// Uppercase the first letter of each run of letters, lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
