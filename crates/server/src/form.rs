//! Urlencoded form bodies read as ordered pairs.
//!
//! Browsers and hand-written clients may repeat a field, or send both the
//! flat (`liters`) and nested (`refueling[liters]`) spelling. The last
//! occurrence of any accepted spelling wins, as in a Rails params hash.

pub type FormPairs = Vec<(String, String)>;

/// Value of the last pair whose key is one of `names`.
pub fn last_value(pairs: &[(String, String)], names: &[&str]) -> Option<String> {
    pairs
        .iter()
        .rev()
        .find(|(key, _)| names.contains(&key.as_str()))
        .map(|(_, value)| value.clone())
}
