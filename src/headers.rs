/// Case-insensitive header storage.
///
/// Names are stored lowercased and values trimmed. Setting a name that is
/// already present replaces its value, so for repeated header lines the last
/// occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    key_values: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> HeaderMap {
        HeaderMap::default()
    }

    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim().to_string();

        match self.key_values.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.key_values.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.trim();

        self.key_values
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v.as_str()))
    }

    pub fn remove(&mut self, name: &str) {
        let name = name.trim();
        self.key_values.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.key_values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
