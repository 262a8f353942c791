/// Encodes and decodes version numbers in directory/file base names,
/// e.g. prefix `_v` with 3 digits turns 7 into `_v007`.
#[derive(Debug, Clone)]
pub struct NameCodec {
    pub prefix: String,
    pub digits: usize,
}

impl NameCodec {
    pub fn new(prefix: impl Into<String>, digits: usize) -> Self {
        Self {
            prefix: prefix.into(),
            digits,
        }
    }

    /// `prefix` + zero-padded version. Values wider than the configured
    /// digit count still encode, just wider.
    pub fn encode(&self, version: u32) -> String {
        format!("{}{:0width$}", self.prefix, version, width = self.digits)
    }

    /// Decode a trailing version suffix from `name`.
    ///
    /// Only succeeds when the text after the *last* occurrence of the
    /// prefix runs to the end of the string and is made up entirely of
    /// digits. `Song_v003` decodes to 3; `Song_v003x`, `Song_version`,
    /// and `Song` decode to none.
    pub fn decode(&self, name: &str) -> Option<u32> {
        let idx = name.rfind(&self.prefix)?;
        let tail = &name[idx + self.prefix.len()..];
        Self::parse_digits(tail)
    }

    /// Exact-suffix match: `remainder` must be precisely the prefix
    /// followed by digits, nothing else. Used for strict sibling matching
    /// where `base + suffix` must consume the whole directory name.
    pub fn suffix_version(&self, remainder: &str) -> Option<u32> {
        let tail = remainder.strip_prefix(self.prefix.as_str())?;
        Self::parse_digits(tail)
    }

    /// Split `name` into (base, version) when it carries a version
    /// suffix, or report it as unversioned.
    pub fn split(&self, name: &str) -> (String, Option<u32>) {
        let Some(idx) = name.rfind(&self.prefix) else {
            return (name.to_string(), None);
        };
        let tail = &name[idx + self.prefix.len()..];
        match Self::parse_digits(tail) {
            Some(version) => (name[..idx].to_string(), Some(version)),
            None => (name.to_string(), None),
        }
    }

    fn parse_digits(tail: &str) -> Option<u32> {
        if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        tail.parse::<u32>().ok()
    }
}
