use regex::Regex;

#[derive(Debug, thiserror::Error)]
#[error("invalid pattern `{pattern}`: {source}")]
pub struct FilterError {
    pattern: String,
    #[source]
    source: regex::Error,
}

/// Include/exclude filter over rendered event text.
#[derive(Debug, Clone, Default)]
pub struct TextFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

/// Compiles a `*`/`?` wildcard pattern that may match anywhere in the text.
fn compile(pattern: &str) -> Result<Option<Regex>, FilterError> {
    if pattern.is_empty() {
        return Ok(None);
    }

    let mut re = String::from("(?s)");
    let mut literal = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut literal))),
        }
    }

    Regex::new(&re).map(Some).map_err(|source| FilterError {
        pattern: pattern.to_string(),
        source,
    })
}

impl TextFilter {
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self, FilterError> {
        Ok(Self {
            include: include.map(compile).transpose()?.flatten(),
            exclude: exclude.map(compile).transpose()?.flatten(),
        })
    }

    /// Exclude wins over include when both match.
    pub fn allows(&self, text: &str) -> bool {
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(text) {
                return false;
            }
        }
        match &self.include {
            Some(include) => include.is_match(text),
            None => true,
        }
    }
}
