//! Documentation block parsing.
//!
//! A doc block is free prose followed by `@tag` lines:
//!
//! ```text
//! Fetch a user.
//!
//! Looks the user up by its identifier.
//!
//! @param id: int The identifier
//! @return User
//! @throws NotFoundException When no user matches
//! ```
//!
//! The first paragraph is the summary, the remaining prose is the description. A line
//! that does not start with `@` after a tag continues that tag.

/// A parsed `@tag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTag {
    /// `@return A|B description`
    Return {
        types: Vec<String>,
        description: Option<String>,
    },
    /// `@throws Exception description`
    Throws {
        type_name: String,
        description: Option<String>,
    },
    /// `@param` in any of the forms `Type $name desc`, `$name desc`,
    /// `name: Type desc` or `name desc`
    Param {
        name: String,
        type_name: Option<String>,
        description: Option<String>,
    },
    Deprecated(Option<String>),
    /// Any other tag, kept verbatim
    Other { name: String, content: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocBlock {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<DocTag>,
}

impl DocBlock {
    /// Parse raw documentation text. Comment markers must already be stripped.
    pub fn parse(text: &str) -> Self {
        let mut prose: Vec<&str> = Vec::new();
        let mut raw_tags: Vec<String> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.starts_with('@') {
                raw_tags.push(line.to_string());
            } else if let Some(last) = raw_tags.last_mut() {
                if !line.is_empty() {
                    last.push(' ');
                    last.push_str(line);
                }
            } else {
                prose.push(line);
            }
        }

        let mut paragraphs: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in prose {
            if line.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join(" "));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }

        let mut paragraphs = paragraphs.into_iter();
        let summary = paragraphs.next();
        let rest: Vec<String> = paragraphs.collect();
        let description = if rest.is_empty() {
            None
        } else {
            Some(rest.join("\n\n"))
        };

        Self {
            summary,
            description,
            tags: raw_tags.iter().map(|raw| parse_tag(raw)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.description.is_none() && self.tags.is_empty()
    }

    pub fn is_deprecated(&self) -> bool {
        self.tags
            .iter()
            .any(|tag| matches!(tag, DocTag::Deprecated(_)))
    }

    /// Add a deprecation tag unless one is present
    pub fn mark_deprecated(&mut self, note: Option<String>) {
        if !self.is_deprecated() {
            self.tags.push(DocTag::Deprecated(note));
        }
    }

    /// Rewrite every type named in `@return`, `@throws` and `@param` tags
    pub fn map_types(&mut self, map: impl Fn(&str) -> String) {
        for tag in &mut self.tags {
            match tag {
                DocTag::Return { types, .. } => {
                    for type_name in types.iter_mut() {
                        *type_name = map(type_name);
                    }
                }
                DocTag::Throws { type_name, .. } => *type_name = map(type_name),
                DocTag::Param {
                    type_name: Some(type_name),
                    ..
                } => *type_name = map(type_name),
                _ => {}
            }
        }
    }
}

fn rest_of(tokens: &[&str]) -> Option<String> {
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

/// Whitespace-separated words. Bracketed groups stay in one word, so
/// `Result<User, ApiError>` is a single type.
fn split_words(content: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut start = None;

    for (index, c) in content.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(begin) = start.take() {
                    words.push(&content[begin..index]);
                }
                continue;
            }
            _ => {}
        }
        start.get_or_insert(index);
    }
    if let Some(begin) = start {
        words.push(&content[begin..]);
    }
    words
}

fn parse_tag(raw: &str) -> DocTag {
    let mut parts = raw[1..].splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let content = parts.next().unwrap_or_default().trim();
    let tokens = split_words(content);

    match name {
        "return" | "returns" if !tokens.is_empty() => DocTag::Return {
            types: tokens[0]
                .split('|')
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            description: rest_of(&tokens[1..]),
        },
        "throws" | "throw" if !tokens.is_empty() => DocTag::Throws {
            type_name: tokens[0].to_string(),
            description: rest_of(&tokens[1..]),
        },
        "param" if !tokens.is_empty() => parse_param(&tokens),
        "deprecated" => DocTag::Deprecated(rest_of(&tokens)),
        _ => DocTag::Other {
            name: name.to_string(),
            content: content.to_string(),
        },
    }
}

fn parse_param(tokens: &[&str]) -> DocTag {
    if let Some(name) = tokens[0].strip_prefix('$') {
        return DocTag::Param {
            name: name.to_string(),
            type_name: None,
            description: rest_of(&tokens[1..]),
        };
    }
    if let Some(name) = tokens.get(1).and_then(|t| t.strip_prefix('$')) {
        return DocTag::Param {
            name: name.to_string(),
            type_name: Some(tokens[0].to_string()),
            description: rest_of(&tokens[2..]),
        };
    }
    if let Some(name) = tokens[0].strip_suffix(':') {
        return DocTag::Param {
            name: name.to_string(),
            type_name: tokens.get(1).map(|t| t.to_string()),
            description: rest_of(tokens.get(2..).unwrap_or(&[])),
        };
    }
    DocTag::Param {
        name: tokens[0].to_string(),
        type_name: None,
        description: rest_of(&tokens[1..]),
    }
}
