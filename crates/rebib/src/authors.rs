//! Contributor-name formatting for the `names` transform
//!
//! A contributor field holds names joined by `" and "`, each in the
//! `Last, First [Middle...]` form. The format string renders one name:
//! `f`/`m`/`l` emit the full first/middle/last part, `F`/`M`/`L` the
//! uppercased initial (dots belong in the format string itself, e.g.
//! `"F. [M. ]l"`), any other character is literal, and a `[...]` section
//! is dropped for names without a middle part.

use rebib_format::{ElideMode, NamesFormat};

/// A parse failure for one name within a contributor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameError {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub first: String,
    pub middle: String,
    pub last: String,
}

impl Author {
    /// Parse a `Last, First [Middle...]` name. The comma is mandatory;
    /// everything after the second given-name word counts as middle.
    pub fn from_str(name: &str) -> Result<Author, NameError> {
        let Some((last, given)) = name.split_once(',') else {
            return Err(NameError {
                name: name.to_string(),
                message: "expected 'Last, First' with a comma".to_string(),
            });
        };
        let mut given_words = given.split_whitespace();
        let Some(first) = given_words.next() else {
            return Err(NameError {
                name: name.to_string(),
                message: "no given name after the comma".to_string(),
            });
        };
        Ok(Author {
            first: first.to_string(),
            middle: given_words.collect::<Vec<_>>().join(" "),
            last: last.trim().to_string(),
        })
    }

    pub fn has_middle(&self) -> bool {
        !self.middle.is_empty()
    }

    /// Render through a format string with the `[...]` section already
    /// resolved away.
    fn render(&self, fmt: &str) -> String {
        let mut out = String::with_capacity(fmt.len() + self.last.len());
        for c in fmt.chars() {
            match c {
                'f' => out.push_str(&self.first),
                'l' => out.push_str(&self.last),
                'm' => out.push_str(&self.middle),
                'F' => out.extend(initial(&self.first)),
                'L' => out.extend(initial(&self.last)),
                'M' => out.extend(initial(&self.middle)),
                _ => out.push(c),
            }
        }
        out
    }
}

fn initial(part: &str) -> impl Iterator<Item = char> + '_ {
    part.chars().next().into_iter().flat_map(|c| c.to_uppercase())
}

/// Split a format string into its without-middle and with-middle variants
/// by resolving the first `[...]` section.
fn split_fmt(fmt: &str) -> (String, String) {
    match (fmt.find('['), fmt.find(']')) {
        (Some(open), Some(close)) if open < close => {
            let without = format!("{}{}", &fmt[..open], &fmt[close + 1..]);
            let with = format!("{}{}{}", &fmt[..open], &fmt[open + 1..close], &fmt[close + 1..]);
            (without, with)
        }
        _ => (fmt.to_string(), fmt.to_string()),
    }
}

/// Reformat a whole `" and "`-joined contributor list.
pub fn format_names(value: &str, format: &NamesFormat) -> Result<String, NameError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    let (plain_fmt, middle_fmt) = split_fmt(&format.fmt);
    let mut rendered = Vec::new();
    for name in trimmed.split(" and ") {
        let author = Author::from_str(name.trim())?;
        rendered.push(if author.has_middle() {
            author.render(&middle_fmt)
        } else {
            author.render(&plain_fmt)
        });
    }

    Ok(join_names(rendered, format))
}

fn join_names(rendered: Vec<String>, format: &NamesFormat) -> String {
    if let Some(elide) = &format.elide {
        if rendered.len() > elide.limit && elide.limit > 0 {
            let kept = rendered[..elide.limit].join(&format.sep);
            return match elide.mode {
                ElideMode::Last => format!("{}{}", kept, elide.marker),
                ElideMode::BeforeLast => {
                    let last = &rendered[rendered.len() - 1];
                    format!("{}{}{}{}", kept, elide.marker, format.and, last)
                }
            };
        }
    }
    match rendered.len() {
        0 => String::new(),
        1 => rendered.into_iter().next().unwrap_or_default(),
        2 => rendered.join(&format.and),
        _ => {
            let head = rendered[..rendered.len() - 1].join(&format.sep);
            format!("{}{}{}", head, format.and, rendered[rendered.len() - 1])
        }
    }
}
