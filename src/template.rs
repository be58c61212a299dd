//! Job script templates.
//!
//! A template carries four positional slots filled per ring size:
//!
//! | slot | value |
//! |------|-------|
//! | 0 | ring size `N` |
//! | 1 | node count `ceil(N / 3)` |
//! | 2 | raw link configuration |
//! | 3 | URL-path escaped link configuration |
//!
//! Slots are written `{}` (next slot in order) or `{0}`..`{3}`. Literal
//! braces are doubled: `{{` and `}}`.

use crate::topology::RingLinkConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Number of positional slots a template may reference
pub const SLOT_COUNT: usize = 4;

/// Errors raised while loading or rendering a template
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to read template {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unmatched '{brace}' at byte {offset} in template")]
    UnmatchedBrace { brace: char, offset: usize },

    #[error("Unknown template field '{{{field}}}' at byte {offset}")]
    UnknownField { field: String, offset: usize },

    #[error("Template slot {index} is out of range (only 4 slots are available)")]
    SlotOutOfRange { index: usize },

    #[error("Template mixes automatic '{{}}' and numbered '{{n}}' slots")]
    MixedNumbering,
}

/// Values substituted into a template for one ring size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingJob {
    pub size: usize,
    pub node_count: usize,
    pub link_config: String,
    pub escaped_link_config: String,
}

impl RingJob {
    pub fn from_config(config: &RingLinkConfig) -> Self {
        Self {
            size: config.size().get(),
            node_count: config.node_count(),
            link_config: config.to_arg_string(),
            escaped_link_config: config.to_escaped_string(),
        }
    }

    fn slot(&self, index: usize) -> String {
        match index {
            0 => self.size.to_string(),
            1 => self.node_count.to_string(),
            2 => self.link_config.clone(),
            _ => self.escaped_link_config.clone(),
        }
    }
}

/// Renders the job script for one ring size
pub trait TemplateRenderer {
    fn render(&self, job: &RingJob) -> Result<String, TemplateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(usize),
}

/// A parsed positional-slot template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    segments: Vec<Segment>,
}

impl FormatTemplate {
    /// Read and parse a template file
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let text = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded template {:?} ({} bytes)", path, text.len());
        Self::parse(&text)
    }

    /// Parse template text, rejecting malformed slots up front
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut auto_index = 0usize;
        let mut used_auto = false;
        let mut used_numbered = false;

        let mut chars = text.char_indices().peekable();
        while let Some((offset, c)) = chars.next() {
            match c {
                '{' => {
                    if let Some(&(_, '{')) = chars.peek() {
                        chars.next();
                        literal.push('{');
                        continue;
                    }

                    let mut field = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        field.push(inner);
                    }
                    if !closed {
                        return Err(TemplateError::UnmatchedBrace { brace: '{', offset });
                    }

                    let index = if field.is_empty() {
                        used_auto = true;
                        auto_index += 1;
                        auto_index - 1
                    } else {
                        used_numbered = true;
                        field
                            .parse::<usize>()
                            .map_err(|_| TemplateError::UnknownField { field: field.clone(), offset })?
                    };
                    if used_auto && used_numbered {
                        return Err(TemplateError::MixedNumbering);
                    }
                    if index >= SLOT_COUNT {
                        return Err(TemplateError::SlotOutOfRange { index });
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(index));
                }
                '}' => {
                    if let Some(&(_, '}')) = chars.peek() {
                        chars.next();
                        literal.push('}');
                    } else {
                        return Err(TemplateError::UnmatchedBrace { brace: '}', offset });
                    }
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Slots referenced by this template, in order of appearance
    pub fn slots(&self) -> Vec<usize> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Slot(i) => Some(*i),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

impl TemplateRenderer for FormatTemplate {
    fn render(&self, job: &RingJob) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(index) => out.push_str(&job.slot(*index)),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::build;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn job(n: i64) -> RingJob {
        RingJob::from_config(&build(n).unwrap())
    }

    #[test]
    fn test_ring_job_values() {
        let job = job(4);
        assert_eq!(job.size, 4);
        assert_eq!(job.node_count, 2);
        assert!(job.link_config.starts_with("--fpgalink=n00:acl0:ch0-n01:acl0:ch1 "));
        assert!(job.escaped_link_config.starts_with("--fpgalink%3Dn00%3Aacl0%3Ach0"));
    }

    #[test]
    fn test_automatic_slots() {
        let template = FormatTemplate::parse("#SBATCH -N {}\nsize={} links='{}' url={}\n").unwrap();
        assert_eq!(template.slots(), vec![0, 1, 2, 3]);

        let rendered = template.render(&job(1)).unwrap();
        assert_eq!(
            rendered,
            "#SBATCH -N 1\nsize=1 links='--fpgalink=n00:acl0:ch0-n00:acl0:ch1 ' \
             url=--fpgalink%3Dn00%3Aacl0%3Ach0-n00%3Aacl0%3Ach1%20\n"
        );
    }

    #[test]
    fn test_numbered_slots_may_repeat() {
        let template = FormatTemplate::parse("{1} nodes, ring {0}, again {0}").unwrap();
        assert_eq!(template.render(&job(9)).unwrap(), "3 nodes, ring 9, again 9");
    }

    #[test]
    fn test_escaped_braces() {
        let template = FormatTemplate::parse("for i in {{1..{0}}}; do echo ${{i}}; done").unwrap();
        assert_eq!(
            template.render(&job(6)).unwrap(),
            "for i in {1..6}; do echo ${i}; done"
        );
    }

    #[test]
    fn test_template_without_slots() {
        let template = FormatTemplate::parse("#!/bin/bash\nhostname\n").unwrap();
        assert!(template.slots().is_empty());
        assert_eq!(template.render(&job(3)).unwrap(), "#!/bin/bash\nhostname\n");
    }

    #[test]
    fn test_malformed_templates() {
        assert!(matches!(
            FormatTemplate::parse("size {0"),
            Err(TemplateError::UnmatchedBrace { brace: '{', offset: 5 })
        ));
        assert!(matches!(
            FormatTemplate::parse("oops }"),
            Err(TemplateError::UnmatchedBrace { brace: '}', offset: 5 })
        ));
        assert!(matches!(
            FormatTemplate::parse("{name}"),
            Err(TemplateError::UnknownField { .. })
        ));
        assert!(matches!(
            FormatTemplate::parse("{4}"),
            Err(TemplateError::SlotOutOfRange { index: 4 })
        ));
        assert!(matches!(
            FormatTemplate::parse("{} {} {} {} {}"),
            Err(TemplateError::SlotOutOfRange { index: 4 })
        ));
        assert!(matches!(
            FormatTemplate::parse("{} {1}"),
            Err(TemplateError::MixedNumbering)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "ring {{size}} = {{}}").unwrap();
        // The file holds "ring {size} = {}", which names an unknown field
        assert!(matches!(
            FormatTemplate::load(file.path()),
            Err(TemplateError::UnknownField { .. })
        ));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "ring {{}} on {{}} nodes").unwrap();
        let template = FormatTemplate::load(file.path()).unwrap();
        assert_eq!(template.render(&job(6)).unwrap(), "ring 6 on 2 nodes");
    }

    #[test]
    fn test_load_missing_file() {
        let err = FormatTemplate::load(Path::new("/nonexistent/ringsub/template.sh")).unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
    }
}
