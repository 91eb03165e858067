/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Segmentation of a document into slides and steps.
//!
//! ```text
//! <head>% SLIDE <name>
//! <header>\Step[...]{...}
//! % ENDSLIDE<gap>% SLIDE <name>
//! ...
//! % ENDSLIDE<tail>
//! ```
//!
//! Each slide's header and step are parsed with the builders of the
//! [`SectionKind`] registered for its name. Everything else is kept as raw
//! text, so an unedited document renders byte-identically.

use std::path::Path;
use std::sync::Arc;

use texstep_core::Node;

use crate::config::DocumentConfig;
use crate::error::{DocumentError, Result};
use crate::registry::{SectionKind, SectionRegistry};

/// One named slide: a header and the steps rendered from it.
#[derive(Debug, Clone)]
pub struct Slide {
    name: String,
    /// Raw text between the start marker and the end of its line.
    name_line: String,
    header: Node,
    steps: Vec<Node>,
    /// Raw text between the end marker and the next slide.
    gap: String,
    kind: Arc<SectionKind>,
    animated: bool,
}

impl Slide {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &Node {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Node {
        &mut self.header
    }

    pub fn steps(&self) -> &[Node] {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut Vec<Node> {
        &mut self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Node> {
        self.steps.get(index)
    }

    pub fn kind(&self) -> &Arc<SectionKind> {
        &self.kind
    }

    /// Take the last step out, typically the stub parsed from the source.
    pub fn pop_step(&mut self) -> Option<Node> {
        self.steps.pop()
    }

    /// Record a copy of `step` as the next step of this slide.
    pub fn add_step(&mut self, step: &Node) -> &mut Node {
        self.steps.push(step.copy());
        let last = self.steps.len() - 1;
        &mut self.steps[last]
    }

    fn render_into(&self, out: &mut String, config: &DocumentConfig) {
        out.push_str(&config.start_marker);
        out.push_str(&self.name_line);
        out.push('\n');
        out.push_str(&self.header.render());
        let steps: Vec<String> = self.steps.iter().map(Node::render).collect();
        out.push_str(&steps.join(&config.step_separator));
        out.push_str(&config.end_marker);
        out.push_str(&self.gap);
    }
}

/// A new slide derived from an existing one by [`Document::split_slide`].
#[derive(Debug, Clone)]
pub struct Split {
    name: String,
    title: Option<String>,
    subtitle: Option<String>,
    step: Option<Node>,
}

impl Split {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            subtitle: None,
            step: None,
        }
    }

    /// Replace the `title` field of the copied header.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the `subtitle` field of the copied header.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Start the new slide with a copy of `step`.
    pub fn with_step(mut self, step: &Node) -> Self {
        self.step = Some(step.copy());
        self
    }
}

/// A parsed document.
#[derive(Debug, Clone)]
pub struct Document {
    config: DocumentConfig,
    head: String,
    slides: Vec<Slide>,
    tail: String,
}

impl Document {
    /// Parse with the default markers.
    pub fn parse(text: &str, registry: &SectionRegistry) -> Result<Self> {
        Self::parse_with(text, registry, DocumentConfig::default())
    }

    /// Split `text` into slides and parse each one with its registered kind.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::MalformedSlide`] if a slide lacks its end marker or
    ///   its name line
    /// - [`DocumentError::UnregisteredTag`] if a slide name has no kind
    /// - [`DocumentError::MissingStep`] if a slide has no step command
    /// - [`DocumentError::Modifier`] if a header or step fails to parse
    pub fn parse_with(text: &str, registry: &SectionRegistry, config: DocumentConfig) -> Result<Self> {
        if config.start_marker.is_empty() || config.end_marker.is_empty() {
            return Err(DocumentError::InvalidConfig {
                message: "slide markers must not be empty".to_string(),
            });
        }
        let step_matcher = config.step_matcher()?;

        let mut chunks = text.split(config.start_marker.as_str());
        let head = chunks.next().unwrap_or_default().to_string();

        let mut slides = Vec::new();
        for (i, chunk) in chunks.enumerate() {
            let index = i + 1;
            let Some((body, gap)) = chunk.rsplit_once(config.end_marker.as_str()) else {
                return Err(DocumentError::MalformedSlide {
                    index,
                    message: format!("missing {:?}", config.end_marker),
                });
            };
            let Some((name_line, rest)) = body.split_once('\n') else {
                return Err(DocumentError::MalformedSlide {
                    index,
                    message: "missing newline after the slide name".to_string(),
                });
            };
            let name = name_line.trim();
            if name.is_empty() {
                return Err(DocumentError::MalformedSlide {
                    index,
                    message: "empty slide name".to_string(),
                });
            }

            let kind = registry.lookup(name)?;
            let Some(step_start) = step_matcher.find(rest).map(|m| m.start()) else {
                return Err(DocumentError::MissingStep {
                    slide: name.to_string(),
                    command: config.step_command.clone(),
                });
            };
            let header = kind.header_builder().parse(&rest[..step_start])?;
            let step = kind.step_builder().parse(&rest[step_start..])?;
            tracing::debug!(slide = name, index, "Parsed slide");

            slides.push(Slide {
                name: name.to_string(),
                name_line: name_line.to_string(),
                header,
                steps: vec![step],
                gap: gap.to_string(),
                kind: Arc::clone(kind),
                animated: false,
            });
        }

        // Whatever follows the last slide belongs to the document.
        let tail = slides
            .last_mut()
            .map(|slide| std::mem::take(&mut slide.gap))
            .unwrap_or_default();

        tracing::info!(slides = slides.len(), "Parsed document");
        Ok(Self {
            config,
            head,
            slides,
            tail,
        })
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Text before the first slide.
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Text after the last slide.
    pub fn tail(&self) -> &str {
        &self.tail
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn slide_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.slides.get_mut(index)
    }

    /// Index of the first slide whose name contains `name`.
    pub fn find_slide(&self, name: &str) -> Option<usize> {
        self.slides.iter().position(|slide| slide.name.contains(name))
    }

    /// Total number of steps across all slides.
    pub fn step_count(&self) -> usize {
        self.slides.iter().map(|slide| slide.steps.len()).sum()
    }

    pub(crate) fn slides_mut(&mut self) -> &mut Vec<Slide> {
        &mut self.slides
    }

    pub fn render(&self) -> String {
        let mut out = self.head.clone();
        for slide in &self.slides {
            slide.render_into(&mut out, &self.config);
        }
        out.push_str(&self.tail);
        out
    }

    /// Check that this document renders back to `original`.
    ///
    /// On divergence the render is written to `side_file` for diffing.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::RoundTrip`] naming the side file and the
    /// first differing byte, or [`DocumentError::Io`] if it cannot be written.
    pub fn verify_round_trip(&self, original: &str, side_file: &Path) -> Result<()> {
        let rendered = self.render();
        if rendered == original {
            tracing::debug!(bytes = rendered.len(), "Round trip verified");
            return Ok(());
        }
        let offset = first_difference(rendered.as_bytes(), original.as_bytes());
        std::fs::write(side_file, &rendered)?;
        Err(DocumentError::RoundTrip {
            side_file: side_file.to_path_buf(),
            offset,
        })
    }

    /// Run every slide's animation hook once, in document order.
    ///
    /// Slides inserted by a hook are not animated themselves.
    pub fn animate(&mut self) -> Result<()> {
        let mut index = 0;
        while index < self.slides.len() {
            let slide = &mut self.slides[index];
            if !slide.animated {
                slide.animated = true;
                if let Some(hook) = slide.kind.animation().cloned() {
                    tracing::debug!(slide = %slide.name, index, "Animating slide");
                    hook(self, index)?;
                }
            }
            index += 1;
        }
        Ok(())
    }

    /// Insert a copy of slide `index` right after it.
    ///
    /// The copy keeps the header, with `title` and `subtitle` replaced when
    /// given, and holds only the split's step, if any. Returns the index of
    /// the new slide.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::SlideNotFound`] for an invalid index, or
    /// [`DocumentError::Modifier`] if the header has no `title` or
    /// `subtitle` field to replace.
    pub fn split_slide(&mut self, index: usize, split: Split) -> Result<usize> {
        let gap = self.config.slide_gap.clone();
        let Some(source) = self.slides.get_mut(index) else {
            return Err(DocumentError::SlideNotFound {
                name: format!("#{index}"),
            });
        };

        let mut header = source.header.copy();
        if let Some(title) = split.title {
            header.set("title", title)?;
        }
        if let Some(subtitle) = split.subtitle {
            header.set("subtitle", subtitle)?;
        }

        let fork = Slide {
            name_line: format!(" {}", split.name),
            name: split.name,
            header,
            steps: split.step.into_iter().collect(),
            gap: std::mem::replace(&mut source.gap, gap),
            kind: Arc::clone(&source.kind),
            animated: true,
        };
        tracing::debug!(from = %source.name, to = %fork.name, "Split slide");
        self.slides.insert(index + 1, fork);
        Ok(index + 1)
    }
}

fn first_difference(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .unwrap_or(a.len().min(b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_SLIDES: &str = "\\documentclass{beamer}\n\n\
        % SLIDE Title\n\\Step{Welcome}\n% ENDSLIDE\n\n\
        % SLIDE Clients\nheader\n\\Step[fragile]{a}\n% ENDSLIDE\n\\end{document}\n";

    fn generic() -> Document {
        Document::parse(TWO_SLIDES, &SectionRegistry::generic()).unwrap()
    }

    #[test]
    fn test_segments() {
        let doc = generic();
        assert_eq!(doc.head(), "\\documentclass{beamer}\n\n");
        assert_eq!(doc.tail(), "\n\\end{document}\n");
        let names: Vec<&str> = doc.slides().iter().map(Slide::name).collect();
        assert_eq!(names, vec!["Title", "Clients"]);

        let clients = doc.slide(1).unwrap();
        assert_eq!(clients.header().render(), "header\n");
        assert_eq!(clients.steps()[0].render(), "\\Step[fragile]{a}\n");
        assert_eq!(doc.slide(0).unwrap().header().render(), "");
    }

    #[test]
    fn test_unedited_render_is_identical() {
        assert_eq!(generic().render(), TWO_SLIDES);
    }

    #[test]
    fn test_no_slides() {
        let doc = Document::parse("just text", &SectionRegistry::generic()).unwrap();
        assert!(doc.slides().is_empty());
        assert_eq!(doc.render(), "just text");
    }

    #[test]
    fn test_malformed_slides() {
        let registry = SectionRegistry::generic();
        let err = Document::parse("% SLIDE A\n\\Step{x}", &registry).unwrap_err();
        assert!(matches!(err, DocumentError::MalformedSlide { index: 1, .. }));

        let err = Document::parse("% SLIDE A % ENDSLIDE", &registry).unwrap_err();
        assert!(matches!(err, DocumentError::MalformedSlide { .. }));

        let err = Document::parse("% SLIDE A\nno step\n% ENDSLIDE", &registry).unwrap_err();
        assert!(matches!(err, DocumentError::MissingStep { ref slide, .. } if slide == "A"));
    }

    #[test]
    fn test_unregistered_slide() {
        let err = Document::parse(TWO_SLIDES, &SectionRegistry::new()).unwrap_err();
        assert!(matches!(err, DocumentError::UnregisteredTag { ref tag } if tag == "Title"));
    }

    #[test]
    fn test_empty_markers_are_rejected() {
        let config = DocumentConfig::default().with_markers("", "% END");
        let err = Document::parse_with("x", &SectionRegistry::generic(), config).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidConfig { .. }));
    }

    #[test]
    fn test_steps_joined_by_separator() {
        let mut doc = generic();
        let slide = doc.slide_mut(0).unwrap();
        let stub = slide.pop_step().unwrap();
        slide.add_step(&stub);
        slide.add_step(&Node::constant("\\Step{Again}\n"));
        assert_eq!(
            doc.render(),
            TWO_SLIDES.replace(
                "\\Step{Welcome}\n% ENDSLIDE",
                "\\Step{Welcome}\n\n\\Step{Again}\n% ENDSLIDE"
            )
        );
    }

    #[test]
    fn test_add_step_records_a_copy() {
        let mut doc = generic();
        let slide = doc.slide_mut(1).unwrap();
        let mut stub = slide.pop_step().unwrap();
        slide.add_step(&stub);
        stub.hide();
        slide.add_step(&stub);
        assert_eq!(slide.steps()[0].render(), "\\Step[fragile]{a}\n");
        assert_eq!(slide.steps()[1].render(), "");
    }

    #[test]
    fn test_split_last_slide() {
        let mut doc = generic();
        let step = Node::constant("\\Step{b}\n");
        let index = doc
            .split_slide(1, Split::new("ClientsMore").with_step(&step))
            .unwrap();
        assert_eq!(index, 2);
        assert_eq!(
            doc.render(),
            "\\documentclass{beamer}\n\n\
             % SLIDE Title\n\\Step{Welcome}\n% ENDSLIDE\n\n\
             % SLIDE Clients\nheader\n\\Step[fragile]{a}\n% ENDSLIDE\n\n\
             % SLIDE ClientsMore\nheader\n\\Step{b}\n% ENDSLIDE\n\\end{document}\n"
        );
    }

    #[test]
    fn test_split_without_step() {
        let mut doc = generic();
        doc.split_slide(0, Split::new("Empty")).unwrap();
        let empty = doc.slide(1).unwrap();
        assert!(empty.steps().is_empty());
        assert_eq!(doc.slide(2).unwrap().name(), "Clients");
        assert!(doc.split_slide(9, Split::new("Nope")).is_err());
    }

    #[test]
    fn test_split_title_needs_header_field() {
        let mut doc = generic();
        let err = doc
            .split_slide(0, Split::new("Other").with_title("New"))
            .unwrap_err();
        assert!(matches!(err, DocumentError::Modifier(_)));
        assert_eq!(doc.slides().len(), 2);
    }

    #[test]
    fn test_round_trip_side_file() {
        let dir = tempfile::tempdir().unwrap();
        let side = dir.path().join("wrong_render");
        let doc = generic();
        doc.verify_round_trip(TWO_SLIDES, &side).unwrap();
        assert!(!side.exists());

        let changed = TWO_SLIDES.replace("Welcome", "Welcome!");
        let err = doc.verify_round_trip(&changed, &side).unwrap_err();
        let offset = TWO_SLIDES.find("Welcome").unwrap() + "Welcome".len();
        assert!(matches!(err, DocumentError::RoundTrip { offset: o, .. } if o == offset));
        assert_eq!(std::fs::read_to_string(&side).unwrap(), TWO_SLIDES);
    }

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference(b"abc", b"abd"), 2);
        assert_eq!(first_difference(b"ab", b"abc"), 2);
    }
}
