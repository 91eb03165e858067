/*
 * selection.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Restricting a document to some of its steps.
//!
//! Step indices count from 1. A selection either names a slide and counts
//! relative to it, or counts absolutely across the whole document.

use std::fmt;
use std::ops::Range;

use crate::document::Document;
use crate::error::{DocumentError, Result};

/// Upper bound of a step range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStop {
    /// Up to the last step.
    End,
    /// Up to this step, included.
    At(usize),
}

/// Which steps to render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every step of every slide.
    #[default]
    All,
    /// Steps of the first slide whose name contains `name`.
    ///
    /// Without `start`, every step of that slide. With `start` only, that
    /// single step.
    Slide {
        name: String,
        start: Option<usize>,
        stop: Option<StepStop>,
    },
    /// Steps counted across the whole document. Without `stop`, only
    /// `start`.
    Absolute {
        start: usize,
        stop: Option<StepStop>,
    },
}

impl Selection {
    /// Build a selection from command-line style arguments.
    ///
    /// A numeric `slide` selects absolute steps, with `start` then read as
    /// the stop index. A stop of `-1` means the last step.
    pub fn from_args(slide: Option<&str>, start: Option<i64>, stop: Option<i64>) -> Result<Self> {
        let Some(slide) = slide else {
            return Ok(Selection::All);
        };
        if let Ok(first) = slide.parse::<i64>() {
            return Ok(Selection::Absolute {
                start: to_index(first)?,
                stop: start.map(to_stop).transpose()?,
            });
        }
        Ok(Selection::Slide {
            name: slide.to_string(),
            start: start.map(to_index).transpose()?,
            stop: stop.map(to_stop).transpose()?,
        })
    }
}

fn to_index(value: i64) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .filter(|&index| index > 0)
        .ok_or(DocumentError::InvalidStepIndex { value })
}

fn to_stop(value: i64) -> Result<StepStop> {
    if value == -1 {
        Ok(StepStop::End)
    } else {
        to_index(value).map(StepStop::At)
    }
}

/// The `(slide, step)` pairs a selection rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepSummary {
    entries: Vec<(String, usize)>,
}

impl StepSummary {
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, slide: &str, step: usize) {
        self.entries.push((slide.to_string(), step));
    }
}

/// One line per run of a slide, consecutive steps shortened to `a-b`:
///
/// ```text
///   Title: 1
///   Clients: 2-4 6
/// ```
impl fmt::Display for StepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut runs = self.entries.chunk_by(|a, b| a.0 == b.0).peekable();
        while let Some(run) = runs.next() {
            write!(f, "  {}:", run[0].0)?;
            let steps: Vec<usize> = run.iter().map(|(_, step)| *step).collect();
            for range in steps.chunk_by(|a, b| b.checked_sub(*a) == Some(1)) {
                match range {
                    [single] => write!(f, " {single}")?,
                    [first, .., last] => write!(f, " {first}-{last}")?,
                    [] => {}
                }
            }
            if runs.peek().is_some() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Zero-based range for `start..=stop`, checked against `count`.
fn resolve(start: usize, stop: Option<StepStop>, count: usize) -> Result<Range<usize>> {
    if start == 0 || start > count {
        return Err(DocumentError::StepOutOfRange {
            index: start,
            count,
        });
    }
    let end = match stop {
        None => start,
        Some(StepStop::End) => count,
        Some(StepStop::At(stop)) if stop >= start && stop <= count => stop,
        Some(StepStop::At(stop)) => {
            return Err(DocumentError::StepOutOfRange { index: stop, count });
        }
    };
    Ok(start - 1..end)
}

impl Document {
    /// A copy of this document holding only the selected steps, and the
    /// list of steps it holds.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::SlideNotFound`] if no slide name matches, or
    /// [`DocumentError::StepOutOfRange`] for indices outside the slide or
    /// the document.
    pub fn select(&self, selection: &Selection) -> Result<(Document, StepSummary)> {
        let mut restricted = self.clone();
        let mut summary = StepSummary::default();

        match selection {
            Selection::All => {
                let mut absolute = 0;
                for slide in restricted.slides() {
                    for _ in slide.steps() {
                        absolute += 1;
                        summary.push(slide.name(), absolute);
                    }
                }
            }
            Selection::Slide { name, start, stop } => {
                let Some(index) = self.find_slide(name) else {
                    return Err(DocumentError::SlideNotFound { name: name.clone() });
                };
                let slides = restricted.slides_mut();
                let mut slide = slides.swap_remove(index);
                slides.clear();

                let count = slide.steps().len();
                let range = match start {
                    None => 0..count,
                    Some(start) => resolve(*start, *stop, count)?,
                };
                let steps: Vec<_> = slide.steps_mut().drain(range.clone()).collect();
                *slide.steps_mut() = steps;
                for step in range {
                    summary.push(slide.name(), step + 1);
                }
                slides.push(slide);
            }
            Selection::Absolute { start, stop } => {
                let range = resolve(*start, *stop, self.step_count())?;
                let mut absolute = 0;
                for slide in restricted.slides_mut() {
                    let steps = std::mem::take(slide.steps_mut());
                    for step in steps {
                        if range.contains(&absolute) {
                            summary.push(slide.name(), absolute + 1);
                            slide.steps_mut().push(step);
                        }
                        absolute += 1;
                    }
                }
            }
        }

        tracing::debug!(steps = summary.len(), "Selected steps");
        Ok((restricted, summary))
    }
}
