/*
 * header.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The standard slide header: title, subtitle and page number macros.

use texstep_core::{PatternBuilder, SharedBuilder};

use crate::error::Result;

/// Template of the standard header. `<tail>` keeps whatever follows the
/// page number, up to the step command.
pub const HEADER_TEMPLATE: &str = "\\renewcommand{\\TitleText}{<title>}\n\
     \\renewcommand{\\SubTitleText}{<subtitle>}\n\
     \\renewcommand{\\PageNumText}{<page>}<tail>";

/// Header builder exposing `title`, `subtitle`, `page` and `tail` fields.
pub fn standard_header() -> Result<SharedBuilder> {
    Ok(PatternBuilder::compile(HEADER_TEMPLATE)?.shared())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use texstep_core::Args;

    const HEADER: &str = "\\renewcommand{\\TitleText}{Git}\n\
        \\renewcommand{\\SubTitleText}{Clients}\n\
        \\renewcommand{\\PageNumText}{3}\n";

    #[test]
    fn test_parse_header() {
        let header = standard_header().unwrap().parse(HEADER).unwrap();
        assert_eq!(header.text("title"), Some("Git"));
        assert_eq!(header.text("subtitle"), Some("Clients"));
        assert_eq!(header.text("page"), Some("3"));
        assert_eq!(header.text("tail"), Some("\n"));
        assert_eq!(header.render(), HEADER);
    }

    #[test]
    fn test_build_header() {
        let header = standard_header()
            .unwrap()
            .build(&Args::from(["Title", "Sub", "1", ""]))
            .unwrap();
        assert_eq!(
            header.render(),
            "\\renewcommand{\\TitleText}{Title}\n\
             \\renewcommand{\\SubTitleText}{Sub}\n\
             \\renewcommand{\\PageNumText}{1}"
        );
    }
}
