// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-file HTML report with inline SVG.

use crate::svg::escape_xml;

/// One rendered state of a view.
#[derive(Debug)]
pub(crate) struct HtmlFrame {
    pub(crate) caption: String,
    pub(crate) svg: String,
}

/// One view: a heading plus its rendered states.
#[derive(Debug)]
pub(crate) struct HtmlSection {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) frames: Vec<HtmlFrame>,
}

const STYLE: &str = "body { font-family: sans-serif; margin: 24px; color: #222; }
section { margin-bottom: 48px; }
figure { display: inline-block; margin: 0 16px 16px 0; vertical-align: top; }
figcaption { font-size: 13px; color: #555; margin-top: 4px; }
svg { border: 1px solid #eee; background: #fff; }";

pub(crate) fn render_report(title: &str, sections: &[HtmlSection]) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_xml(title)));
    out.push_str(&format!("<style>\n{STYLE}\n</style>\n</head>\n<body>\n"));
    out.push_str(&format!("<h1>{}</h1>\n", escape_xml(title)));
    for section in sections {
        out.push_str("<section>\n");
        out.push_str(&format!("<h2>{}</h2>\n", escape_xml(&section.title)));
        if !section.description.is_empty() {
            out.push_str(&format!("<p>{}</p>\n", escape_xml(&section.description)));
        }
        for frame in &section.frames {
            out.push_str("<figure>\n");
            out.push_str(&frame.svg);
            out.push_str(&format!(
                "<figcaption>{}</figcaption>\n</figure>\n",
                escape_xml(&frame.caption)
            ));
        }
        out.push_str("</section>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}
