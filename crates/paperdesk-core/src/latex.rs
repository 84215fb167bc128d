//! Client-side LaTeX assembly for the preview renderer.
//!
//! Generated papers arrive as complete documents in whatever class the
//! model chose. Before rendering, the body is cut out of that document and
//! re-wrapped in the template for the selected style, so every preview
//! compiles against a known preamble.

use regex::Regex;
use std::sync::LazyLock;

use crate::generation::{GenerationInput, PaperStyle};

const IEEE_TEMPLATE: &str = r"\documentclass[10pt,conference]{IEEEtran}
\usepackage{graphicx}
\usepackage{tikz}
\usepackage{pgfplots}
\pgfplotsset{compat=1.18}
\begin{document}
\title{<<TITLE>>}
\author{<<AUTHOR>>}
\maketitle
<<CONTENT>>
<<IMAGES>>
\end{document}";

const ARXIV_TEMPLATE: &str = r"\documentclass{article}
\usepackage{graphicx}
\usepackage{tikz}
\usepackage{pgfplots}
\pgfplotsset{compat=1.18}
\begin{document}
\title{<<TITLE>>}
\author{<<AUTHOR>>}
\maketitle
<<CONTENT>>
<<IMAGES>>
\end{document}";

const SPRINGER_TEMPLATE: &str = r"\documentclass{svjour3}
\usepackage{graphicx}
\usepackage{tikz}
\usepackage{pgfplots}
\pgfplotsset{compat=1.18}
\begin{document}
\title{<<TITLE>>}
\author{<<AUTHOR>>}
\maketitle
<<CONTENT>>
<<IMAGES>>
\end{document}";

/// Illustrative ROC figure appended to every preview.
pub const FIGURE_BLOCK: &str = r"\begin{figure}[h]
\centering
\begin{tikzpicture}
\begin{axis}[
xlabel={False Positive Rate},
ylabel={True Positive Rate},
title={ROC Curve},
legend pos=south east,
width=0.8\linewidth,
height=6cm,
grid=major,
]
\addplot[color=blue, thick] coordinates {
(0,0) (0.1,0.6) (0.3,0.75) (0.5,0.85) (0.7,0.9) (1,1)
};
\addlegendentry{ResNet50}
\addplot[color=green, thick] coordinates {
(0,0) (0.1,0.7) (0.3,0.8) (0.5,0.9) (0.7,0.95) (1,1)
};
\addlegendentry{EfficientNetB0}
\addplot[dashed, color=black] coordinates {
(0,0) (1,1)
};
\addlegendentry{Random}
\end{axis}
\end{tikzpicture}
\caption{ROC Curve generated with TikZ/PGFPlots}
\label{fig:tikzroc}
\end{figure}";

/// Package that breaks compilation and is always removed.
const LEGACY_PACKAGE: &str = r"\usepackage{acm-ec-ecai}";

/// Package removed together with the bibliography directives.
const LEGACY_BIB_PACKAGE: &str = r"\usepackage{acm-ec-format}";

static FENCE_OPEN_LATEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^```latex\s*").expect("valid regex"));
static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```").expect("valid regex"));
static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```$").expect("valid regex"));

static BIB_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\bibliographystyle\{[^}]+\}").expect("valid regex"));
static BIB_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\bibliography\{[^}]+\}").expect("valid regex"));

static DOCUMENT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\documentclass(\[[^\]]*\])?\{[^}]+\}").expect("valid regex"));
static USE_PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\usepackage(\[[^\]]*\])?\{[^}]+\}").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\n").expect("valid regex"));

/// The template for a style, with `<<TOKEN>>` placeholders.
pub fn template_for(style: PaperStyle) -> &'static str {
    match style {
        PaperStyle::Ieee => IEEE_TEMPLATE,
        PaperStyle::Arxiv => ARXIV_TEMPLATE,
        PaperStyle::Springer => SPRINGER_TEMPLATE,
    }
}

/// Values substituted into a template. Absent fields become empty strings.
#[derive(Debug, Clone, Default)]
pub struct TemplateFields<'a> {
    pub title: Option<&'a str>,
    pub author: Option<&'a str>,
    pub institution: Option<&'a str>,
    pub city: Option<&'a str>,
    pub country: Option<&'a str>,
    pub email: Option<&'a str>,
    pub content: Option<&'a str>,
    pub images: Option<&'a str>,
}

/// Replace the first occurrence of each placeholder token.
pub fn fill_template(template: &str, fields: &TemplateFields<'_>) -> String {
    let substitutions = [
        ("<<TITLE>>", fields.title),
        ("<<AUTHOR>>", fields.author),
        ("<<INSTITUTION>>", fields.institution),
        ("<<CITY>>", fields.city),
        ("<<COUNTRY>>", fields.country),
        ("<<EMAIL>>", fields.email),
        ("<<CONTENT>>", fields.content),
        ("<<IMAGES>>", fields.images),
    ];

    substitutions
        .iter()
        .fold(template.to_string(), |acc, (token, value)| {
            acc.replacen(token, value.unwrap_or(""), 1)
        })
}

/// Remove markdown code-fence markers wrapping model output.
pub fn strip_code_fences(latex: &str) -> String {
    let s = FENCE_OPEN_LATEX.replace(latex, "");
    let s = FENCE_OPEN.replace(&s, "");
    let s = FENCE_CLOSE.replace(&s, "");
    s.trim().to_string()
}

/// Drop the package that never compiles on the render host.
pub fn remove_legacy_packages(latex: &str) -> String {
    latex.replace(LEGACY_PACKAGE, "")
}

/// Drop bibliography directives. Used when no bibliography file accompanies the paper.
pub fn strip_bibliography(latex: &str) -> String {
    let s = BIB_STYLE.replace_all(latex, "");
    let s = BIB_FILE.replace_all(&s, "");
    s.replace(LEGACY_BIB_PACKAGE, "")
}

/// Reduce a full document to body-only content.
///
/// Removes `\documentclass`, `\usepackage`, `\maketitle` and the
/// `document` environment markers, then blank lines. Applying it to its
/// own output changes nothing.
pub fn strip_preamble(latex: &str) -> String {
    let s = DOCUMENT_CLASS.replace_all(latex, "");
    let s = USE_PACKAGE.replace_all(&s, "");
    let s = s
        .replace(r"\maketitle", "")
        .replace(r"\begin{document}", "")
        .replace(r"\end{document}", "");
    BLANK_LINES.replace_all(&s, "").trim().to_string()
}

/// Build the document sent to the render endpoint.
///
/// `bibliography` is the content of an accompanying `.bib` file; when it is
/// `None` every bibliography directive is stripped so the render does not
/// fail on a missing file.
pub fn assemble_preview(
    input: &GenerationInput,
    paper: &str,
    bibliography: Option<&str>,
) -> String {
    let content = strip_preamble(&strip_code_fences(paper));
    let filled = fill_template(
        template_for(input.style),
        &TemplateFields {
            title: Some(&input.topic),
            author: Some(&input.research_question),
            institution: Some(&input.institution),
            city: Some(&input.city),
            country: Some(&input.country),
            email: Some(&input.email),
            content: Some(&content),
            images: Some(FIGURE_BLOCK),
        },
    );

    let filled = match bibliography {
        Some(_) => filled,
        None => strip_bibliography(&filled),
    };
    remove_legacy_packages(&filled)
}
