use crate::error::Result;
use crate::tavily::SearchResult;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl ResponseFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}

pub fn format(result: &SearchResult, mode: ResponseFormat) -> Result<String> {
    match mode {
        ResponseFormat::Text => Ok(text(result)),
        ResponseFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        ResponseFormat::Markdown => Ok(markdown(result)),
    }
}

// `write!` into a String is infallible.
fn text(result: &SearchResult) -> String {
    let mut out = format!("Search Results for \"{}\":\n\n", result.query);

    if let Some(answer) = &result.answer {
        let _ = write!(out, "Summary: {answer}\n\n");
    }

    let blocks: Vec<String> = result
        .results
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let mut block = format!("{}. {}\n   URL: {}\n", i + 1, hit.title, hit.url);
            if let Some(date) = &hit.published_date {
                let _ = writeln!(block, "   Published: {date}");
            }
            let _ = write!(block, "   Content: {}", hit.content);
            block
        })
        .collect();
    out.push_str(&blocks.join("\n\n"));

    if let Some(images) = result.images.as_ref().filter(|i| !i.is_empty()) {
        out.push_str("\n\nImages:");
        for (i, image) in images.iter().enumerate() {
            let _ = write!(out, "\n{}. {}", i + 1, image.url());
            if let Some(desc) = image.description() {
                let _ = write!(out, " - {desc}");
            }
        }
    }

    out.trim_end().to_string()
}

fn markdown(result: &SearchResult) -> String {
    let mut out = format!("# Search Results: {}\n\n", result.query);

    if let Some(answer) = &result.answer {
        let _ = write!(out, "## Summary\n\n{answer}\n\n");
    }

    let sections: Vec<String> = result
        .results
        .iter()
        .map(|hit| {
            let mut section = format!("### {}\n\n[{}]({})\n\n", hit.title, hit.url, hit.url);
            if let Some(date) = &hit.published_date {
                let _ = write!(section, "*Published: {date}*\n\n");
            }
            section.push_str(&hit.content);
            section
        })
        .collect();
    out.push_str(&sections.join("\n\n---\n\n"));

    if let Some(images) = result.images.as_ref().filter(|i| !i.is_empty()) {
        out.push_str("\n\n## Images\n");
        for image in images {
            match image.description() {
                Some(desc) => {
                    let _ = write!(out, "\n- ![{desc}]({})", image.url());
                }
                None => {
                    let _ = write!(out, "\n- ![]({})", image.url());
                }
            }
        }
    }

    out.trim_end().to_string()
}
