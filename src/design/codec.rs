//! Markdown codec for [`TaskDesignDocument`].
//!
//! [`parse`] is the left inverse of [`format`]: parsing a formatted document
//! yields the same overview, architecture, components, decisions, ADR links
//! and requirements, in the same order.
//!
//! Parsing works in two passes. The text is first split into `(header, body)`
//! sections on `## ` lines outside a section's leading code fence; each
//! section body then goes through a typed extractor (component list,
//! decision table, bullet list).

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use super::{
    ComponentDescription, TaskDesignDocument, TechnicalDecision, DEFAULT_ARCHITECTURE,
    OVERVIEW_PLACEHOLDER,
};

const TITLE_PREFIX: &str = "Technical Design:";
const LAST_UPDATED_LABEL: &str = "**Last Updated:**";
const TASK_LABEL: &str = "**Task:**";
const PURPOSE_LABEL: &str = "**Purpose:**";
const INTERFACES_LABEL: &str = "**Interfaces:**";
const DEPENDENCIES_LABEL: &str = "**Dependencies:**";
const EMPTY_LIST: &str = "_None recorded._";
const DATE_FORMAT: &str = "%Y-%m-%d";
/// Appended to the Source cell of decisions flagged as ADR candidates.
const ADR_CANDIDATE_MARKER: &str = "(ADR candidate)";

/// Overview section header.
pub const OVERVIEW: &str = "Overview";
/// Architecture section header.
pub const ARCHITECTURE: &str = "Architecture";
/// Components section header.
pub const COMPONENTS: &str = "Components";
/// Technical decisions section header.
pub const TECHNICAL_DECISIONS: &str = "Technical Decisions";
/// Related ADRs section header.
pub const RELATED_ADRS: &str = "Related ADRs";
/// Stakeholder requirements section header.
pub const STAKEHOLDER_REQUIREMENTS: &str = "Stakeholder Requirements";

/// Renders a design document as markdown.
#[must_use]
pub fn format(doc: &TaskDesignDocument) -> String {
    let title = if doc.title.trim().is_empty() {
        &doc.task_id
    } else {
        &doc.title
    };

    let mut lines = Vec::new();
    lines.push(format!("# {TITLE_PREFIX} {}", single_line(title)));
    lines.push(String::new());
    lines.push(format!("{TASK_LABEL} {}", doc.task_id));
    if let Some(updated) = doc.last_updated {
        lines.push(format!(
            "{LAST_UPDATED_LABEL} {}",
            updated.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
    lines.push(String::new());

    push_header(&mut lines, OVERVIEW);
    if doc.overview.trim().is_empty() {
        lines.push(OVERVIEW_PLACEHOLDER.to_string());
    } else {
        lines.push(doc.overview.clone());
    }
    lines.push(String::new());

    push_header(&mut lines, ARCHITECTURE);
    lines.push("```mermaid".to_string());
    if doc.architecture.trim().is_empty() {
        lines.push(DEFAULT_ARCHITECTURE.to_string());
    } else {
        lines.push(doc.architecture.clone());
    }
    lines.push("```".to_string());
    lines.push(String::new());

    push_header(&mut lines, COMPONENTS);
    if doc.components.is_empty() {
        lines.push(EMPTY_LIST.to_string());
        lines.push(String::new());
    }
    for component in &doc.components {
        lines.push(format!("### {}", single_line(&component.name)));
        lines.push(String::new());
        lines.push(format!("- {PURPOSE_LABEL} {}", single_line(&component.purpose)));
        if !component.interfaces.is_empty() {
            lines.push(format!("- {INTERFACES_LABEL} {}", join_list(&component.interfaces)));
        }
        if !component.dependencies.is_empty() {
            lines.push(format!("- {DEPENDENCIES_LABEL} {}", join_list(&component.dependencies)));
        }
        lines.push(String::new());
    }

    push_header(&mut lines, TECHNICAL_DECISIONS);
    lines.push("| Decision | Rationale | Source | Date |".to_string());
    lines.push("|----------|-----------|--------|------|".to_string());
    for decision in &doc.technical_decisions {
        let date = decision.date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default();
        lines.push(format!(
            "| {} | {} | {} | {} |",
            escape_cell(&decision.decision),
            escape_cell(&decision.rationale),
            source_cell(decision),
            date
        ));
    }
    lines.push(String::new());

    push_header(&mut lines, RELATED_ADRS);
    push_bullets(&mut lines, &doc.related_adrs);
    lines.push(String::new());

    push_header(&mut lines, STAKEHOLDER_REQUIREMENTS);
    push_bullets(&mut lines, &doc.stakeholder_requirements);

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Parses markdown produced by [`format`] (or a hand-edited variant of it).
///
/// `task_id` is authoritative; the `**Task:**` line is not read back.
/// Missing sections yield empty values. Malformed table rows are skipped and
/// unparsable dates become `None`; parsing never fails.
#[must_use]
pub fn parse(task_id: &str, text: &str) -> TaskDesignDocument {
    let (preamble, sections) = split_sections(text);

    TaskDesignDocument {
        task_id: task_id.to_string(),
        title: parse_title(&preamble).unwrap_or_else(|| task_id.to_string()),
        overview: section_body(&sections, OVERVIEW).to_string(),
        architecture: strip_fence(section_body(&sections, ARCHITECTURE)),
        components: parse_components(section_body(&sections, COMPONENTS)),
        technical_decisions: parse_decisions(section_body(&sections, TECHNICAL_DECISIONS)),
        related_adrs: parse_bullets(section_body(&sections, RELATED_ADRS)),
        stakeholder_requirements: parse_bullets(section_body(
            &sections,
            STAKEHOLDER_REQUIREMENTS,
        )),
        last_updated: parse_last_updated(&preamble),
    }
}

/// A `## ` section: its header text and trimmed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Header text after `## `.
    pub header: String,
    /// Body up to the next `## ` header or end of text, trimmed.
    pub body: String,
}

/// Splits markdown into the text before the first `## ` header and the sections after it.
///
/// Every `## ` line starts a section, except inside a fenced block that opens
/// a section body and is closed by a bare fence line. Fences anywhere else
/// are ordinary body text, so an unbalanced fence in prose cannot swallow the
/// sections after it.
#[must_use]
pub fn split_sections(text: &str) -> (String, Vec<Section>) {
    let lines: Vec<&str> = text.lines().collect();
    let mut preamble: Vec<&str> = Vec::new();
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
    let mut fence_end: Option<usize> = None;
    let mut body_started = false;

    for (index, line) in lines.iter().copied().enumerate() {
        let inside_fence = fence_end.is_some_and(|end| index <= end);
        if !inside_fence {
            if let Some(header) = line.strip_prefix("## ") {
                sections.push((header.trim().to_string(), Vec::new()));
                body_started = false;
                continue;
            }
            if !sections.is_empty() && !body_started && !line.trim().is_empty() {
                body_started = true;
                if line.trim_start().starts_with("```") {
                    fence_end = closing_fence(&lines, index);
                }
            }
        }
        match sections.last_mut() {
            Some((_, body)) => body.push(line),
            None => preamble.push(line),
        }
    }

    let sections = sections
        .into_iter()
        .map(|(header, body)| Section {
            header,
            body: body.join("\n").trim().to_string(),
        })
        .collect();
    (preamble.join("\n"), sections)
}

/// Index of the bare fence closing the block opened at `open`.
///
/// An info-string fence (` ```mermaid `) met first means the block was never
/// closed.
fn closing_fence(lines: &[&str], open: usize) -> Option<usize> {
    let offset = lines[open + 1..]
        .iter()
        .position(|l| l.trim_start().starts_with("```"))?;
    let close = open + 1 + offset;
    (lines[close].trim() == "```").then_some(close)
}

fn section_body<'a>(sections: &'a [Section], name: &str) -> &'a str {
    sections
        .iter()
        .find(|s| s.header.eq_ignore_ascii_case(name))
        .map_or("", |s| s.body.as_str())
}

fn parse_title(preamble: &str) -> Option<String> {
    preamble.lines().find_map(|line| {
        let rest = line.strip_prefix("# ")?;
        let rest = rest.trim();
        let title = rest.strip_prefix(TITLE_PREFIX).unwrap_or(rest).trim();
        (!title.is_empty()).then(|| title.to_string())
    })
}

fn parse_last_updated(preamble: &str) -> Option<DateTime<Utc>> {
    preamble.lines().find_map(|line| {
        let value = line.trim().strip_prefix(LAST_UPDATED_LABEL)?;
        DateTime::parse_from_rfc3339(value.trim()).ok().map(|dt| dt.with_timezone(&Utc))
    })
}

/// Removes a surrounding code fence, keeping the inner text's indentation.
fn strip_fence(body: &str) -> String {
    let mut lines: Vec<&str> = body.lines().collect();
    if lines.first().is_some_and(|l| l.trim_start().starts_with("```")) {
        lines.remove(0);
        if lines.last().is_some_and(|l| l.trim() == "```") {
            lines.pop();
        }
    }
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    lines.join("\n").trim_end().to_string()
}

fn parse_components(body: &str) -> Vec<ComponentDescription> {
    let mut components: Vec<ComponentDescription> = Vec::new();

    for line in body.lines() {
        if let Some(name) = line.strip_prefix("### ") {
            components.push(ComponentDescription {
                name: name.trim().to_string(),
                ..Default::default()
            });
            continue;
        }
        let Some(component) = components.last_mut() else {
            continue;
        };
        let item = strip_bullet(line.trim()).unwrap_or_else(|| line.trim());
        if let Some(purpose) = item.strip_prefix(PURPOSE_LABEL) {
            component.purpose = purpose.trim().to_string();
        } else if let Some(interfaces) = item.strip_prefix(INTERFACES_LABEL) {
            component.interfaces = split_list(interfaces);
        } else if let Some(dependencies) = item.strip_prefix(DEPENDENCIES_LABEL) {
            component.dependencies = split_list(dependencies);
        }
    }

    components
}

/// Parses the decisions table.
///
/// The first table row is the header. Separator rows, rows with fewer than
/// four cells, and rows with a blank decision are skipped.
fn parse_decisions(body: &str) -> Vec<TechnicalDecision> {
    let mut decisions = Vec::new();
    let mut header_seen = false;

    for line in body.lines() {
        let line = line.trim();
        if !line.starts_with('|') {
            continue;
        }
        let cells = split_row(line);
        if !header_seen {
            header_seen = true;
            continue;
        }
        if is_separator(&cells) || cells.len() < 4 || cells[0].is_empty() {
            continue;
        }
        let (source, adr_candidate) = match cells[2].strip_suffix(ADR_CANDIDATE_MARKER) {
            Some(rest) => (rest.trim_end().to_string(), true),
            None => (cells[2].clone(), false),
        };
        decisions.push(TechnicalDecision {
            decision: cells[0].clone(),
            rationale: cells[1].clone(),
            source,
            date: NaiveDate::parse_from_str(&cells[3], DATE_FORMAT).ok(),
            adr_candidate,
        });
    }

    decisions
}

fn source_cell(decision: &TechnicalDecision) -> String {
    let source = escape_cell(&decision.source);
    match (decision.adr_candidate, source.is_empty()) {
        (false, _) => source,
        (true, true) => ADR_CANDIDATE_MARKER.to_string(),
        (true, false) => format!("{source} {ADR_CANDIDATE_MARKER}"),
    }
}

/// Splits a table row into trimmed cells, honouring `\|` escapes.
fn split_row(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }
    cells
}

fn is_separator(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|cell| {
            !cell.is_empty() && cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
        })
}

fn parse_bullets(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| strip_bullet(line.trim()))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_bullet(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

fn join_list(items: &[String]) -> String {
    items.iter().map(|item| single_line(item)).collect::<Vec<_>>().join(", ")
}

fn push_header(lines: &mut Vec<String>, header: &str) {
    lines.push(format!("## {header}"));
    lines.push(String::new());
}

fn push_bullets(lines: &mut Vec<String>, items: &[String]) {
    if items.is_empty() {
        lines.push(EMPTY_LIST.to_string());
    }
    for item in items {
        lines.push(format!("- {}", single_line(item)));
    }
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

fn escape_cell(value: &str) -> String {
    single_line(value).replace('|', "\\|")
}
