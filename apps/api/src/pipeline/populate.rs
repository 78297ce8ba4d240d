//! Template population — walks the styled template's paragraphs and decides
//! which run texts to replace with segmented content.

use crate::docx::{DocxFile, RunEdit};
use crate::pipeline::sections::{Section, SectionMap};

/// Produces the run-text substitutions that fill `template` with the content
/// of `sections`.
///
/// Paragraphs are walked in order. A paragraph whose text contains a section
/// title becomes the current section and keeps its template text. Every
/// following paragraph receives the section's next unconsumed content line
/// in its first non-empty run (at most one substitution per paragraph) until
/// the section runs out of content or another header takes over. Consumption
/// is tracked with per-section cursors, so `sections` itself is never
/// mutated and re-entering a section's region resumes where it left off.
pub fn populate(template: &DocxFile, sections: &SectionMap) -> Vec<RunEdit> {
    let mut edits = Vec::new();
    let mut cursors = [0usize; Section::ALL.len()];
    let mut current: Option<Section> = None;

    for (index, paragraph) in template.paragraphs().iter().enumerate() {
        let upper = paragraph.text().trim().to_uppercase();
        if let Some(section) = Section::match_header(&upper) {
            current = Some(section);
            continue;
        }

        let Some(section) = current else { continue };
        let content = sections.lines(section);
        let cursor = &mut cursors[section as usize];
        if *cursor >= content.len() {
            // Section exhausted: the paragraph keeps its template text.
            continue;
        }
        if let Some(run) = paragraph
            .runs
            .iter()
            .position(|r| !r.text.trim().is_empty())
        {
            edits.push(RunEdit {
                paragraph: index,
                run,
                text: content[*cursor].clone(),
            });
            *cursor += 1;
        }
    }

    edits
}
