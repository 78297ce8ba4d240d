//! Section segmentation — classifies extracted résumé text into the fixed
//! section set by keyword-header matching.

/// The résumé sections the output template knows about. Declaration order is
/// load-bearing: when a line matches more than one section title, the first
/// declared match wins, and `SectionMap` iterates in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    PersonalInformation,
    Education,
    Experience,
    Leadership,
    SkillsActivitiesInterests,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::PersonalInformation,
        Section::Education,
        Section::Experience,
        Section::Leadership,
        Section::SkillsActivitiesInterests,
    ];

    /// Header title exactly as it appears in the output template.
    pub fn title(self) -> &'static str {
        match self {
            Section::PersonalInformation => "PERSONAL INFORMATION",
            Section::Education => "EDUCATION",
            Section::Experience => "EXPERIENCE",
            Section::Leadership => "LEADERSHIP AND PROFESSIONAL DEVELOPMENT",
            Section::SkillsActivitiesInterests => "SKILLS, ACTIVITIES & INTERESTS",
        }
    }

    /// First section whose title occurs in the upper-cased line, if any.
    /// A line can mention several titles; declaration order decides.
    pub fn match_header(upper_line: &str) -> Option<Section> {
        Section::ALL
            .into_iter()
            .find(|section| upper_line.contains(section.title()))
    }
}

/// Ordered mapping from section to its content lines. All five sections are
/// always present (possibly empty). Built once per request by `segment` and
/// read-only afterwards; the populator tracks its own consumption cursors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    lines: [Vec<String>; 5],
}

impl SectionMap {
    pub fn lines(&self, section: Section) -> &[String] {
        &self.lines[section as usize]
    }

    fn push(&mut self, section: Section, line: &str) {
        self.lines[section as usize].push(line.to_string());
    }

    /// Sections with their content, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &[String])> {
        Section::ALL.into_iter().map(move |s| (s, self.lines(s)))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(Vec::is_empty)
    }
}

/// Splits `text` into lines and assigns each to the section whose header most
/// recently preceded it.
///
/// A line containing any section title (case-insensitively, as a substring)
/// is a header: it switches the current section and is consumed entirely,
/// trailing free text included. Empty lines are dropped, as are lines seen
/// before the first header. Content lines keep their original case, trimmed.
pub fn segment(text: &str) -> SectionMap {
    let mut map = SectionMap::default();
    let mut current: Option<Section> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(section) = Section::match_header(&line.to_uppercase()) {
            current = Some(section);
            continue;
        }
        if let Some(section) = current {
            map.push(section, line);
        }
    }

    map
}
