use crate::error::{KuusiError, KuusiResult};

/// The year-end dataset shipped with the binary, one record per line.
///
/// Tab-separated columns: group, member, word count, title, optional review.
pub const EMBEDDED_RECORDS: &str = include_str!("../data/records.tsv");

/// One member's reading entry. Immutable once parsed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReadingRecord {
    pub group_id: String,
    pub member: String,
    pub word_count: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

/// A named cluster of records rendered as one tree.
///
/// Derived from the record collection, never persisted; `records` keeps the
/// input order, layout ordering is applied separately by
/// [`sorted_titles`](TreeGroup::sorted_titles).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TreeGroup {
    pub id: String,
    pub records: Vec<ReadingRecord>,
}

impl TreeGroup {
    /// Titles ordered ascending by character count, so the centered stack
    /// naturally forms a triangular silhouette.
    ///
    /// Returned titles are raw; the scene layer applies [`display_title`]
    /// when it draws the rows.
    pub fn sorted_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self.records.iter().map(|r| r.title.clone()).collect();
        titles.sort_by_key(|t| t.chars().count());
        titles
    }
}

/// Parse the tab-separated dataset into records.
///
/// Blank lines and `#` comment lines are skipped. The review column may be
/// absent or empty.
pub fn parse_records(input: &str) -> KuusiResult<Vec<ReadingRecord>> {
    let mut records = Vec::new();
    for (lineno, line) in input.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let mut cols = line.split('\t');
        let (Some(group_id), Some(member), Some(word_count), Some(title)) =
            (cols.next(), cols.next(), cols.next(), cols.next())
        else {
            return Err(KuusiError::data(format!(
                "line {}: expected at least 4 tab-separated columns",
                lineno + 1
            )));
        };
        if title.trim().is_empty() {
            return Err(KuusiError::data(format!(
                "line {}: title must be non-empty",
                lineno + 1
            )));
        }
        let word_count: u64 = word_count.trim().parse().map_err(|_| {
            KuusiError::data(format!(
                "line {}: invalid word count '{}'",
                lineno + 1,
                word_count
            ))
        })?;
        let review = cols.next().map(str::trim).filter(|r| !r.is_empty());
        records.push(ReadingRecord {
            group_id: group_id.trim().to_string(),
            member: member.trim().to_string(),
            word_count,
            title: title.trim().to_string(),
            review: review.map(str::to_string),
        });
    }
    Ok(records)
}

/// Partition records into groups by `group_id`, preserving first-seen group
/// order and record order within each group.
pub fn group_records(records: &[ReadingRecord]) -> Vec<TreeGroup> {
    let mut groups: Vec<TreeGroup> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|g| g.id == record.group_id) {
            Some(group) => group.records.push(record.clone()),
            None => groups.push(TreeGroup {
                id: record.group_id.clone(),
                records: vec![record.clone()],
            }),
        }
    }
    groups
}

/// Wrap a title in `《…》` unless it already carries the brackets.
pub fn display_title(title: &str) -> String {
    let clean = title.trim();
    if clean.starts_with('《') && clean.ends_with('》') {
        clean.to_string()
    } else {
        format!("《{clean}》")
    }
}
