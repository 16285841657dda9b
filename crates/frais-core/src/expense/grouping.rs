//! Grouping of pages into per-agent record groups.

use tracing::{debug, trace};

use super::rules::names::extract_name;
use crate::pdf::PdfPage;

/// Pages attributed to one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentGroup {
    /// Agent name found on the pages, or the default label.
    pub key: String,
    /// Pages in document order.
    pub pages: Vec<PdfPage>,
}

impl AgentGroup {
    /// Page numbers of the group.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p.number).collect()
    }

    /// The first page of the group.
    pub fn first_page(&self) -> Option<&PdfPage> {
        self.pages.first()
    }
}

/// Group key the naming rule assigns to a page.
pub fn page_key(text: &str, default_key: &str) -> String {
    extract_name(text).unwrap_or_else(|| default_key.to_string())
}

/// Group pages by the agent name found on each page.
///
/// Groups are returned in the order their key is first seen. Pages that
/// carry no name go to the `default_key` group. Pages sharing a key are
/// merged even when they are not contiguous.
pub fn group_agents(pages: Vec<PdfPage>, default_key: &str) -> Vec<AgentGroup> {
    let mut groups: Vec<AgentGroup> = Vec::new();

    for page in pages {
        let key = page_key(&page.text, default_key);
        trace!("Page {} -> {}", page.number, key);

        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.pages.push(page),
            None => groups.push(AgentGroup {
                key,
                pages: vec![page],
            }),
        }
    }

    debug!("Grouped pages into {} agent groups", groups.len());
    groups
}
