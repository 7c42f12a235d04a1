use std::collections::{HashMap, HashSet};

use serde::Serialize;

use silver_halide_records::GalleryRecord;

pub type GalleryId = String;

/// A gallery with its place in the hierarchy resolved. `children` is derived
/// by [`build_tree`] and never comes from the backend.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Gallery {
    pub id: GalleryId,
    pub collection_id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub parent: Option<GalleryId>,
    pub children: Vec<Gallery>,
}

impl From<GalleryRecord> for Gallery {
    fn from(record: GalleryRecord) -> Self {
        let parent = record.parent_id().map(str::to_string);
        let cover_image = record.cover_image().map(str::to_string);

        Gallery {
            id: record.id,
            collection_id: record.collection_id,
            name: record.name,
            slug: record.slug,
            description: match record.description.as_str() {
                "" => None,
                description => Some(description.to_string()),
            },
            cover_image,
            parent,
            children: Vec::new(),
        }
    }
}

/// Builds a forest out of a flat gallery collection.
///
/// A gallery whose parent id is missing from the input is promoted to a root.
/// Child order follows input order and is not re-sorted. Galleries trapped in
/// a parent cycle are unreachable from any root and are dropped from the
/// result; the backend admin UI cannot produce such data, so this is not
/// treated as an error.
pub fn build_tree(records: Vec<GalleryRecord>) -> Vec<Gallery> {
    let known_ids: HashSet<&str> = records.iter().map(|record| record.id.as_str()).collect();

    let mut roots = Vec::new();
    let mut children_of: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        match record.parent_id() {
            Some(parent) if known_ids.contains(parent) => {
                children_of.entry(parent).or_default().push(index);
            },
            _ => roots.push(index),
        }
    }

    fn assemble(
        index: usize,
        records: &[GalleryRecord],
        children_of: &HashMap<&str, Vec<usize>>,
    ) -> Gallery {
        let mut node = Gallery::from(records[index].clone());
        if let Some(child_indices) = children_of.get(records[index].id.as_str()) {
            node.children = child_indices
                .iter()
                .map(|&child| assemble(child, records, children_of))
                .collect();
        }
        node
    }

    roots
        .into_iter()
        .map(|index| assemble(index, &records, &children_of))
        .collect()
}

/// All gallery ids transitively reachable below `root`, excluding `root`
/// itself. Each subtree is grouped together: a child is followed by its own
/// descendants before its next sibling.
///
/// Already-visited ids are skipped, so a cyclic parent chain truncates
/// silently instead of recursing forever.
pub fn descendant_ids(root: &str, records: &[GalleryRecord]) -> Vec<GalleryId> {
    let mut seen = HashSet::new();
    seen.insert(root);

    let mut ids = Vec::new();
    collect_descendants(root, records, &mut seen, &mut ids);
    ids
}

fn collect_descendants<'r>(
    parent: &str,
    records: &'r [GalleryRecord],
    seen: &mut HashSet<&'r str>,
    ids: &mut Vec<GalleryId>,
) {
    for record in records {
        if record.parent_id() == Some(parent) && seen.insert(record.id.as_str()) {
            ids.push(record.id.clone());
            collect_descendants(&record.id, records, seen, ids);
        }
    }
}
