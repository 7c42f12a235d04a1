use silver_halide_records::PhotoRecord;

use super::{Client, GalleryProvider, ListQuery};
use crate::models::galleries::{descendant_ids, GalleryId};
use crate::models::photos::{sample_per_gallery, Photo};

const COLLECTION: &str = "photos";

/// Upper bound for the bulk gallery-photo query.
const BULK_PAGE_SIZE: u16 = 200;

#[async_trait::async_trait]
pub trait PhotoProvider {
    /// The most recent photos flagged as featured, newest first. Degrades to
    /// an empty list on any backend failure.
    async fn featured_photos(&self, limit: u16) -> Vec<Photo>;

    /// Photos belonging to a gallery, ordered by their `order` field.
    ///
    /// With `include_descendants` the owning-gallery filter covers the whole
    /// subtree below `gallery_id`. With `per_gallery_cap` the result is a
    /// randomized preview of at most `cap` photos per contributing gallery,
    /// concatenated root-first; without it the backend's order is returned
    /// untouched. Degrades to an empty list on any backend failure.
    async fn photos_for_gallery(
        &self,
        gallery_id: &str,
        include_descendants: bool,
        per_gallery_cap: Option<usize>,
    ) -> Vec<Photo>;
}

#[async_trait::async_trait]
impl PhotoProvider for Client {
    async fn featured_photos(&self, limit: u16) -> Vec<Photo> {
        let query = ListQuery {
            filter: Some("featured=true"),
            sort: Some("-created"),
            per_page: limit,
        };

        match self.list_records::<PhotoRecord>(COLLECTION, &query).await {
            Ok(records) => records.into_iter().map(Photo::from).collect(),
            Err(err) => {
                tracing::error!(error = %err, "fetching featured photos failed");
                Vec::new()
            },
        }
    }

    async fn photos_for_gallery(
        &self,
        gallery_id: &str,
        include_descendants: bool,
        per_gallery_cap: Option<usize>,
    ) -> Vec<Photo> {
        let mut effective_ids: Vec<GalleryId> = vec![gallery_id.to_string()];
        if include_descendants {
            let all_galleries = self.galleries().await;
            effective_ids.extend(descendant_ids(gallery_id, &all_galleries));
        }

        let filter = gallery_filter(&effective_ids);
        let query = ListQuery {
            filter: Some(&filter),
            sort: Some("order"),
            per_page: BULK_PAGE_SIZE,
        };

        let photos: Vec<Photo> = match self.list_records::<PhotoRecord>(COLLECTION, &query).await {
            Ok(records) => records.into_iter().map(Photo::from).collect(),
            Err(err) => {
                tracing::error!(error = %err, gallery_id, "fetching gallery photos failed");
                return Vec::new();
            },
        };

        match per_gallery_cap {
            Some(cap) => sample_per_gallery(photos, &effective_ids, cap, &mut rand::thread_rng()),
            None => photos,
        }
    }
}

fn gallery_filter(ids: &[GalleryId]) -> String {
    let clauses: Vec<String> = ids.iter().map(|id| format!("gallery='{}'", id)).collect();
    clauses.join(" || ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_id_filter_has_no_disjunction() {
        assert_eq!(gallery_filter(&["g1".to_string()]), "gallery='g1'");
    }

    #[test]
    fn multiple_ids_join_with_or() {
        let ids = vec!["g1".to_string(), "g2".to_string(), "g3".to_string()];

        assert_eq!(
            gallery_filter(&ids),
            "gallery='g1' || gallery='g2' || gallery='g3'",
        );
    }
}
