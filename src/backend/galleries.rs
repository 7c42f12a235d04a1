use silver_halide_records::GalleryRecord;

use super::{Client, ListQuery};

const COLLECTION: &str = "galleries";

/// The backend paginates at 100 records; one page covers every gallery this
/// site will ever have.
const LIST_PAGE_SIZE: u16 = 100;

#[async_trait::async_trait]
pub trait GalleryProvider {
    /// The full flat gallery collection, sorted by name. Degrades to an empty
    /// list on any backend failure.
    async fn galleries(&self) -> Vec<GalleryRecord>;

    /// Single gallery lookup by its URL slug. Degrades to `None` on failure.
    async fn gallery_by_slug(&self, slug: &str) -> Option<GalleryRecord>;
}

#[async_trait::async_trait]
impl GalleryProvider for Client {
    async fn galleries(&self) -> Vec<GalleryRecord> {
        let query = ListQuery {
            filter: None,
            sort: Some("name"),
            per_page: LIST_PAGE_SIZE,
        };

        match self.list_records(COLLECTION, &query).await {
            Ok(records) => records,
            Err(err) => {
                tracing::error!(error = %err, "fetching galleries failed");
                Vec::new()
            },
        }
    }

    async fn gallery_by_slug(&self, slug: &str) -> Option<GalleryRecord> {
        let filter = slug_filter(slug);
        let query = ListQuery {
            filter: Some(&filter),
            sort: None,
            per_page: 1,
        };

        match self.list_records::<GalleryRecord>(COLLECTION, &query).await {
            Ok(records) => records.into_iter().next(),
            Err(err) => {
                tracing::error!(error = %err, slug, "fetching gallery by slug failed");
                None
            },
        }
    }
}

fn slug_filter(slug: &str) -> String {
    // Slugs are URL-safe by invariant, but strip quotes anyway so a crafted
    // path segment cannot splice the filter expression.
    format!("slug='{}'", slug.replace('\'', ""))
}
