//! Wire types for the headless record backend.
//!
//! The backend exposes `galleries` and `photos` collections over HTTP,
//! returning a JSON envelope with an `items` list. Relation fields come back
//! as empty strings rather than `null` when unset, so the accessors below
//! normalize those to `None`.

use serde::{Deserialize, Serialize};

/// The list envelope returned by every collection query.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RecordPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GalleryRecord {
    pub id: String,
    #[serde(rename = "collectionId", default)]
    pub collection_id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

impl GalleryRecord {
    /// Parent gallery id, with the backend's empty-string sentinel mapped to
    /// `None`. Absence means this gallery is a root.
    pub fn parent_id(&self) -> Option<&str> {
        match self.parent.as_str() {
            "" => None,
            id => Some(id),
        }
    }

    pub fn cover_image(&self) -> Option<&str> {
        match self.cover_image.as_str() {
            "" => None,
            filename => Some(filename),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PhotoRecord {
    pub id: String,
    #[serde(rename = "collectionId", default)]
    pub collection_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Filename of the image asset attached to this record.
    pub image: String,
    /// Owning gallery id; photos without one are orphaned and excluded from
    /// gallery views.
    #[serde(default)]
    pub gallery: String,
    #[serde(default)]
    pub featured: bool,
    /// Default sort key within a gallery.
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

impl PhotoRecord {
    pub fn gallery_id(&self) -> Option<&str> {
        match self.gallery.as_str() {
            "" => None,
            id => Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gallery_page_parses_backend_envelope() {
        let body = r#"{
            "page": 1,
            "perPage": 100,
            "totalItems": 2,
            "items": [
                {
                    "id": "g1",
                    "collectionId": "col_galleries",
                    "name": "Travel",
                    "slug": "travel",
                    "description": "",
                    "cover_image": "cover.jpg",
                    "parent": "",
                    "created": "2024-01-01 10:00:00.000Z",
                    "updated": "2024-01-02 10:00:00.000Z"
                },
                {
                    "id": "g2",
                    "collectionId": "col_galleries",
                    "name": "Paris",
                    "slug": "paris",
                    "parent": "g1"
                }
            ]
        }"#;

        let page: RecordPage<GalleryRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].parent_id(), None);
        assert_eq!(page.items[0].cover_image(), Some("cover.jpg"));
        assert_eq!(page.items[1].parent_id(), Some("g1"));
        assert_eq!(page.items[1].cover_image(), None);
    }

    #[test]
    fn photo_record_defaults_for_missing_fields() {
        let body = r#"{"id": "p1", "collectionId": "col_photos", "image": "eiffel.jpg"}"#;

        let photo: PhotoRecord = serde_json::from_str(body).unwrap();
        assert_eq!(photo.gallery_id(), None);
        assert_eq!(photo.order, None);
        assert!(!photo.featured);
    }

    #[test]
    fn missing_items_list_parses_as_empty() {
        let page: RecordPage<PhotoRecord> = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
    }
}
